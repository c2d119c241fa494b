//! Path layout
//!
//! Pure path arithmetic plus the bare-name / `.json` existence probe.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Extension of a finalized record file
pub const RECORD_EXT: &str = ".json";

/// Extra extension of an in-flight record file
pub const TMP_EXT: &str = ".tmp";

/// What an existence probe found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// A directory (a whole collection, or a nested directory)
    Dir(PathBuf),

    /// A regular file
    File(PathBuf),

    /// Something else (fifo, socket, device)
    Other(PathBuf),
}

/// Lexically clean a path: drop `.` segments and fold `..` into its parent
///
/// Does not touch the filesystem and does not follow symlinks. An empty
/// result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Append a raw suffix to the last path segment (`a/b` + `.json` → `a/b.json`)
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Temp sibling of a record path (`a/b.json` → `a/b.json.tmp`)
pub fn tmp_path(record: &Path) -> PathBuf {
    with_suffix(record, TMP_EXT)
}

/// Join a collection and an optional resource under `root`
///
/// An empty resource yields the collection directory itself.
pub(crate) fn entry_path(root: &Path, collection: &str, resource: &str) -> PathBuf {
    let dir = root.join(collection);
    if resource.is_empty() {
        dir
    } else {
        dir.join(resource)
    }
}

/// Probe `path`, falling back to `path.json` when the bare name is absent
///
/// Returns `Ok(None)` when neither exists.
pub fn probe(path: &Path) -> io::Result<Option<Probe>> {
    let (found, meta) = match fs::metadata(path) {
        Ok(meta) => (path.to_path_buf(), meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let suffixed = with_suffix(path, RECORD_EXT);
            match fs::metadata(&suffixed) {
                Ok(meta) => (suffixed, meta),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e),
            }
        }
        Err(e) => return Err(e),
    };

    let kind = if meta.is_dir() {
        Probe::Dir(found)
    } else if meta.is_file() {
        Probe::File(found)
    } else {
        Probe::Other(found)
    };
    Ok(Some(kind))
}
