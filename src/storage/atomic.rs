//! Atomic record replacement
//!
//! ## Protocol
//! 1. Write the full payload to `<record>.tmp` (truncating any stale temp file)
//! 2. Optionally fsync the temp file
//! 3. Rename `<record>.tmp` over `<record>`
//! 4. Optionally fsync the parent directory
//!
//! The rename is the commit point. A reader sees the old record or the new
//! one, never a mix. A failure before the rename may leave the temp file
//! behind; the next successful write truncates it.

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::config::SyncStrategy;

use super::layout::tmp_path;

/// Recursively create `path` with `mode` applied to each new directory (unix)
pub fn create_dir_all(path: &Path, mode: u32) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(path)
}

/// Atomically replace `path` with `bytes`
pub fn write_atomic(path: &Path, bytes: &[u8], file_mode: u32, sync: SyncStrategy) -> io::Result<()> {
    let tmp = tmp_path(path);

    {
        let mut file = open_truncate(&tmp, file_mode)?;
        file.write_all(bytes)?;

        if sync == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }
    }

    fs::rename(&tmp, path)?;

    if sync == SyncStrategy::EveryWrite {
        if let Some(parent) = path.parent() {
            sync_dir(parent)?;
        }
    }

    Ok(())
}

fn open_truncate(path: &Path, mode: u32) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(path)
}

/// Persist a rename by syncing the directory entry
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
