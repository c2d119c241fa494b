//! Storage Manager
//!
//! Owns the database root and performs all record I/O.
//!
//! ## Responsibilities
//! - Normalize and create the root directory on open
//! - Create collection directories on demand
//! - Write records through the atomic protocol
//! - Read single records, scan collections, remove records/collections

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::config::{Config, SyncStrategy};
use crate::error::{CacheDbError, Result};

use super::atomic::{create_dir_all, write_atomic};
use super::layout::{entry_path, normalize, probe, with_suffix, Probe, RECORD_EXT};

/// What a removal actually deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    /// A whole directory subtree (usually a collection)
    Directory,

    /// A single record file
    Record,

    /// The probe matched something that isn't a file or directory
    Nothing,
}

/// Manages the on-disk layout under one root directory
///
/// ## Concurrency:
/// - Holds no locks; all methods take `&self`
/// - Reads rely on records only ever being replaced by rename
/// - Callers must serialize `write` and `remove` per collection
#[derive(Debug)]
pub struct StorageManager {
    /// Normalized root directory
    root_dir: PathBuf,

    /// Whether `open` had to create the root
    created: bool,

    sync_strategy: SyncStrategy,
    dir_mode: u32,
    file_mode: u32,
}

impl StorageManager {
    /// Open or create storage rooted at `config.root_dir`
    ///
    /// An existing root is reused as-is; nothing on disk is validated.
    pub fn open(config: &Config) -> Result<Self> {
        if config.root_dir.as_os_str().is_empty() {
            return Err(CacheDbError::InvalidConfiguration(
                "database root directory is empty".to_string(),
            ));
        }

        let root_dir = normalize(&config.root_dir);

        let created = match fs::metadata(&root_dir) {
            Ok(_) => false,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                create_dir_all(&root_dir, config.dir_mode)?;
                true
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            root_dir,
            created,
            sync_strategy: config.sync_strategy,
            dir_mode: config.dir_mode,
            file_mode: config.file_mode,
        })
    }

    /// Create the collection directory (and any missing parents)
    pub fn ensure_collection(&self, collection: &str) -> Result<PathBuf> {
        let dir = self.collection_dir(collection);
        create_dir_all(&dir, self.dir_mode)?;
        Ok(dir)
    }

    /// Atomically write a record's bytes
    ///
    /// The collection directory must already exist.
    pub fn write(&self, collection: &str, resource: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.record_path(collection, resource);
        write_atomic(&path, bytes, self.file_mode, self.sync_strategy)?;

        Ok(path)
    }

    /// Read a record's raw bytes
    ///
    /// The record counts as present if either `<resource>` or
    /// `<resource>.json` exists; the bytes always come from the `.json` file.
    pub fn read(&self, collection: &str, resource: &str) -> Result<Bytes> {
        let path = entry_path(&self.root_dir, collection, resource);
        if probe(&path)?.is_none() {
            return Err(CacheDbError::NotFound(Self::relative(collection, resource)));
        }

        let bytes = fs::read(self.record_path(collection, resource))?;
        Ok(Bytes::from(bytes))
    }

    /// Read every entry of a collection, in directory enumeration order
    ///
    /// No filtering: stray temp files are returned too. Fails on the first
    /// unreadable entry.
    pub fn read_all(&self, collection: &str) -> Result<Vec<Bytes>> {
        let dir = self.collection_dir(collection);
        if probe(&dir)?.is_none() {
            return Err(CacheDbError::NotFound(PathBuf::from(collection)));
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let bytes = fs::read(entry.path())?;
            records.push(Bytes::from(bytes));
        }

        Ok(records)
    }

    /// Remove a record, or a whole directory when the path names one
    ///
    /// An empty `resource` addresses the collection directory itself.
    pub fn remove(&self, collection: &str, resource: &str) -> Result<Removed> {
        let path = entry_path(&self.root_dir, collection, resource);

        match probe(&path)? {
            None => Err(CacheDbError::NotFound(Self::relative(collection, resource))),
            Some(Probe::Dir(dir)) => {
                fs::remove_dir_all(dir)?;
                Ok(Removed::Directory)
            }
            Some(Probe::File(_)) => {
                // A bare file without a `.json` sibling has nothing to remove
                match fs::remove_file(with_suffix(&path, RECORD_EXT)) {
                    Ok(()) => Ok(Removed::Record),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Removed::Nothing),
                    Err(e) => Err(e.into()),
                }
            }
            Some(Probe::Other(_)) => Ok(Removed::Nothing),
        }
    }

    // =========================================================================
    // Paths
    // =========================================================================

    /// Get the root directory path
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Whether `open` created the root directory
    pub fn created(&self) -> bool {
        self.created
    }

    /// `<root>/<collection>`
    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root_dir.join(collection)
    }

    /// `<root>/<collection>/<resource>.json`
    pub fn record_path(&self, collection: &str, resource: &str) -> PathBuf {
        with_suffix(&self.collection_dir(collection).join(resource), RECORD_EXT)
    }

    fn relative(collection: &str, resource: &str) -> PathBuf {
        entry_path(Path::new(""), collection, resource)
    }
}
