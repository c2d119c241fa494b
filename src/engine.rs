//! Engine Module
//!
//! The document store that coordinates locking, encoding and storage.
//!
//! ## Responsibilities
//! - Validate collection/resource keys before any I/O
//! - Serialize writes and deletes per collection
//! - Encode/decode records at the boundary
//! - Delegate all filesystem work to the storage manager

use std::path::Path;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec;
use crate::config::Config;
use crate::error::{CacheDbError, Result};
use crate::lock::LockRegistry;
use crate::storage::{Removed, StorageManager};

/// The main storage engine
///
/// ## Concurrency Model: per-collection writer lock, lock-free readers
///
/// - **Writes/Deletes**: serialized by the collection's lock
///   - One mutation per collection at a time, even for different resources
///   - Must acquire: collection lock → mkdir → encode → tmp write → rename
///
/// - **Reads** (read/read_all): take no lock
///   - Records are only ever replaced by rename, so a reader sees the old or
///     the new content, never a partial file
///
/// Two engines pointed at the same root share no locks. The rename still
/// prevents torn files, but the last rename wins.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// On-disk layout and record I/O
    storage: StorageManager,

    /// Per-collection write locks, owned by this engine only
    locks: LockRegistry,
}

impl Engine {
    /// Open or create a database with the given config
    ///
    /// On startup:
    /// 1. Reject an empty root path
    /// 2. Normalize the root and create it if missing
    /// 3. Start with an empty lock registry
    pub fn open(config: Config) -> Result<Self> {
        let storage = StorageManager::open(&config)?;

        if storage.created() {
            tracing::info!(root = %storage.root_dir().display(), "created new database");
        } else {
            tracing::info!(
                root = %storage.root_dir().display(),
                "opened existing database, make sure your data is backed up"
            );
        }

        Ok(Self {
            config,
            storage,
            locks: LockRegistry::new(),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified root directory
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().root_dir(path.as_ref()).build();
        Self::open(config)
    }

    /// Write a record, replacing any previous value atomically
    ///
    /// Steps:
    /// 1. Acquire the collection lock
    /// 2. Ensure the collection directory exists
    /// 3. Encode the record
    /// 4. Write `<resource>.json.tmp`, rename over `<resource>.json`
    pub fn write<T: Serialize + ?Sized>(&self, collection: &str, resource: &str, value: &T) -> Result<()> {
        Self::require_collection(collection)?;
        Self::require_resource(resource)?;

        let lock = self.locks.acquire_or_create(collection);
        let _guard = lock.lock();

        self.storage.ensure_collection(collection)?;
        let bytes = codec::encode(value)?;
        let path = self.storage.write(collection, resource, &bytes)?;

        tracing::debug!(collection, resource, path = %path.display(), len = bytes.len(), "wrote record");
        Ok(())
    }

    /// Read and decode a record
    pub fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> Result<T> {
        let bytes = self.read_raw(collection, resource)?;
        codec::decode(&bytes)
    }

    /// Read a record's encoded bytes without decoding them
    pub fn read_raw(&self, collection: &str, resource: &str) -> Result<Bytes> {
        Self::require_collection(collection)?;
        Self::require_resource(resource)?;

        tracing::trace!(collection, resource, "reading record");
        self.storage.read(collection, resource)
    }

    /// Read every entry of a collection as raw encoded bytes
    ///
    /// Order follows directory enumeration and is not sorted. Every file in
    /// the directory is returned, including leftover temp files.
    pub fn read_all(&self, collection: &str) -> Result<Vec<Bytes>> {
        Self::require_collection(collection)?;

        tracing::trace!(collection, "reading collection");
        self.storage.read_all(collection)
    }

    /// Read and decode every entry of a collection
    pub fn read_all_as<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        self.read_all(collection)?
            .iter()
            .map(|bytes| codec::decode(bytes))
            .collect()
    }

    /// Delete a record, or the whole collection when `resource` is empty
    ///
    /// Holds the collection lock, so deletes never interleave with writes to
    /// the same collection.
    pub fn delete(&self, collection: &str, resource: &str) -> Result<()> {
        Self::require_collection(collection)?;

        let lock = self.locks.acquire_or_create(collection);
        let _guard = lock.lock();

        match self.storage.remove(collection, resource)? {
            Removed::Directory => {
                tracing::warn!(collection, resource, "removed directory tree");
            }
            Removed::Record => {
                tracing::debug!(collection, resource, "deleted record");
            }
            Removed::Nothing => {
                tracing::debug!(collection, resource, "nothing to delete");
            }
        }

        Ok(())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn require_collection(collection: &str) -> Result<()> {
        if collection.is_empty() {
            return Err(CacheDbError::MissingCollection);
        }
        Ok(())
    }

    fn require_resource(resource: &str) -> Result<()> {
        if resource.is_empty() {
            return Err(CacheDbError::MissingResourceName);
        }
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the normalized root directory path
    pub fn root_dir(&self) -> &Path {
        self.storage.root_dir()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of collections that have a lock in the registry
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }
}
