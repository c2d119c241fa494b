//! Configuration for CacheDB
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a CacheDB instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory of the database
    /// Internal structure:
    ///   {root_dir}/
    ///     └── {collection}/
    ///           ├── {resource}.json
    ///           └── {resource}.json.tmp   (only mid-write or after a crash)
    pub root_dir: PathBuf,

    /// Sync strategy: whether to fsync before/after the atomic rename
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Permission Configuration (unix only)
    // -------------------------------------------------------------------------
    /// Mode for newly created directories
    pub dir_mode: u32,

    /// Mode for newly created record files
    pub file_mode: u32,
}

/// Record sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStrategy {
    /// Rely on the rename alone (fast; a power loss may lose the latest write)
    #[default]
    None,

    /// fsync the temp file before rename and the collection directory after it
    EveryWrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./cachedb_data"),
            sync_strategy: SyncStrategy::None,
            dir_mode: 0o755,
            file_mode: 0o644,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database root directory
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the mode used when creating directories
    pub fn dir_mode(mut self, mode: u32) -> Self {
        self.config.dir_mode = mode;
        self
    }

    /// Set the mode used when creating record files
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
