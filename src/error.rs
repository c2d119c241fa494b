//! Error types for CacheDB
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using CacheDbError
pub type Result<T> = std::result::Result<T, CacheDbError>;

/// Unified error type for CacheDB operations
#[derive(Debug, Error)]
pub enum CacheDbError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("missing collection - no place to read or save record")]
    MissingCollection,

    #[error("missing resource - record has no name")]
    MissingResourceName,

    /// Path is relative to the database root, e.g. `users/alice`
    #[error("unable to find file or directory named {}", .0.display())]
    NotFound(PathBuf),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheDbError {
    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheDbError::NotFound(_))
    }
}
