//! Storage Module
//!
//! Persistent storage layer: one directory per collection, one JSON file per
//! resource.
//!
//! ## Responsibilities
//! - Create and normalize the database root
//! - Derive record and temp paths from (collection, resource)
//! - Atomic record replacement (write temp, then rename)
//! - Raw reads, full-collection scans and removal
//!
//! ## On-Disk Layout
//! ```text
//! <root>/
//!   <collection>/
//!     <resource>.json       pretty-printed record, trailing newline
//!     <resource>.json.tmp   transient; only mid-write or after a crash
//! ```
//!
//! Nothing in this module locks. Callers serialize mutations per collection.

mod atomic;
mod layout;
mod manager;

pub use atomic::{create_dir_all, write_atomic};
pub use layout::{normalize, probe, tmp_path, with_suffix, Probe, RECORD_EXT, TMP_EXT};
pub use manager::{Removed, StorageManager};
