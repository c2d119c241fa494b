//! # CacheDB
//!
//! A minimal persistent document store backed directly by the filesystem:
//! - Two-level keys: a *collection* (directory) and a *resource* (file)
//! - Records are JSON, pretty-printed with tab indentation
//! - Atomic writes (write to `<resource>.json.tmp`, then rename)
//! - Per-collection locking for writers, lock-free readers
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Engine                              │
//! │         write / read / read_all / delete                     │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ write, delete                    │ every op
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │  LockRegistry   │                │     Storage     │
//!   │ (per-collection │                │ (layout, atomic │
//!   │     Mutex)      │                │   write/rename) │
//!   └─────────────────┘                └────────┬────────┘
//!                                               │
//!                                               ▼
//!                                  <root>/<collection>/<resource>.json
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod lock;
pub mod storage;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CacheDbError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Human-readable system name, shown in the startup banner
pub const NAME: &str = "Simple Key-Value Cache-DB";

/// Current version of CacheDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
