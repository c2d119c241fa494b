//! Lock Module
//!
//! Per-collection mutual exclusion for mutating operations.
//!
//! ## Responsibilities
//! - Hand out one stable lock per collection name
//! - Create locks lazily on first reference
//! - Never remove a lock for the lifetime of the registry
//!
//! ## Granularity
//! One lock covers a whole collection, not a single resource. Two writers to
//! different resources of the same collection are fully serialized.

mod registry;

pub use registry::{CollectionLock, LockRegistry};
