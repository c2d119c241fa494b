//! Lock registry implementation
//!
//! HashMap of collection name → shared Mutex, itself behind a Mutex.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// A shared, per-collection lock
///
/// Returned unlocked; callers acquire it for the duration of a mutation.
pub type CollectionLock = Arc<Mutex<()>>;

/// Maps collection names to their locks
///
/// ## Concurrency:
/// - `locks`: registry-wide Mutex, held only for lookup-or-insert, never across I/O
/// - Each returned `CollectionLock` is independent of the registry lock
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<String, CollectionLock>>,
}

impl LockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the lock for `name`, creating it on first use
    ///
    /// Repeated calls with the same name return the same lock, even when
    /// racing from several threads.
    pub fn acquire_or_create(&self, name: &str) -> CollectionLock {
        let mut locks = self.locks.lock();

        if let Some(lock) = locks.get(name) {
            return Arc::clone(lock);
        }

        let lock = CollectionLock::default();
        locks.insert(name.to_string(), Arc::clone(&lock));
        lock
    }

    /// Whether a lock has been created for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.locks.lock().contains_key(name)
    }

    /// Number of collections with a lock
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}
