//! # Per-Block Locks
//!
//! Async critical sections keyed by block hash. Handling of one block holds
//! its lock from lookup to the end of persistence; other blocks are unaffected.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::Hash;

/// Registry of per-block async locks.
#[derive(Default)]
pub struct BlockLocks {
    locks: Mutex<HashMap<Hash, Arc<AsyncMutex<()>>>>,
}

/// Held while a block is being handled. Releases on drop.
pub struct BlockLockGuard {
    _guard: OwnedMutexGuard<()>,
}

impl BlockLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `hash`.
    pub async fn acquire(&self, hash: Hash) -> BlockLockGuard {
        let lock = {
            let mut locks = self.locks.lock();
            // Entries only the registry references are idle.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(hash).or_default())
        };
        BlockLockGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of tracked keys (held, awaited, or not yet pruned).
    pub fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}
