//! Per-user lock registry
//!
//! Every user id maps to its own async `RwLock`, created lazily on first use.
//! Mutations take the write half, reads take the read half. Users never share
//! a lock, so operations on different users proceed independently, and no
//! caller ever holds two users' locks at once.

use crate::types::UserId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// Lazily populated map from user id to that user's lock
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<RwLock<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the user's lock, inserting it if missing
    ///
    /// Insertion happens under the DashMap shard lock, so two racing callers
    /// always receive the same `Arc`.
    fn lock_for(&self, user_id: UserId) -> Arc<RwLock<()>> {
        Arc::clone(self.locks.entry(user_id).or_default().value())
    }

    /// Acquire exclusive access for a read-modify-write on `user_id`
    pub async fn write(&self, user_id: UserId) -> OwnedRwLockWriteGuard<()> {
        self.lock_for(user_id).write_owned().await
    }

    /// Acquire shared access for a consistent read of `user_id`
    pub async fn read(&self, user_id: UserId) -> OwnedRwLockReadGuard<()> {
        self.lock_for(user_id).read_owned().await
    }

    /// Drop locks that nobody is holding or waiting on
    ///
    /// Returns the number of entries removed. `retain` visits each entry under
    /// its shard's write lock, and `lock_for` clones under the same lock, so a
    /// lock with a strong count of one cannot be handed out while it is removed.
    pub fn prune_idle(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before.saturating_sub(self.locks.len())
    }

    /// Number of users that currently have a lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
