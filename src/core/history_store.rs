//! Thread-safe in-memory transaction history
//!
//! This module provides the `InMemoryHistoryStore` struct, an append-only log
//! of balance mutations partitioned by user.
//!
//! # Design
//!
//! Records are kept in a `DashMap<UserId, Vec<HistoryRecord>>`. Sequence ids
//! come from a global `AtomicU64` and are drawn while the user's entry is
//! locked, so within one user's vector the ids are strictly increasing and
//! match insertion order. Across users the ids are globally unique and
//! monotonic.

use crate::core::traits::HistoryStore;
use crate::types::{
    Amount, HistoryId, HistoryRecord, StoreError, Timestamp, TransactionKind, UserId,
};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Append-only history store backed by `DashMap`
#[derive(Debug)]
pub struct InMemoryHistoryStore {
    /// Per-user records in insertion order
    records: DashMap<UserId, Vec<HistoryRecord>>,

    /// Next sequence id to hand out (ids start at 1)
    next_id: AtomicU64,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Snapshot of every record ordered by sequence id
    pub fn all(&self) -> Vec<HistoryRecord> {
        let mut all: Vec<HistoryRecord> = self
            .records
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|record| record.id);
        all
    }

    /// Total number of records across all users
    pub fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_id(&self) -> HistoryId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn append(
        &self,
        user_id: UserId,
        amount: Amount,
        kind: TransactionKind,
        occurred_at: Timestamp,
    ) -> Result<HistoryRecord, StoreError> {
        // Hold the entry lock while drawing the id so per-user order matches id order
        let mut entry = self.records.entry(user_id).or_default();
        let record = HistoryRecord {
            id: self.next_id(),
            user_id,
            amount,
            kind,
            occurred_at,
        };
        entry.value_mut().push(record.clone());
        Ok(record)
    }

    fn list_by_user(&self, user_id: UserId) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(self
            .records
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
