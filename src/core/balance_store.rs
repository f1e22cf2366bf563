//! Thread-safe in-memory balance storage
//!
//! This module provides the `InMemoryBalanceStore` struct, which keeps the
//! current balance of every user in a `DashMap`.
//!
//! # Thread Safety
//!
//! Reads and writes go through DashMap's sharded locks, so a single read or
//! write is atomic. Read-modify-write sequences spanning several calls are NOT
//! atomic at this level; the ledger service serializes them per user.

use crate::core::traits::BalanceStore;
use crate::types::{Amount, BalanceRecord, StoreError, UserId};
use dashmap::DashMap;

/// Thread-safe balance store backed by `DashMap`
///
/// Users without a stored record read as a synthesized zero balance. Nothing
/// is inserted by a read; only `write` creates records.
#[derive(Debug, Default)]
pub struct InMemoryBalanceStore {
    /// Concurrent HashMap storing balances by user ID
    balances: DashMap<UserId, BalanceRecord>,
}

impl InMemoryBalanceStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
        }
    }

    /// Snapshot of every stored balance, in arbitrary order
    ///
    /// Records written concurrently with this call may or may not be included.
    pub fn all(&self) -> Vec<BalanceRecord> {
        self.balances
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of users with a stored balance
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl BalanceStore for InMemoryBalanceStore {
    fn read(&self, user_id: UserId) -> Result<BalanceRecord, StoreError> {
        Ok(self
            .balances
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| BalanceRecord::empty(user_id)))
    }

    fn write(&self, user_id: UserId, amount: Amount) -> Result<BalanceRecord, StoreError> {
        let record = BalanceRecord::new(user_id, amount);
        self.balances.insert(user_id, record.clone());
        Ok(record)
    }
}
