//! Core traits for balance and history storage
//!
//! The ledger service only talks to storage through these traits, so the
//! in-memory stores can be swapped for other backends or for failing fakes
//! in tests. Each method must be internally atomic: a concurrent reader never
//! observes a torn record.

use crate::types::{
    Amount, BalanceRecord, HistoryRecord, StoreError, Timestamp, TransactionKind, UserId,
};

/// Keyed storage of the current balance per user
pub trait BalanceStore: Send + Sync {
    /// Return the stored record, or a zero-balance record if the user has none
    fn read(&self, user_id: UserId) -> Result<BalanceRecord, StoreError>;

    /// Overwrite (or create) the user's balance and return the stored value
    ///
    /// A subsequent `read` must observe this write.
    fn write(&self, user_id: UserId, amount: Amount) -> Result<BalanceRecord, StoreError>;
}

/// Append-only log of balance mutations
pub trait HistoryStore: Send + Sync {
    /// Store a new record under the next sequence id and return it
    fn append(
        &self,
        user_id: UserId,
        amount: Amount,
        kind: TransactionKind,
        occurred_at: Timestamp,
    ) -> Result<HistoryRecord, StoreError>;

    /// All records of a user in insertion order (empty if none)
    fn list_by_user(&self, user_id: UserId) -> Result<Vec<HistoryRecord>, StoreError>;
}
