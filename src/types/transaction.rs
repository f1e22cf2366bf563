//! Transaction-related types for the point ledger
//!
//! This module defines identifiers, the history record appended on every
//! successful balance mutation, and the operation record replayed from CSV.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User identifier
///
/// Signed so that non-positive values can reach validation and be rejected
/// as `InvalidArgument` instead of being unrepresentable.
pub type UserId = i64;

/// Point amount (balances and deltas)
pub type Amount = i64;

/// History record identifier, assigned from a global monotonic sequence
pub type HistoryId = u64;

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Kind of balance mutation recorded in history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Credit: increases the balance
    Charge,

    /// Debit: decreases the balance, rejected if it would go negative
    Use,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Charge => "CHARGE",
            TransactionKind::Use => "USE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable entry in the append-only transaction history
///
/// Ordering by `id` equals insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Sequence id assigned by the history store
    pub id: HistoryId,

    /// The user whose balance changed
    pub user_id: UserId,

    /// The (positive) delta that was applied
    pub amount: Amount,

    /// Whether the delta was a charge or a use
    pub kind: TransactionKind,

    /// When the mutation happened, in milliseconds since the Unix epoch
    pub occurred_at: Timestamp,
}

/// A single ledger mutation read from an operation log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerOperation {
    pub kind: TransactionKind,
    pub user_id: UserId,
    pub amount: Amount,
}
