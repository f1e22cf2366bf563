//! Balance-related types for the point ledger
//!
//! This module defines the per-user balance record kept by the balance store.

use super::transaction::{now_millis, Amount, Timestamp, UserId};
use serde::Serialize;

/// Current point balance of a single user
///
/// There is at most one stored record per user. A user that has never been
/// written is reported with a synthesized zero record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    /// The user this balance belongs to
    pub id: UserId,

    /// Current balance, never negative
    pub amount: Amount,

    /// Milliseconds since the Unix epoch of the last write
    pub updated_at: Timestamp,
}

impl BalanceRecord {
    /// Create a record with the given amount stamped with the current time
    pub fn new(id: UserId, amount: Amount) -> Self {
        Self {
            id,
            amount,
            updated_at: now_millis(),
        }
    }

    /// Zero balance for a user that has no stored record yet
    pub fn empty(id: UserId) -> Self {
        Self::new(id, 0)
    }
}
