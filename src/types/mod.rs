//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `balance`: Per-user balance record
//! - `transaction`: Identifiers, history records and replayed operations
//! - `error`: Error types for the ledger, the stores and the replay front-end

pub mod balance;
pub mod error;
pub mod transaction;

pub use balance::BalanceRecord;
pub use error::{LedgerError, ReplayError, StoreError};
pub use transaction::{
    now_millis, Amount, HistoryId, HistoryRecord, LedgerOperation, Timestamp, TransactionKind,
    UserId,
};
