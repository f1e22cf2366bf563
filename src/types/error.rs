//! Error types for the point ledger
//!
//! This module defines all error types that can occur while serving ledger
//! operations and while replaying an operation log.
//!
//! # Error Categories
//!
//! - **Argument Errors**: Non-positive user ids or amounts
//! - **Balance Errors**: Insufficient balance, overflow
//! - **Store Errors**: The backing balance or history store failed
//! - **Replay Errors**: File not found, I/O, CSV parsing, runtime setup

use super::transaction::{Amount, TransactionKind, UserId};
use thiserror::Error;

/// Failure reported by a balance or history store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing storage could not serve the request
    #[error("{store} store unavailable: {message}")]
    Unavailable {
        /// Which store failed ("balance" or "history")
        store: &'static str,
        /// Description of the failure
        message: String,
    },
}

impl StoreError {
    /// Create an Unavailable error
    pub fn unavailable(store: &'static str, message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            store,
            message: message.into(),
        }
    }
}

/// Main error type for ledger operations
///
/// Every variant is returned synchronously from the call that caused it.
/// `InvalidArgument`, `InsufficientBalance` and `BalanceOverflow` guarantee
/// that no state was changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A user id or amount was not a positive integer
    #[error("Invalid {field}: {value} (must be a positive integer)")]
    InvalidArgument {
        /// Name of the offending argument
        field: &'static str,
        /// The rejected value
        value: i64,
    },

    /// A use would drive the balance below zero
    #[error("Insufficient balance for user {user_id}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        user_id: UserId,
        balance: Amount,
        requested: Amount,
    },

    /// A charge would overflow the balance
    #[error("Balance overflow for user {user_id}: balance {balance}, requested {requested}")]
    BalanceOverflow {
        user_id: UserId,
        balance: Amount,
        requested: Amount,
    },

    /// A store failed before any state was changed
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),

    /// The balance was written but the matching history append failed
    ///
    /// `rolled_back` tells whether the previous balance was restored.
    #[error(
        "History append failed after {kind} of {amount} for user {user_id} (rolled back: {rolled_back}): {source}"
    )]
    HistoryAppendFailed {
        user_id: UserId,
        kind: TransactionKind,
        amount: Amount,
        rolled_back: bool,
        #[source]
        source: StoreError,
    },
}

impl LedgerError {
    /// Create an InvalidArgument error for a user id
    pub fn invalid_user_id(value: i64) -> Self {
        LedgerError::InvalidArgument {
            field: "user id",
            value,
        }
    }

    /// Create an InvalidArgument error for an amount
    pub fn invalid_amount(value: i64) -> Self {
        LedgerError::InvalidArgument {
            field: "amount",
            value,
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(user_id: UserId, balance: Amount, requested: Amount) -> Self {
        LedgerError::InsufficientBalance {
            user_id,
            balance,
            requested,
        }
    }

    /// Create a BalanceOverflow error
    pub fn balance_overflow(user_id: UserId, balance: Amount, requested: Amount) -> Self {
        LedgerError::BalanceOverflow {
            user_id,
            balance,
            requested,
        }
    }

    /// Whether the error was caused by the caller's input rather than infrastructure
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidArgument { .. }
                | LedgerError::InsufficientBalance { .. }
                | LedgerError::BalanceOverflow { .. }
        )
    }
}

/// Fatal errors of the batch replay front-end
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    Io { message: String },

    /// CSV error occurred while writing the report
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Csv { line: Option<u64>, message: String },

    /// The async runtime could not be created
    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

impl From<std::io::Error> for ReplayError {
    fn from(error: std::io::Error) -> Self {
        ReplayError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ReplayError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReplayError::Csv {
            line,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_user_id(
        LedgerError::invalid_user_id(-1),
        "Invalid user id: -1 (must be a positive integer)"
    )]
    #[case::invalid_amount(
        LedgerError::invalid_amount(0),
        "Invalid amount: 0 (must be a positive integer)"
    )]
    #[case::insufficient_balance(
        LedgerError::insufficient_balance(1, 500, 1000),
        "Insufficient balance for user 1: balance 500, requested 1000"
    )]
    #[case::balance_overflow(
        LedgerError::balance_overflow(7, i64::MAX, 1),
        "Balance overflow for user 7: balance 9223372036854775807, requested 1"
    )]
    #[case::store_unavailable(
        LedgerError::StoreUnavailable(StoreError::unavailable("balance", "disk gone")),
        "balance store unavailable: disk gone"
    )]
    #[case::history_append_failed(
        LedgerError::HistoryAppendFailed {
            user_id: 3,
            kind: TransactionKind::Charge,
            amount: 10,
            rolled_back: true,
            source: StoreError::unavailable("history", "full"),
        },
        "History append failed after CHARGE of 10 for user 3 (rolled back: true): history store unavailable: full"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid(LedgerError::invalid_amount(-5), true)]
    #[case::insufficient(LedgerError::insufficient_balance(1, 0, 1), true)]
    #[case::overflow(LedgerError::balance_overflow(1, i64::MAX, 1), true)]
    #[case::store(LedgerError::from(StoreError::unavailable("history", "x")), false)]
    fn test_is_rejection(#[case] error: LedgerError, #[case] expected: bool) {
        assert_eq!(error.is_rejection(), expected);
    }

    #[rstest]
    #[case::file_not_found(
        ReplayError::FileNotFound { path: "ops.csv".to_string() },
        "File not found: ops.csv"
    )]
    #[case::csv_with_line(
        ReplayError::Csv { line: Some(42), message: "bad field".to_string() },
        "CSV error at line 42: bad field"
    )]
    #[case::csv_without_line(
        ReplayError::Csv { line: None, message: "bad field".to_string() },
        "CSV error: bad field"
    )]
    fn test_replay_error_display(#[case] error: ReplayError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: ReplayError = io_error.into();
        assert!(matches!(error, ReplayError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
