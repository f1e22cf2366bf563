//! Point Ledger Library
//!
//! # Overview
//!
//! This library keeps a point balance per user together with an append-only
//! history of every balance change, and guarantees that concurrent requests
//! never drive a balance negative, lose an update, or lose/duplicate a
//! history record.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (BalanceRecord, HistoryRecord, errors)
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - The `PointLedger` balance-mutation engine
//!   - [`core::balance_store`] / [`core::history_store`] - In-memory stores
//!   - [`core::user_locks`] - Per-user mutual exclusion
//!   - [`core::dispatcher`] - Per-user partitioned batch execution
//! - [`io`] - Operation log parsing and report output
//! - [`replay`] - Replaying an operation log file through a fresh ledger
//! - [`cli`] - CLI arguments parsing and log setup
//!
//! # Operations
//!
//! - **get_balance**: Current balance (zero for unknown users)
//! - **get_history**: A user's CHARGE/USE records in insertion order
//! - **charge**: Credit points
//! - **use_points**: Debit points, rejected if the balance would go negative
//!
//! # Example
//!
//! ```
//! use point_ledger::{InMemoryBalanceStore, InMemoryHistoryStore, PointLedger};
//! use std::sync::Arc;
//!
//! let ledger = PointLedger::new(
//!     Arc::new(InMemoryBalanceStore::new()),
//!     Arc::new(InMemoryHistoryStore::new()),
//! );
//! let runtime = tokio::runtime::Builder::new_multi_thread().build().unwrap();
//! runtime.block_on(async {
//!     ledger.charge(1, 500).await.unwrap();
//!     let balance = ledger.use_points(1, 200).await.unwrap();
//!     assert_eq!(balance.amount, 300);
//! });
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod replay;
pub mod types;

pub use crate::core::{
    BalanceStore, BatchDispatcher, HistoryStore, InMemoryBalanceStore, InMemoryHistoryStore,
    PointLedger, UserLocks,
};
pub use replay::{ReplayConfig, ReplaySummary, Replayer};
pub use types::{
    Amount, BalanceRecord, HistoryRecord, LedgerError, LedgerOperation, ReplayError, StoreError,
    TransactionKind, UserId,
};
