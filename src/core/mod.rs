//! Core business logic module
//!
//! This module contains the balance-mutation engine and its collaborators:
//! - `traits` - Store abstractions injected into the ledger
//! - `balance_store` - In-memory balance storage
//! - `history_store` - In-memory append-only history
//! - `user_locks` - Lazily created per-user locks
//! - `ledger` - The `PointLedger` service
//! - `dispatcher` - Per-user partitioned batch execution

pub mod balance_store;
pub mod dispatcher;
pub mod history_store;
pub mod ledger;
pub mod traits;
pub mod user_locks;

pub use balance_store::InMemoryBalanceStore;
pub use dispatcher::{BatchDispatcher, OperationOutcome};
pub use history_store::InMemoryHistoryStore;
pub use ledger::{validate_amount, validate_user_id, PointLedger};
pub use traits::{BalanceStore, HistoryStore};
pub use user_locks::UserLocks;
