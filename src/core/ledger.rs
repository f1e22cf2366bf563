//! Point ledger service
//!
//! This module provides the `PointLedger` struct, which orchestrates a
//! `BalanceStore` and a `HistoryStore` to implement balance queries, history
//! queries, charges and uses.
//!
//! # Architecture
//!
//! ```text
//! PointLedger
//!     ├── Arc<dyn BalanceStore>  (current balance per user)
//!     ├── Arc<dyn HistoryStore>  (append-only mutation log)
//!     └── Arc<UserLocks>         (one RwLock per user, created lazily)
//! ```
//!
//! # Concurrency
//!
//! A mutation holds the user's write lock for the whole
//! read → validate → write → append sequence, so two concurrent charges for
//! the same user can never both read the same stale balance. Queries hold the
//! read lock and therefore never observe a balance whose history record has
//! not been appended yet. Each call locks exactly one user, so calls for
//! different users never wait on each other and lock cycles cannot form.
//!
//! # Partial failure
//!
//! If the balance write succeeds but the history append fails, the previous
//! balance is written back while the lock is still held, and the failure is
//! returned as `LedgerError::HistoryAppendFailed` with `rolled_back` telling
//! whether that compensation succeeded.

use std::fmt;
use std::sync::Arc;

use crate::core::traits::{BalanceStore, HistoryStore};
use crate::core::user_locks::UserLocks;
use crate::types::{
    Amount, BalanceRecord, HistoryRecord, LedgerError, StoreError, TransactionKind, UserId,
};

/// Reject user ids that are not positive integers
pub fn validate_user_id(user_id: UserId) -> Result<UserId, LedgerError> {
    if user_id > 0 {
        Ok(user_id)
    } else {
        Err(LedgerError::invalid_user_id(user_id))
    }
}

/// Reject amounts that are not positive integers
pub fn validate_amount(amount: Amount) -> Result<Amount, LedgerError> {
    if amount > 0 {
        Ok(amount)
    } else {
        Err(LedgerError::invalid_amount(amount))
    }
}

/// Balance-mutation engine with per-user isolation
///
/// Cheap to clone; clones share the same stores and locks and can be moved
/// into separate tasks.
#[derive(Clone)]
pub struct PointLedger {
    balances: Arc<dyn BalanceStore>,
    history: Arc<dyn HistoryStore>,
    locks: Arc<UserLocks>,
}

impl fmt::Debug for PointLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointLedger")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl PointLedger {
    /// Create a ledger over the given stores
    pub fn new(balances: Arc<dyn BalanceStore>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            balances,
            history,
            locks: Arc::new(UserLocks::new()),
        }
    }

    /// The per-user lock registry, exposed for pruning idle entries
    pub fn locks(&self) -> &UserLocks {
        &self.locks
    }

    /// Current balance of a user
    ///
    /// Users that were never written report a zero balance.
    pub async fn get_balance(&self, user_id: UserId) -> Result<BalanceRecord, LedgerError> {
        let user_id = validate_user_id(user_id)?;
        let _guard = self.locks.read(user_id).await;

        Ok(self.balances.read(user_id)?)
    }

    /// All history records of a user in insertion order
    pub async fn get_history(&self, user_id: UserId) -> Result<Vec<HistoryRecord>, LedgerError> {
        let user_id = validate_user_id(user_id)?;
        let _guard = self.locks.read(user_id).await;

        Ok(self.history.list_by_user(user_id)?)
    }

    /// Credit `amount` points to a user and record a CHARGE
    ///
    /// # Returns
    ///
    /// * `Ok(BalanceRecord)` - The balance after the write
    /// * `Err(LedgerError::InvalidArgument)` - Non-positive user id or amount
    /// * `Err(LedgerError::BalanceOverflow)` - The new balance would not fit in an `i64`
    /// * `Err(LedgerError::StoreUnavailable)` - A store failed before anything changed
    /// * `Err(LedgerError::HistoryAppendFailed)` - See the module docs
    pub async fn charge(
        &self,
        user_id: UserId,
        amount: Amount,
    ) -> Result<BalanceRecord, LedgerError> {
        let user_id = validate_user_id(user_id)?;
        let amount = validate_amount(amount)?;
        let _guard = self.locks.write(user_id).await;

        let current = self.balances.read(user_id)?;
        let new_amount = current
            .amount
            .checked_add(amount)
            .ok_or_else(|| LedgerError::balance_overflow(user_id, current.amount, amount))?;

        self.commit(current, new_amount, amount, TransactionKind::Charge)
    }

    /// Debit `amount` points from a user and record a USE
    ///
    /// # Returns
    ///
    /// * `Ok(BalanceRecord)` - The balance after the write
    /// * `Err(LedgerError::InvalidArgument)` - Non-positive user id or amount
    /// * `Err(LedgerError::InsufficientBalance)` - `amount` exceeds the current balance
    /// * `Err(LedgerError::StoreUnavailable)` - A store failed before anything changed
    /// * `Err(LedgerError::HistoryAppendFailed)` - See the module docs
    pub async fn use_points(
        &self,
        user_id: UserId,
        amount: Amount,
    ) -> Result<BalanceRecord, LedgerError> {
        let user_id = validate_user_id(user_id)?;
        let amount = validate_amount(amount)?;
        let _guard = self.locks.write(user_id).await;

        let current = self.balances.read(user_id)?;
        let new_amount = current
            .amount
            .checked_sub(amount)
            .filter(|remaining| *remaining >= 0)
            .ok_or_else(|| LedgerError::insufficient_balance(user_id, current.amount, amount))?;

        self.commit(current, new_amount, amount, TransactionKind::Use)
    }

    /// Apply a mutation of either kind
    pub async fn apply(
        &self,
        kind: TransactionKind,
        user_id: UserId,
        amount: Amount,
    ) -> Result<BalanceRecord, LedgerError> {
        match kind {
            TransactionKind::Charge => self.charge(user_id, amount).await,
            TransactionKind::Use => self.use_points(user_id, amount).await,
        }
    }

    /// Write the new balance and append the matching history record
    ///
    /// Must be called with the user's write lock held.
    fn commit(
        &self,
        previous: BalanceRecord,
        new_amount: Amount,
        amount: Amount,
        kind: TransactionKind,
    ) -> Result<BalanceRecord, LedgerError> {
        let user_id = previous.id;
        let updated = self.balances.write(user_id, new_amount)?;

        if let Err(source) = self
            .history
            .append(user_id, amount, kind, updated.updated_at)
        {
            let rolled_back = self.restore(&previous, &source);
            return Err(LedgerError::HistoryAppendFailed {
                user_id,
                kind,
                amount,
                rolled_back,
                source,
            });
        }

        tracing::debug!(user_id, %kind, amount, balance = new_amount, "balance updated");
        Ok(updated)
    }

    /// Write back the balance seen before a failed commit
    fn restore(&self, previous: &BalanceRecord, cause: &StoreError) -> bool {
        match self.balances.write(previous.id, previous.amount) {
            Ok(_) => {
                tracing::warn!(
                    user_id = previous.id,
                    balance = previous.amount,
                    error = %cause,
                    "history append failed, balance restored"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    user_id = previous.id,
                    balance = previous.amount,
                    error = %cause,
                    restore_error = %e,
                    "history append failed and balance could not be restored"
                );
                false
            }
        }
    }
}
