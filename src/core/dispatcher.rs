//! Batch dispatch with user-based partitioning
//!
//! This module provides the `BatchDispatcher` struct, which feeds a batch of
//! ledger operations into a shared `PointLedger`.
//!
//! # Design
//!
//! A batch is partitioned by user id. Each user's operations run sequentially
//! in their original order on one tokio task, and different users run on
//! separate tasks in parallel. The ledger's own per-user locks would already
//! prevent lost updates; the partitioning is what keeps replay order
//! deterministic for each user.

use std::collections::HashMap;

use super::PointLedger;
use crate::types::{BalanceRecord, LedgerError, LedgerOperation, UserId};

/// Result of applying a single operation
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    /// The operation that was applied
    pub operation: LedgerOperation,

    /// The balance after the operation, or why it was rejected
    pub result: Result<BalanceRecord, LedgerError>,
}

/// Executes batches of operations against a ledger
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    ledger: PointLedger,
}

impl BatchDispatcher {
    pub fn new(ledger: PointLedger) -> Self {
        Self { ledger }
    }

    /// Split a batch into per-user sub-batches, keeping each user's order
    pub fn partition_by_user(
        &self,
        batch: Vec<LedgerOperation>,
    ) -> HashMap<UserId, Vec<LedgerOperation>> {
        let mut user_batches: HashMap<UserId, Vec<LedgerOperation>> = HashMap::new();

        for operation in batch {
            user_batches
                .entry(operation.user_id)
                .or_default()
                .push(operation);
        }

        user_batches
    }

    /// Apply one user's operations in order
    ///
    /// A rejected operation does not stop the ones after it.
    pub async fn process_user_operations(
        &self,
        operations: Vec<LedgerOperation>,
    ) -> Vec<OperationOutcome> {
        let mut outcomes = Vec::with_capacity(operations.len());

        for operation in operations {
            let result = self
                .ledger
                .apply(operation.kind, operation.user_id, operation.amount)
                .await;
            outcomes.push(OperationOutcome { operation, result });
        }

        outcomes
    }

    /// Apply a whole batch, users in parallel
    ///
    /// Outcomes are grouped by user; the order between users is unspecified.
    pub async fn process_batch(&self, batch: Vec<LedgerOperation>) -> Vec<OperationOutcome> {
        let user_batches = self.partition_by_user(batch);

        let mut tasks = Vec::with_capacity(user_batches.len());
        for (_user_id, operations) in user_batches {
            let dispatcher = self.clone();
            tasks.push(tokio::spawn(async move {
                dispatcher.process_user_operations(operations).await
            }));
        }

        let mut outcomes = Vec::new();
        for task in tasks {
            match task.await {
                Ok(user_outcomes) => outcomes.extend(user_outcomes),
                Err(e) => tracing::error!(error = %e, "dispatch task failed"),
            }
        }

        outcomes
    }
}
