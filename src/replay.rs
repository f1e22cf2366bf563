//! Operation log replay
//!
//! This module drives a `PointLedger` from a CSV operation log and writes a
//! report of the resulting state.
//!
//! # Architecture
//!
//! ```text
//! Replayer
//!     ├── ReplayConfig (batch_size, max_concurrent_users)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchDispatcher (user partitioning + tasks)
//!     └── PointLedger
//!         ├── InMemoryBalanceStore
//!         └── InMemoryHistoryStore
//! ```
//!
//! Batches are applied one after another so a user's operations keep their
//! file order even when they span several batches. Within a batch, users are
//! processed in parallel on a multi-threaded tokio runtime.

use crate::cli::ReportKind;
use crate::core::{BatchDispatcher, InMemoryBalanceStore, InMemoryHistoryStore, PointLedger};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{write_balances_csv, write_history_csv};
use crate::types::ReplayError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for replay batching
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Worker threads, i.e. how many users can be processed at once
    pub max_concurrent_users: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_users: num_cpus::get(),
        }
    }
}

impl ReplayConfig {
    /// Create a config, falling back to defaults for zero values
    pub fn new(batch_size: usize, max_concurrent_users: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                default = default.batch_size,
                "invalid batch_size 0, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_users = if max_concurrent_users == 0 {
            tracing::warn!(
                default = default.max_concurrent_users,
                "invalid max_concurrent_users 0, using default"
            );
            default.max_concurrent_users
        } else {
            max_concurrent_users
        };

        Self {
            batch_size,
            max_concurrent_users,
        }
    }
}

/// Counters collected during a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Operations that changed a balance
    pub applied: usize,
    /// Operations the ledger refused (invalid argument, insufficient balance, ...)
    pub rejected: usize,
    /// Operations that hit a store failure
    pub failed: usize,
    /// Rows that could not be parsed
    pub skipped: usize,
}

/// Replays an operation log through a fresh in-memory ledger
#[derive(Debug, Clone)]
pub struct Replayer {
    config: ReplayConfig,
}

impl Replayer {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Apply every operation in `input_path` and write the requested report
    ///
    /// Rejected operations are logged and counted; only problems with the
    /// input file, the output or the runtime are returned as errors.
    pub fn run(
        &self,
        input_path: &Path,
        report: ReportKind,
        output: &mut dyn Write,
    ) -> Result<ReplaySummary, ReplayError> {
        if !input_path.exists() {
            return Err(ReplayError::FileNotFound {
                path: input_path.display().to_string(),
            });
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_users)
            .build()
            .map_err(|e| ReplayError::Runtime {
                message: e.to_string(),
            })?;

        let balances = Arc::new(InMemoryBalanceStore::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let ledger = PointLedger::new(balances.clone(), history.clone());

        let summary = runtime.block_on(self.apply_file(input_path, ledger))?;

        match report {
            ReportKind::Balances => write_balances_csv(&balances.all(), output)?,
            ReportKind::History => write_history_csv(&history.all(), output)?,
        }

        tracing::info!(
            applied = summary.applied,
            rejected = summary.rejected,
            failed = summary.failed,
            skipped = summary.skipped,
            "replay finished"
        );
        Ok(summary)
    }

    async fn apply_file(
        &self,
        input_path: &Path,
        ledger: PointLedger,
    ) -> Result<ReplaySummary, ReplayError> {
        let file = tokio::fs::File::open(input_path).await?;
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncReader::new(compat_file);
        let dispatcher = BatchDispatcher::new(ledger.clone());
        let mut summary = ReplaySummary::default();

        loop {
            let batch = reader.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }

            for outcome in dispatcher.process_batch(batch).await {
                match outcome.result {
                    Ok(_) => summary.applied += 1,
                    Err(e) if e.is_rejection() => {
                        summary.rejected += 1;
                        tracing::warn!(
                            op = %outcome.operation.kind,
                            user_id = outcome.operation.user_id,
                            amount = outcome.operation.amount,
                            error = %e,
                            "operation rejected"
                        );
                    }
                    Err(e) => {
                        summary.failed += 1;
                        tracing::error!(
                            op = %outcome.operation.kind,
                            user_id = outcome.operation.user_id,
                            error = %e,
                            "operation failed"
                        );
                    }
                }
            }

            ledger.locks().prune_idle();
        }

        summary.skipped = reader.skipped();
        Ok(summary)
    }
}
