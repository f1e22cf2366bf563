//! Benchmark suite for ledger lock contention
//!
//! Compares a workload where every task hits the same user (fully serialized
//! by the per-user lock) against one spread over many users.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use point_ledger::{InMemoryBalanceStore, InMemoryHistoryStore, PointLedger};
use std::sync::Arc;

fn main() {
    divan::main();
}

fn run_charges(users: i64, operations: i64) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .build()
        .expect("Failed to build runtime");
    let ledger = PointLedger::new(
        Arc::new(InMemoryBalanceStore::new()),
        Arc::new(InMemoryHistoryStore::new()),
    );

    runtime.block_on(async {
        let tasks: Vec<_> = (0..operations)
            .map(|i| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.charge(i % users + 1, 1).await })
            })
            .collect();
        for task in tasks {
            task.await
                .expect("Task panicked")
                .expect("Charge failed");
        }
    });
}

/// 10,000 charges against a single user
#[divan::bench]
fn single_user_10k() {
    run_charges(1, 10_000);
}

/// 10,000 charges spread over 1,000 users
#[divan::bench]
fn many_users_10k() {
    run_charges(1_000, 10_000);
}
