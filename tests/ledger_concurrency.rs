//! Concurrency properties of the point ledger
//!
//! These tests hammer a shared `PointLedger` from many tokio tasks on a
//! multi-threaded runtime and check that no update is lost, no balance ever
//! goes negative, and history stays in step with the balance.

use point_ledger::{
    InMemoryBalanceStore, InMemoryHistoryStore, LedgerError, PointLedger, TransactionKind,
};
use std::sync::Arc;
use std::time::Duration;

fn ledger() -> PointLedger {
    PointLedger::new(
        Arc::new(InMemoryBalanceStore::new()),
        Arc::new(InMemoryHistoryStore::new()),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_ten_concurrent_charges_to_fresh_user() {
    let ledger = ledger();

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.charge(1, 100).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(ledger.get_balance(1).await.unwrap().amount, 1000);
    let history = ledger.get_history(1).await.unwrap();
    assert_eq!(history.len(), 10);
    assert!(history
        .iter()
        .all(|record| record.kind == TransactionKind::Charge && record.amount == 100));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_uses_never_overdraw() {
    let ledger = ledger();
    ledger.charge(1, 1000).await.unwrap();

    // 50 uses of 30 against 1000 points: exactly 33 can succeed
    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.use_points(1, 30).await })
        })
        .collect();

    let mut succeeded = 0;
    let mut insufficient = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(record) => {
                assert!(record.amount >= 0);
                succeeded += 1;
            }
            Err(LedgerError::InsufficientBalance { .. }) => insufficient += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(succeeded, 33);
    assert_eq!(insufficient, 17);
    assert_eq!(ledger.get_balance(1).await.unwrap().amount, 10);
    assert_eq!(ledger.get_history(1).await.unwrap().len(), 34);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_mixed_operations_balance_matches_history() {
    let ledger = ledger();

    let tasks: Vec<_> = (0..200)
        .map(|i| {
            let ledger = ledger.clone();
            let user = i % 4 + 1;
            tokio::spawn(async move {
                if i % 3 == 0 {
                    ledger.use_points(user, 7).await
                } else {
                    ledger.charge(user, 5).await
                }
            })
        })
        .collect();
    for task in tasks {
        match task.await.unwrap() {
            Ok(record) => assert!(record.amount >= 0),
            Err(LedgerError::InsufficientBalance { .. }) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    for user in 1..=4 {
        let balance = ledger.get_balance(user).await.unwrap().amount;
        let history = ledger.get_history(user).await.unwrap();
        let replayed: i64 = history
            .iter()
            .map(|record| match record.kind {
                TransactionKind::Charge => record.amount,
                TransactionKind::Use => -record.amount,
            })
            .sum();

        assert_eq!(balance, replayed, "user {} history disagrees with balance", user);
        assert!(history.windows(2).all(|pair| pair[0].id < pair[1].id));

        // Replaying the history in id order never dips below zero
        let mut running = 0;
        for record in &history {
            running += match record.kind {
                TransactionKind::Charge => record.amount,
                TransactionKind::Use => -record.amount,
            };
            assert!(running >= 0);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_held_user_lock_does_not_block_other_users() {
    let ledger = ledger();
    let _guard = ledger.locks().write(1).await;

    let other = tokio::time::timeout(Duration::from_secs(1), ledger.charge(2, 10)).await;
    assert_eq!(other.expect("user 2 must not wait on user 1").unwrap().amount, 10);

    let blocked = tokio::time::timeout(Duration::from_millis(50), ledger.charge(1, 10)).await;
    assert!(blocked.is_err(), "user 1 mutation must wait for its lock");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rejected_use_leaves_state_unchanged() {
    let ledger = ledger();
    ledger.charge(1, 500).await.unwrap();
    let before = ledger.get_balance(1).await.unwrap();

    let err = ledger.use_points(1, 1000).await.unwrap_err();

    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    assert_eq!(ledger.get_balance(1).await.unwrap(), before);
    assert_eq!(ledger.get_history(1).await.unwrap().len(), 1);
}
