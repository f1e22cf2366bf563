//! CSV format handling for operation logs and ledger reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization of `op,user,amount` rows
//! - Conversion from CSV records to `LedgerOperation`
//! - Balance and history report serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{Amount, BalanceRecord, HistoryRecord, LedgerOperation, TransactionKind, UserId};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: op, user, amount.
/// Ids and amounts are kept signed so the ledger, not the parser, decides
/// what is out of range.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub user: UserId,
    pub amount: Amount,
}

/// Convert a CsvRecord to a LedgerOperation
///
/// Only the operation name is checked here (case-insensitive `charge` or
/// `use`); argument validation belongs to the ledger.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerOperation, String> {
    let kind = match csv_record.op.to_lowercase().as_str() {
        "charge" => TransactionKind::Charge,
        "use" => TransactionKind::Use,
        _ => {
            return Err(format!(
                "Invalid operation '{}' for user {}",
                csv_record.op, csv_record.user
            ))
        }
    };

    Ok(LedgerOperation {
        kind,
        user_id: csv_record.user,
        amount: csv_record.amount,
    })
}

/// Write balances as CSV with columns: user, amount, updated_at
///
/// Rows are sorted by user id for deterministic output.
pub fn write_balances_csv(
    balances: &[BalanceRecord],
    output: &mut dyn Write,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["user", "amount", "updated_at"])?;

    let mut sorted = balances.to_vec();
    sorted.sort_by_key(|record| record.id);

    for record in sorted {
        writer.write_record(&[
            record.id.to_string(),
            record.amount.to_string(),
            record.updated_at.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write history as CSV with columns: id, user, kind, amount, occurred_at
///
/// Rows are sorted by user id, then by sequence id, so each user's records
/// appear together in insertion order.
pub fn write_history_csv(
    history: &[HistoryRecord],
    output: &mut dyn Write,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["id", "user", "kind", "amount", "occurred_at"])?;

    let mut sorted = history.to_vec();
    sorted.sort_by_key(|record| (record.user_id, record.id));

    for record in sorted {
        writer.write_record(&[
            record.id.to_string(),
            record.user_id.to_string(),
            record.kind.to_string(),
            record.amount.to_string(),
            record.occurred_at.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
