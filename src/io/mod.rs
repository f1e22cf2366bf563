//! I/O module
//!
//! Handles operation log parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_record, write_balances_csv, write_history_csv, CsvRecord};
