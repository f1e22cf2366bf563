//! Asynchronous CSV reader for operation logs
//!
//! Provides batch reading over `op,user,amount` rows with constant memory use.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerOperations
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerOperation;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            skipped: 0,
        }
    }

    /// Read up to `batch_size` operations
    ///
    /// Malformed rows are logged and skipped. Returns an empty vector at end
    /// of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerOperation> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(operation) => batch.push(operation),
                    Err(e) => {
                        self.skipped += 1;
                        tracing::warn!(error = %e, "skipping operation");
                    }
                },
                Some(Err(e)) => {
                    self.skipped += 1;
                    tracing::warn!(error = %e, "skipping malformed CSV row");
                }
                None => break,
            }
        }

        batch
    }

    /// Number of rows skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
