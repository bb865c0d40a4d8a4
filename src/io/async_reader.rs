//! Asynchronous CSV reader with batch interface
//!
//! Streams replay operations from any `futures::io::AsyncRead` source
//! using csv-async, in batches for efficient processing. Invalid records
//! are logged and skipped so a malformed row never aborts a replay.

use crate::io::csv_format::{convert_operation_record, Operation, OperationRecord};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader yielding batches of operations
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader over an async byte source
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` operations
    ///
    /// Rows that fail to parse or convert are logged and skipped. An
    /// empty vector signals the end of the file.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Operation> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<OperationRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => match convert_operation_record(record) {
                    Ok(operation) => batch.push(operation),
                    Err(e) => warn!(error = %e, "record conversion failed; row skipped"),
                },
                Some(Err(e)) => warn!(error = %e, "CSV parse failed; row skipped"),
                None => break,
            }
        }

        batch
    }
}
