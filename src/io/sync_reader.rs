//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over replay operations from a CSV file.
//! Delegates format concerns to the csv_format module; records are read
//! one at a time without loading the file into memory.
//!
//! Fatal errors (file not found) are returned from `new()`; individual
//! record parse or conversion failures are yielded as `Err` items so the
//! caller can log and continue.

use crate::io::csv_format::{convert_operation_record, Operation, OperationRecord};
use crate::types::WalletError;
use csv::{DeserializeRecordsIntoIter, ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader yielding one operation per row
pub struct SyncReader {
    records: DeserializeRecordsIntoIter<File, OperationRecord>,
}

impl SyncReader {
    /// Open a CSV file for streaming iteration
    ///
    /// The reader trims whitespace and tolerates rows that omit trailing
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, WalletError> {
        let file = File::open(path).map_err(|e| WalletError::Io {
            message: format!("failed to open '{}': {}", path.display(), e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            records: reader.into_deserialize(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<Operation, WalletError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map_err(WalletError::from)
                .and_then(convert_operation_record),
        )
    }
}
