//! Synchronous replay strategy
//!
//! Single-threaded pipeline: [`SyncReader`] streams operations row by
//! row, [`Replay`] applies them in order, and the final wallet states go
//! out through `write_wallets_csv`. Memory stays constant in the number
//! of rows; only wallets, log entries, and disputes accumulate.

use crate::io::csv_format::write_wallets_csv;
use crate::io::sync_reader::SyncReader;
use crate::replay::Replay;
use crate::strategy::ReplayStrategy;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Synchronous replay strategy
#[derive(Debug, Clone, Copy)]
pub struct SyncReplayStrategy;

impl ReplayStrategy for SyncReplayStrategy {
    fn process(
        &self,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), crate::types::WalletError> {
        let replay = Replay::new();
        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(operation) => {
                    if let Err(e) = replay.apply(operation) {
                        debug!(error = %e, "operation rejected");
                    }
                }
                Err(e) => {
                    debug!(error = %e, "row skipped");
                }
            }
        }

        write_wallets_csv(&replay.wallets(), output)
    }
}
