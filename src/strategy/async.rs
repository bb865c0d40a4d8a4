//! Asynchronous replay strategy
//!
//! Streams the operations file through tokio's non-blocking file I/O and
//! the csv-async deserializer, in batches. Application order is still
//! strictly file order: ledger replay semantics depend on it, so the
//! async win here is overlapped I/O and parsing, not parallel mutation.

use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_wallets_csv;
use crate::replay::Replay;
use crate::strategy::ReplayStrategy;
use crate::types::WalletError;
use std::io::Write;
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::debug;

/// Number of operations pulled from the reader per batch
const BATCH_SIZE: usize = 1000;

/// Asynchronous replay strategy
#[derive(Debug, Clone, Copy)]
pub struct AsyncReplayStrategy;

impl ReplayStrategy for AsyncReplayStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), WalletError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| WalletError::Io {
                message: format!("failed to start runtime: {e}"),
            })?;

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| WalletError::Io {
                    message: format!("failed to open '{}': {}", input_path.display(), e),
                })?;

            let mut reader = AsyncReader::new(file.compat());
            let replay = Replay::new();

            loop {
                let batch = reader.read_batch(BATCH_SIZE).await;
                if batch.is_empty() {
                    break;
                }
                for operation in batch {
                    if let Err(e) = replay.apply(operation) {
                        debug!(error = %e, "operation rejected");
                    }
                }
            }

            write_wallets_csv(&replay.wallets(), output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    const HEADER: &str =
        "op,user,wallet,to_wallet,kyc,tx,dispute,amount,name,email,phone,doc_type,doc_number,doc_ref,reason,verdict,bank_ref,admin\n";

    #[test]
    fn test_async_strategy_missing_file() {
        let strategy = AsyncReplayStrategy;
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(matches!(result, Err(WalletError::Io { .. })));
    }

    #[test]
    fn test_async_strategy_matches_sync_semantics() {
        let content = format!(
            "{HEADER}register,,,,,,,,Ada Obi,ada@example.com,0801,,,,,,,\n\
             submit_kyc,1,,,,,,,,,,passport,A1,docs/1.png,,,,\n\
             review_kyc,,,,1,,,,,,,,,,,verified,,1\n\
             create_wallet,1,,,,,,,,,,,,,,,,\n\
             register,,,,,,,,Ben Eze,ben@example.com,0802,,,,,,,\n\
             submit_kyc,2,,,,,,,,,,passport,B2,docs/2.png,,,,\n\
             review_kyc,,,,2,,,,,,,,,,,verified,,1\n\
             create_wallet,2,,,,,,,,,,,,,,,,\n\
             deposit,,1,,,,,100.00,,,,,,,,,,\n\
             transfer,1,,2,,,,40.00,,,,,,,,,,\n"
        );
        let file = create_temp_csv(&content);

        let sync_out = {
            let mut out = Vec::new();
            crate::strategy::SyncReplayStrategy
                .process(file.path(), &mut out)
                .unwrap();
            out
        };
        let async_out = {
            let mut out = Vec::new();
            AsyncReplayStrategy.process(file.path(), &mut out).unwrap();
            out
        };

        assert_eq!(sync_out, async_out);
        assert_eq!(
            String::from_utf8(async_out).unwrap(),
            "wallet,owner,balance,hold_balance,is_active\n\
             1,1,60.00,0.00,true\n\
             2,2,40.00,0.00,true\n"
        );
    }
}
