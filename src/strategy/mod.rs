//! Replay strategy module
//!
//! Defines the Strategy pattern for complete replay pipelines: reading
//! an operations CSV, applying every operation to a fresh service, and
//! writing the final wallet states. Two implementations exist, selected
//! at runtime: synchronous streaming and async (tokio) streaming. Both
//! apply operations strictly in file order — a ledger replay is
//! order-sensitive.

use crate::cli::StrategyType;
use crate::types::WalletError;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::AsyncReplayStrategy;
pub use sync::SyncReplayStrategy;

/// Replay strategy trait for complete replay pipelines
///
/// Fatal faults (file missing, output unwritable) are returned;
/// individual rejected operations are logged and skipped so one bad row
/// never aborts a replay.
pub trait ReplayStrategy: Send + Sync {
    /// Replay operations from the input file and write wallet states
    ///
    /// # Errors
    ///
    /// Returns `Io`/`Parse` kinds for fatal faults only.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), WalletError>;
}

/// Create a replay strategy for the given strategy type
pub fn create_strategy(strategy_type: StrategyType) -> Box<dyn ReplayStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncReplayStrategy),
        StrategyType::Async => Box::new(AsyncReplayStrategy),
    }
}
