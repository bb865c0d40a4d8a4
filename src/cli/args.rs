use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay wallet ledger operations with dispute resolution
#[derive(Parser, Debug)]
#[command(name = "wallet-ledger-engine")]
#[command(about = "Replay wallet ledger operations with dispute resolution", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Replay strategy to use for processing operations
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Replay strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,
}

/// Available replay strategies for CSV processing
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}
