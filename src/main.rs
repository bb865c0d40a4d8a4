//! Wallet Ledger Engine CLI
//!
//! Command-line interface for replaying wallet ledger operations from
//! CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > wallets.csv
//! cargo run -- --strategy sync operations.csv > wallets.csv
//! cargo run -- --strategy async operations.csv > wallets.csv
//! ```
//!
//! The program reads operation records from the input CSV file, applies
//! them in order to a fresh wallet service, and writes the final wallet
//! states to stdout. Rejected operations are logged to stderr (set
//! `RUST_LOG=debug` to see each one) and do not abort the replay.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use std::process;
use tracing_subscriber::EnvFilter;
use wallet_ledger_engine::cli;
use wallet_ledger_engine::strategy;

fn main() {
    // Diagnostics go to stderr; stdout carries the wallet states.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    let strategy = strategy::create_strategy(args.strategy);

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
