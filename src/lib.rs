//! Wallet Ledger Engine Library
//! # Overview
//!
//! This library implements a digital-wallet ledger backend: identity
//! registration and verification gate wallet creation, a transfer engine
//! moves funds between wallets under per-wallet locking, and a dispute
//! engine places contested funds on hold until an admin resolves them to
//! exactly one party. A CSV replay front-end binds the operation surface
//! for batch use, with sync and async streaming readers.
//!
//! # Architecture
//!
//! - [`types`] - Domain types (Wallet, Transaction, Dispute, errors, ...)
//! - [`core`] - Business logic components:
//!   - [`core::ledger_store`] - atomic wallet-row mutations with
//!     deterministic lock ordering
//!   - [`core::transfer_engine`] - transfers and bank deposits
//!   - [`core::dispute_engine`] - dispute filing, holds, resolution
//!   - [`core::admin`] - trusted-actor oversight with audit records
//!   - [`core::service`] - the assembled facade
//! - [`io`] - CSV record handling with pluggable reading strategies
//! - [`replay`] - dispatch from typed operations onto the service
//! - [`strategy`] - sync/async replay pipelines
//! - [`cli`] - command-line argument parsing
//!
//! # Money invariants
//!
//! The sum of `balance + hold_balance` across all wallets is changed
//! only by deposits; transfers and the entire dispute lifecycle conserve
//! it. A transfer never overspends a wallet even under concurrent
//! contention, and a dispute hold is enforced even when it drives the
//! receiver's balance negative.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod replay;
pub mod strategy;
pub mod types;

pub use crate::core::{
    AdminOversight, AuditSink, AuditTrail, Clock, DisputeEngine, KycRegistry, LedgerStore,
    SystemClock, TransactionLog, TransferEngine, UserDirectory, WalletManager, WalletService,
    DISPUTE_WINDOW_DAYS,
};
pub use crate::io::write_wallets_csv;
pub use crate::replay::Replay;
pub use crate::types::{
    AdminId, AuditRecord, Audited, Deposit, Dispute, DisputeId, DisputeResolution, DisputeStatus,
    KycId, KycRecord, KycStatus, KycVerdict, Transaction, TransactionId, TransactionStatus, User,
    UserId, UserStatus, Wallet, WalletError, WalletId,
};
