//! Core business logic components
//!
//! This module contains the ledger core:
//!
//! - [`ledger_store`] - wallet rows with atomic one- and two-wallet
//!   mutations under deterministic lock ordering
//! - [`wallet_manager`] - wallet lifecycle (create for verified
//!   identities, freeze/unfreeze)
//! - [`transfer_engine`] - wallet-to-wallet transfers and bank deposits
//! - [`dispute_engine`] - dispute filing, holds, and resolution
//! - [`transaction_log`] - append-only transfer history
//! - [`user_directory`] / [`kyc_registry`] - identity facts consumed by
//!   the lifecycle layer
//! - [`audit_trail`] / [`admin`] - trusted-actor oversight with
//!   best-effort audit records
//! - [`service`] - the assembled facade handed to front-ends
//! - [`clock`] - injectable time source

pub mod admin;
pub mod audit_trail;
pub mod clock;
pub mod dispute_engine;
pub mod kyc_registry;
pub mod ledger_store;
pub mod service;
pub mod transaction_log;
pub mod transfer_engine;
pub mod user_directory;
pub mod wallet_manager;

pub use admin::AdminOversight;
pub use audit_trail::{AuditSink, AuditTrail};
pub use clock::{Clock, SystemClock};
pub use dispute_engine::{DisputeEngine, DISPUTE_WINDOW_DAYS};
pub use kyc_registry::KycRegistry;
pub use ledger_store::LedgerStore;
pub use service::WalletService;
pub use transaction_log::TransactionLog;
pub use transfer_engine::TransferEngine;
pub use user_directory::UserDirectory;
pub use wallet_manager::WalletManager;
