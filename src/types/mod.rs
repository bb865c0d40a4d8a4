//! Core data types for the Wallet Ledger Engine
//!
//! This module contains all domain types used throughout the system:
//! wallets, transactions, disputes, users, verification records, audit
//! records, monetary amount validation, and the error type.

pub mod amount;
pub mod audit;
pub mod dispute;
pub mod error;
pub mod kyc;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use amount::{parse_amount, validate_amount, MAX_AMOUNT_SCALE};
pub use audit::{AdminId, AuditRecord, Audited};
pub use dispute::{Dispute, DisputeId, DisputeResolution, DisputeStatus};
pub use error::WalletError;
pub use kyc::{KycId, KycRecord, KycStatus, KycVerdict};
pub use transaction::{Deposit, DepositId, Transaction, TransactionId, TransactionStatus};
pub use user::{User, UserId, UserStatus};
pub use wallet::{Wallet, WalletId};
