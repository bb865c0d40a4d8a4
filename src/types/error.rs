//! Error types for the Wallet Ledger Engine
//!
//! This module defines all errors surfaced by the ledger core and the CSV
//! replay front-end. Every business-rule violation is a typed, recoverable
//! variant with enough context to render a user message; a failed
//! operation never leaves a partial ledger mutation behind.
//!
//! # Error Categories
//!
//! - **Not found**: a referenced user, wallet, transaction, dispute, or
//!   verification record is absent
//! - **Conflict**: uniqueness violations (duplicate dispute, wallet or
//!   verification already exists, email/phone taken)
//! - **Precondition failed**: business rule unmet (unverified identity,
//!   frozen wallet, expired dispute window, closed dispute)
//! - **Malformed input**: invalid amount, self-transfer
//! - **Business**: insufficient funds (reported, never swallowed)
//! - **Rights**: the actor has no claim on the entity
//! - **Infrastructure**: I/O and CSV faults in the replay front-end,
//!   arithmetic overflow guards, audit-trail unavailability

use super::dispute::{DisputeId, DisputeStatus};
use super::transaction::TransactionId;
use super::user::UserId;
use super::wallet::WalletId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the wallet ledger engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    /// Referenced user does not exist
    #[error("User {user} not found")]
    UserNotFound {
        /// The missing user ID
        user: UserId,
    },

    /// Referenced wallet does not exist
    #[error("Wallet {wallet} not found")]
    WalletNotFound {
        /// The missing wallet ID
        wallet: WalletId,
    },

    /// The user has not opened a wallet yet
    #[error("User {user} has no wallet")]
    NoWallet {
        /// The wallet-less user ID
        user: UserId,
    },

    /// Referenced transaction does not exist (or is not visible to the caller)
    #[error("Transaction {transaction} not found")]
    TransactionNotFound {
        /// The missing transaction ID
        transaction: TransactionId,
    },

    /// Referenced dispute does not exist (or is not visible to the caller)
    #[error("Dispute {dispute} not found")]
    DisputeNotFound {
        /// The missing dispute ID
        dispute: DisputeId,
    },

    /// No verification record exists under this ID
    #[error("Verification record {kyc} not found")]
    KycNotFound {
        /// The missing verification record ID
        kyc: u64,
    },

    /// Email already registered to another user
    #[error("Email '{email}' is already registered")]
    EmailTaken {
        /// The conflicting email
        email: String,
    },

    /// Phone number already registered to another user
    #[error("Phone '{phone}' is already registered")]
    PhoneTaken {
        /// The conflicting phone number
        phone: String,
    },

    /// The user already owns a wallet
    #[error("Wallet already exists for user {user}")]
    WalletExists {
        /// The user that already has a wallet
        user: UserId,
    },

    /// The user already submitted a verification record
    #[error("Verification already submitted for user {user}")]
    KycAlreadySubmitted {
        /// The user with an existing submission
        user: UserId,
    },

    /// A dispute already exists for this transaction
    #[error("Dispute already exists for transaction {transaction}")]
    DuplicateDispute {
        /// The already-disputed transaction
        transaction: TransactionId,
    },

    /// Wallet creation requires a verified identity
    #[error("Identity verification required for user {user}")]
    VerificationRequired {
        /// The unverified user
        user: UserId,
    },

    /// The sending wallet is frozen
    ///
    /// Frozen blocks outbound transfers only; incoming transfers and
    /// dispute holds still apply.
    #[error("Wallet {wallet} is frozen")]
    WalletFrozen {
        /// The frozen wallet
        wallet: WalletId,
    },

    /// The dispute filing window has passed
    #[error("Transaction {transaction} is {age_days} days old; disputes close after {window_days} days")]
    WindowExpired {
        /// The transaction that can no longer be disputed
        transaction: TransactionId,
        /// Transaction age at filing time, whole days
        age_days: i64,
        /// Length of the filing window, days
        window_days: i64,
    },

    /// The dispute has already been resolved or rejected
    #[error("Dispute {dispute} is already {status}")]
    DisputeClosed {
        /// The terminal dispute
        dispute: DisputeId,
        /// Its terminal status
        status: DisputeStatus,
    },

    /// Amount is missing, non-positive, or carries sub-cent precision
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The rejected amount as given
        amount: String,
    },

    /// Sender and receiver wallets must be distinct
    #[error("Cannot transfer from wallet {wallet} to itself")]
    InvalidReceiver {
        /// The wallet referenced on both sides
        wallet: WalletId,
    },

    /// Sender balance below the requested amount
    #[error("Insufficient funds in wallet {wallet}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// The short wallet
        wallet: WalletId,
        /// Available balance at commit time
        available: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// The actor has no rights over the entity
    #[error("User {user} has no claim on {entity} {id}")]
    Forbidden {
        /// The acting user
        user: UserId,
        /// Kind of entity: "transaction", "dispute", ...
        entity: &'static str,
        /// Id of the entity
        id: u64,
    },

    /// Balance arithmetic would overflow
    ///
    /// Rejected to keep the wallet state intact; never a business outcome.
    #[error("Arithmetic overflow in {operation} for wallet {wallet}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Affected wallet
        wallet: WalletId,
    },

    /// The audit trail rejected an append
    ///
    /// Surfaced as a warning by the admin layer; never rolls back the
    /// mutation it describes.
    #[error("Audit trail unavailable: {message}")]
    AuditUnavailable {
        /// Description of the fault
        message: String,
    },

    /// The CSV op column names no known operation
    #[error("Unknown operation '{op}'")]
    UnknownOperation {
        /// The unrecognized op string
        op: String,
    },

    /// The verdict column is not a valid value for this operation
    #[error("Invalid verdict '{verdict}'")]
    InvalidVerdict {
        /// The unrecognized verdict string
        verdict: String,
    },

    /// A required CSV column is empty for this operation
    #[error("{op} operation requires a '{field}' value")]
    MissingField {
        /// The operation missing a field
        op: String,
        /// Name of the missing column
        field: &'static str,
    },

    /// CSV parsing error in the replay front-end
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// I/O error while reading or writing replay files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },
}

impl From<std::io::Error> for WalletError {
    fn from(error: std::io::Error) -> Self {
        WalletError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for WalletError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        WalletError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl WalletError {
    /// Create a UserNotFound error
    pub fn user_not_found(user: UserId) -> Self {
        WalletError::UserNotFound { user }
    }

    /// Create a WalletNotFound error
    pub fn wallet_not_found(wallet: WalletId) -> Self {
        WalletError::WalletNotFound { wallet }
    }

    /// Create a NoWallet error
    pub fn no_wallet(user: UserId) -> Self {
        WalletError::NoWallet { user }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(transaction: TransactionId) -> Self {
        WalletError::TransactionNotFound { transaction }
    }

    /// Create a DisputeNotFound error
    pub fn dispute_not_found(dispute: DisputeId) -> Self {
        WalletError::DisputeNotFound { dispute }
    }

    /// Create a KycNotFound error
    pub fn kyc_not_found(kyc: u64) -> Self {
        WalletError::KycNotFound { kyc }
    }

    /// Create an EmailTaken error
    pub fn email_taken(email: &str) -> Self {
        WalletError::EmailTaken {
            email: email.to_string(),
        }
    }

    /// Create a PhoneTaken error
    pub fn phone_taken(phone: &str) -> Self {
        WalletError::PhoneTaken {
            phone: phone.to_string(),
        }
    }

    /// Create a WalletExists error
    pub fn wallet_exists(user: UserId) -> Self {
        WalletError::WalletExists { user }
    }

    /// Create a KycAlreadySubmitted error
    pub fn kyc_already_submitted(user: UserId) -> Self {
        WalletError::KycAlreadySubmitted { user }
    }

    /// Create a DuplicateDispute error
    pub fn duplicate_dispute(transaction: TransactionId) -> Self {
        WalletError::DuplicateDispute { transaction }
    }

    /// Create a VerificationRequired error
    pub fn verification_required(user: UserId) -> Self {
        WalletError::VerificationRequired { user }
    }

    /// Create a WalletFrozen error
    pub fn wallet_frozen(wallet: WalletId) -> Self {
        WalletError::WalletFrozen { wallet }
    }

    /// Create a WindowExpired error
    pub fn window_expired(transaction: TransactionId, age_days: i64, window_days: i64) -> Self {
        WalletError::WindowExpired {
            transaction,
            age_days,
            window_days,
        }
    }

    /// Create a DisputeClosed error
    pub fn dispute_closed(dispute: DisputeId, status: DisputeStatus) -> Self {
        WalletError::DisputeClosed { dispute, status }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        WalletError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an InvalidReceiver error
    pub fn invalid_receiver(wallet: WalletId) -> Self {
        WalletError::InvalidReceiver { wallet }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(wallet: WalletId, available: Decimal, requested: Decimal) -> Self {
        WalletError::InsufficientFunds {
            wallet,
            available,
            requested,
        }
    }

    /// Create a Forbidden error
    pub fn forbidden(user: UserId, entity: &'static str, id: u64) -> Self {
        WalletError::Forbidden { user, entity, id }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, wallet: WalletId) -> Self {
        WalletError::ArithmeticOverflow {
            operation: operation.to_string(),
            wallet,
        }
    }

    /// Create an AuditUnavailable error
    pub fn audit_unavailable(message: &str) -> Self {
        WalletError::AuditUnavailable {
            message: message.to_string(),
        }
    }

    /// Create an UnknownOperation error
    pub fn unknown_operation(op: &str) -> Self {
        WalletError::UnknownOperation { op: op.to_string() }
    }

    /// Create an InvalidVerdict error
    pub fn invalid_verdict(verdict: &str) -> Self {
        WalletError::InvalidVerdict {
            verdict: verdict.to_string(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(op: &str, field: &'static str) -> Self {
        WalletError::MissingField {
            op: op.to_string(),
            field,
        }
    }
}
