//! Transaction and deposit types for the Wallet Ledger Engine
//!
//! Transactions are the immutable ledger entries produced by the transfer
//! engine. Deposits are the external supply-increase receipts recorded by
//! the bank gateway operation.

use super::wallet::WalletId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction identifier
pub type TransactionId = u64;

/// Deposit receipt identifier
pub type DepositId = u64;

/// Lifecycle status of a completed transfer
///
/// `Refunded` is informational only: the ledger effect of an accepted
/// dispute is carried entirely by balance/hold movements, never by
/// reinterpreting the original transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The transfer committed and stands
    Completed,

    /// An accepted dispute returned the funds to the sender
    Refunded,
}

/// Immutable record of a committed wallet-to-wallet transfer
///
/// Created only by a successful transfer; the sole mutation path is the
/// `Refunded` status marking on an accepted dispute.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The transaction ID
    pub transaction_id: TransactionId,

    /// Wallet the funds were debited from
    pub sender_wallet_id: WalletId,

    /// Wallet the funds were credited to
    pub receiver_wallet_id: WalletId,

    /// Transferred amount, strictly positive, 2 decimal places
    pub amount: Decimal,

    /// Current status of the transaction
    pub status: TransactionStatus,

    /// Commit time, used for the dispute filing window
    pub created_at: DateTime<Utc>,
}

/// Receipt for an external bank deposit
///
/// Deposits are the only operation that increases total supply; every
/// other money movement conserves the sum of balances and holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    /// The deposit receipt ID
    pub deposit_id: DepositId,

    /// Wallet that was credited
    pub wallet_id: WalletId,

    /// Deposited amount, strictly positive, 2 decimal places
    pub amount: Decimal,

    /// Reference supplied by the external bank, if any
    pub bank_reference: Option<String>,

    /// Credit time
    pub deposited_at: DateTime<Utc>,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Refunded => write!(f, "refunded"),
        }
    }
}
