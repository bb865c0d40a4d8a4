//! CSV format handling for operation records and wallet output
//!
//! This module centralizes all CSV format concerns, providing:
//! - OperationRecord structure for deserialization
//! - Conversion from CSV records to typed domain operations
//! - Wallet state output serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Input format
//!
//! One row per operation, columns:
//! `op,user,wallet,to_wallet,kyc,tx,dispute,amount,name,email,phone,doc_type,doc_number,doc_ref,reason,verdict,bank_ref,admin`
//!
//! Each operation uses a subset of the columns; the rest stay empty.
//! Amounts are validated here at the boundary (positive, at most two
//! decimal places) so business logic never re-parses money.

use crate::types::{
    parse_amount, DisputeId, DisputeResolution, KycId, KycVerdict, TransactionId, UserId, Wallet,
    WalletError, WalletId,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Every column except `op` is optional; which ones are required depends
/// on the operation and is enforced by [`convert_operation_record`].
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct OperationRecord {
    pub op: String,
    pub user: Option<u64>,
    pub wallet: Option<u64>,
    pub to_wallet: Option<u64>,
    pub kyc: Option<u64>,
    pub tx: Option<u64>,
    pub dispute: Option<u64>,
    pub amount: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub doc_type: Option<String>,
    pub doc_number: Option<String>,
    pub doc_ref: Option<String>,
    pub reason: Option<String>,
    pub verdict: Option<String>,
    pub bank_ref: Option<String>,
    pub admin: Option<u64>,
}

/// A typed replay operation
///
/// The CSV front-end's view of the service surface; each variant maps to
/// exactly one service or admin call.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Register {
        full_name: String,
        email: String,
        phone: String,
    },
    SubmitKyc {
        user: UserId,
        document_type: String,
        document_number: String,
        document_ref: String,
    },
    ReviewKyc {
        admin: u64,
        kyc: KycId,
        verdict: KycVerdict,
    },
    CreateWallet {
        user: UserId,
    },
    Deposit {
        wallet: WalletId,
        amount: Decimal,
        bank_reference: Option<String>,
    },
    Transfer {
        user: UserId,
        to_wallet: WalletId,
        amount: Decimal,
    },
    FileDispute {
        user: UserId,
        transaction: TransactionId,
        reason: String,
    },
    ReviewDispute {
        admin: u64,
        dispute: DisputeId,
    },
    ResolveDispute {
        admin: u64,
        dispute: DisputeId,
        resolution: DisputeResolution,
    },
    FreezeWallet {
        admin: u64,
        wallet: WalletId,
    },
    UnfreezeWallet {
        admin: u64,
        wallet: WalletId,
    },
    SuspendUser {
        admin: u64,
        user: UserId,
    },
    ActivateUser {
        admin: u64,
        user: UserId,
    },
}

fn require<T>(value: Option<T>, op: &str, field: &'static str) -> Result<T, WalletError> {
    value.ok_or_else(|| WalletError::missing_field(op, field))
}

fn require_text(
    value: Option<String>,
    op: &str,
    field: &'static str,
) -> Result<String, WalletError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(WalletError::missing_field(op, field)),
    }
}

/// Convert an OperationRecord to a typed Operation
///
/// Validates the op name, the per-operation required columns, the
/// amount, and the verdict values.
///
/// # Errors
///
/// * `UnknownOperation` - unrecognized op string
/// * `MissingField` - a required column is empty for this op
/// * `InvalidAmount` - malformed or out-of-range amount
/// * `InvalidVerdict` - verdict not valid for the op
pub fn convert_operation_record(record: OperationRecord) -> Result<Operation, WalletError> {
    let op = record.op.trim().to_lowercase();

    match op.as_str() {
        "register" => Ok(Operation::Register {
            full_name: require_text(record.name, &op, "name")?,
            email: require_text(record.email, &op, "email")?,
            phone: require_text(record.phone, &op, "phone")?,
        }),
        "submit_kyc" => Ok(Operation::SubmitKyc {
            user: require(record.user, &op, "user")?,
            document_type: require_text(record.doc_type, &op, "doc_type")?,
            document_number: require_text(record.doc_number, &op, "doc_number")?,
            document_ref: require_text(record.doc_ref, &op, "doc_ref")?,
        }),
        "review_kyc" => Ok(Operation::ReviewKyc {
            admin: require(record.admin, &op, "admin")?,
            kyc: require(record.kyc, &op, "kyc")?,
            verdict: match require_text(record.verdict, &op, "verdict")?.as_str() {
                "verified" => KycVerdict::Verified,
                "rejected" => KycVerdict::Rejected,
                other => return Err(WalletError::invalid_verdict(other)),
            },
        }),
        "create_wallet" => Ok(Operation::CreateWallet {
            user: require(record.user, &op, "user")?,
        }),
        "deposit" => Ok(Operation::Deposit {
            wallet: require(record.wallet, &op, "wallet")?,
            amount: parse_amount(&require_text(record.amount, &op, "amount")?)?,
            bank_reference: record.bank_ref,
        }),
        "transfer" => Ok(Operation::Transfer {
            user: require(record.user, &op, "user")?,
            to_wallet: require(record.to_wallet, &op, "to_wallet")?,
            amount: parse_amount(&require_text(record.amount, &op, "amount")?)?,
        }),
        "dispute" => Ok(Operation::FileDispute {
            user: require(record.user, &op, "user")?,
            transaction: require(record.tx, &op, "tx")?,
            reason: require_text(record.reason, &op, "reason")?,
        }),
        "review_dispute" => Ok(Operation::ReviewDispute {
            admin: require(record.admin, &op, "admin")?,
            dispute: require(record.dispute, &op, "dispute")?,
        }),
        "resolve_dispute" => Ok(Operation::ResolveDispute {
            admin: require(record.admin, &op, "admin")?,
            dispute: require(record.dispute, &op, "dispute")?,
            resolution: match require_text(record.verdict, &op, "verdict")?.as_str() {
                "accepted" => DisputeResolution::Accepted,
                "rejected" => DisputeResolution::Rejected,
                other => return Err(WalletError::invalid_verdict(other)),
            },
        }),
        "freeze_wallet" => Ok(Operation::FreezeWallet {
            admin: require(record.admin, &op, "admin")?,
            wallet: require(record.wallet, &op, "wallet")?,
        }),
        "unfreeze_wallet" => Ok(Operation::UnfreezeWallet {
            admin: require(record.admin, &op, "admin")?,
            wallet: require(record.wallet, &op, "wallet")?,
        }),
        "suspend_user" => Ok(Operation::SuspendUser {
            admin: require(record.admin, &op, "admin")?,
            user: require(record.user, &op, "user")?,
        }),
        "activate_user" => Ok(Operation::ActivateUser {
            admin: require(record.admin, &op, "admin")?,
            user: require(record.user, &op, "user")?,
        }),
        _ => Err(WalletError::unknown_operation(&record.op)),
    }
}

/// Write wallet states to CSV format
///
/// Columns: `wallet,owner,balance,hold_balance,is_active`, sorted by
/// wallet id for deterministic output.
///
/// # Errors
///
/// Returns a `Parse`/`Io` error if the underlying writer fails.
pub fn write_wallets_csv(wallets: &[Wallet], output: &mut dyn Write) -> Result<(), WalletError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["wallet", "owner", "balance", "hold_balance", "is_active"])?;

    let mut sorted: Vec<&Wallet> = wallets.iter().collect();
    sorted.sort_by_key(|wallet| wallet.wallet_id);

    for wallet in sorted {
        writer.write_record(&[
            wallet.wallet_id.to_string(),
            wallet.owner.to_string(),
            format!("{:.2}", wallet.balance),
            format!("{:.2}", wallet.hold_balance),
            wallet.is_active.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
