//! Wallet types for the Wallet Ledger Engine
//!
//! This module defines the Wallet structure holding the balance state
//! mutated by the transfer and dispute engines.

use super::user::UserId;
use rust_decimal::Decimal;

/// Wallet identifier
pub type WalletId = u64;

/// Ledger account for one identity
///
/// Holds the available balance and the hold balance (funds earmarked by
/// open disputes). `balance` is non-negative in steady state but may be
/// driven negative by a dispute hold when the receiver has already spent
/// the contested funds; the negative value represents a debt owed back
/// to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    /// The wallet ID
    pub wallet_id: WalletId,

    /// The identity that owns this wallet
    pub owner: UserId,

    /// Funds available for outbound transfers
    pub balance: Decimal,

    /// Funds earmarked by open disputes
    ///
    /// When a transaction is disputed, the contested amount is moved from
    /// the receiver's `balance` into `hold_balance`. Held funds are never
    /// transferable until the dispute is resolved.
    pub hold_balance: Decimal,

    /// Whether the wallet may send funds
    ///
    /// `false` means frozen: outbound transfers are rejected. Incoming
    /// transfers and dispute holds are unaffected.
    pub is_active: bool,
}

impl Wallet {
    /// Create a new active wallet with zero balances
    pub fn new(wallet_id: WalletId, owner: UserId) -> Self {
        Wallet {
            wallet_id,
            owner,
            balance: Decimal::ZERO,
            hold_balance: Decimal::ZERO,
            is_active: true,
        }
    }
}
