//! Wallet lifecycle management
//!
//! Creates wallets for verified identities and toggles the frozen flag on
//! behalf of the admin layer. No other component creates wallets or flips
//! `is_active`; balances are never touched here.

use crate::types::{KycStatus, UserId, Wallet, WalletError, WalletId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::ledger_store::LedgerStore;

/// Wallet lifecycle manager
///
/// Owns the one-wallet-per-identity index; the balance state itself lives
/// in the [`LedgerStore`].
pub struct WalletManager {
    ledger: Arc<LedgerStore>,
    by_owner: DashMap<UserId, WalletId>,
    next_id: AtomicU64,
}

impl WalletManager {
    /// Create a manager over the given ledger; wallet ids start at 1
    pub fn new(ledger: Arc<LedgerStore>) -> Self {
        WalletManager {
            ledger,
            by_owner: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Open a wallet for a verified identity
    ///
    /// The per-owner slot is claimed through atomic insert-if-absent, so
    /// two concurrent creations for the same identity cannot both
    /// succeed. The new wallet starts active with zero balances.
    ///
    /// # Errors
    ///
    /// * `VerificationRequired` - the identity's verification fact is not
    ///   `Verified`
    /// * `WalletExists` - the identity already owns a wallet
    pub fn create_wallet(
        &self,
        owner: UserId,
        verification: KycStatus,
    ) -> Result<Wallet, WalletError> {
        if verification != KycStatus::Verified {
            return Err(WalletError::verification_required(owner));
        }

        // Atomic insert-if-absent on the owner index; a lost race or an
        // existing wallet both come back as someone else's id.
        let wallet_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let claimed = *self.by_owner.entry(owner).or_insert(wallet_id);
        if claimed != wallet_id {
            return Err(WalletError::wallet_exists(owner));
        }

        let wallet = Wallet::new(wallet_id, owner);
        self.ledger.insert(wallet.clone());
        Ok(wallet)
    }

    /// The wallet id owned by an identity, if any
    pub fn owner_wallet_id(&self, owner: UserId) -> Option<WalletId> {
        self.by_owner.get(&owner).map(|entry| *entry.value())
    }

    /// Snapshot the wallet owned by an identity
    ///
    /// # Errors
    ///
    /// Returns `NoWallet` if the identity has not opened one.
    pub fn wallet_of(&self, owner: UserId) -> Result<Wallet, WalletError> {
        let wallet_id = self
            .owner_wallet_id(owner)
            .ok_or_else(|| WalletError::no_wallet(owner))?;
        self.ledger.get(wallet_id)
    }

    /// Freeze or unfreeze a wallet; admin-only, balances untouched
    ///
    /// # Errors
    ///
    /// Returns `WalletNotFound` if the id is unknown.
    pub fn set_active(&self, wallet_id: WalletId, active: bool) -> Result<Wallet, WalletError> {
        self.ledger.with_wallet(wallet_id, |wallet| {
            wallet.is_active = active;
            Ok(wallet.clone())
        })
    }
}
