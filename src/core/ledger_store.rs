//! Ledger store: wallet rows with atomic read-modify-write
//!
//! This module provides the `LedgerStore`, the leaf component owning the
//! wallet balance state. It holds no business rules; it only guarantees
//! that mutations over one or two wallets are applied as a single atomic
//! unit.
//!
//! # Concurrency
//!
//! Each wallet lives behind its own `parking_lot::Mutex`, with the rows
//! kept in a `DashMap` for concurrent id-keyed access. Pair operations
//! always acquire the lock of the lower wallet id first, so two transfers
//! referencing the same pair in opposite order cannot deadlock. Mutations
//! run against working copies and are committed only on success: an `Err`
//! from the mutation closure leaves every balance exactly as if the
//! operation never started.
//!
//! Operations on disjoint wallet pairs proceed fully in parallel; a
//! caller touching a wallet locked by another in-flight unit blocks until
//! that unit commits or discards, and never observes an intermediate
//! state.

use crate::types::{Wallet, WalletError, WalletId};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Concurrent store of wallet rows
///
/// Opened once at process start and handed to the lifecycle, transfer,
/// and dispute components by reference; nothing in the system holds a
/// second wallet-state source of truth.
#[derive(Debug, Default)]
pub struct LedgerStore {
    /// Wallet rows, each behind its own lock
    wallets: DashMap<WalletId, Arc<Mutex<Wallet>>>,
}

impl LedgerStore {
    /// Create an empty ledger store
    pub fn new() -> Self {
        LedgerStore {
            wallets: DashMap::new(),
        }
    }

    /// Insert a freshly created wallet row
    ///
    /// Only the wallet lifecycle manager inserts rows; wallets are never
    /// deleted in normal operation.
    pub fn insert(&self, wallet: Wallet) {
        self.wallets
            .insert(wallet.wallet_id, Arc::new(Mutex::new(wallet)));
    }

    /// Whether a wallet row exists
    pub fn contains(&self, wallet_id: WalletId) -> bool {
        self.wallets.contains_key(&wallet_id)
    }

    /// Read a consistent snapshot of one wallet
    ///
    /// # Errors
    ///
    /// Returns `WalletNotFound` if no row exists for the id.
    pub fn get(&self, wallet_id: WalletId) -> Result<Wallet, WalletError> {
        let row = self.row(wallet_id)?;
        let guard = row.lock();
        Ok(guard.clone())
    }

    /// Apply an atomic mutation to one wallet
    ///
    /// The mutation runs against a working copy; the copy is committed
    /// only when the closure returns `Ok`, so a failed precondition
    /// leaves the row untouched.
    ///
    /// # Errors
    ///
    /// Returns `WalletNotFound` if the row is missing, or whatever error
    /// the mutation closure produced.
    pub fn with_wallet<T, F>(&self, wallet_id: WalletId, f: F) -> Result<T, WalletError>
    where
        F: FnOnce(&mut Wallet) -> Result<T, WalletError>,
    {
        let row = self.row(wallet_id)?;
        let mut guard = row.lock();
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        *guard = draft;
        Ok(out)
    }

    /// Apply an atomic mutation to two distinct wallets
    ///
    /// Locks are acquired in ascending wallet-id order regardless of the
    /// argument order; the closure still receives the wallets in the
    /// order they were passed. Both rows commit together on `Ok` and
    /// neither commits on `Err`.
    ///
    /// # Errors
    ///
    /// Returns `WalletNotFound` if either row is missing, or whatever
    /// error the mutation closure produced.
    ///
    /// # Panics
    ///
    /// Panics if both ids name the same wallet; callers reject
    /// self-transfers before reaching the store.
    pub fn with_wallet_pair<T, F>(
        &self,
        first: WalletId,
        second: WalletId,
        f: F,
    ) -> Result<T, WalletError>
    where
        F: FnOnce(&mut Wallet, &mut Wallet) -> Result<T, WalletError>,
    {
        assert_ne!(first, second, "pair update requires two distinct wallets");

        let first_row = self.row(first)?;
        let second_row = self.row(second)?;

        // Lower wallet id locks first to rule out lock-order inversion
        // between concurrent pair updates.
        let (mut first_guard, mut second_guard) = if first < second {
            let a = first_row.lock();
            let b = second_row.lock();
            (a, b)
        } else {
            let b = second_row.lock();
            let a = first_row.lock();
            (a, b)
        };

        let mut first_draft = first_guard.clone();
        let mut second_draft = second_guard.clone();
        let out = f(&mut first_draft, &mut second_draft)?;
        *first_guard = first_draft;
        *second_guard = second_draft;
        Ok(out)
    }

    /// Snapshot all wallets, sorted by wallet id
    ///
    /// Each row is copied under its own lock; the snapshot is per-wallet
    /// consistent and used for final output and admin listings.
    pub fn snapshot(&self) -> Vec<Wallet> {
        let mut wallets: Vec<Wallet> = self
            .wallets
            .iter()
            .map(|entry| entry.value().lock().clone())
            .collect();
        wallets.sort_by_key(|wallet| wallet.wallet_id);
        wallets
    }

    fn row(&self, wallet_id: WalletId) -> Result<Arc<Mutex<Wallet>>, WalletError> {
        self.wallets
            .get(&wallet_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| WalletError::wallet_not_found(wallet_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn store_with_wallets(ids: &[WalletId]) -> LedgerStore {
        let store = LedgerStore::new();
        for &id in ids {
            store.insert(Wallet::new(id, id));
        }
        store
    }

    #[test]
    fn test_get_missing_wallet_fails() {
        let store = LedgerStore::new();
        assert!(matches!(
            store.get(1),
            Err(WalletError::WalletNotFound { wallet: 1 })
        ));
    }

    #[test]
    fn test_insert_and_get() {
        let store = store_with_wallets(&[1]);
        let wallet = store.get(1).unwrap();
        assert_eq!(wallet.wallet_id, 1);
        assert_eq!(wallet.balance, Decimal::ZERO);
    }

    #[test]
    fn test_with_wallet_commits_on_ok() {
        let store = store_with_wallets(&[1]);

        store
            .with_wallet(1, |wallet| {
                wallet.balance = Decimal::new(10000, 2);
                Ok(())
            })
            .unwrap();

        assert_eq!(store.get(1).unwrap().balance, Decimal::new(10000, 2));
    }

    #[test]
    fn test_with_wallet_discards_on_err() {
        let store = store_with_wallets(&[1]);

        let result: Result<(), WalletError> = store.with_wallet(1, |wallet| {
            wallet.balance = Decimal::new(10000, 2);
            Err(WalletError::wallet_frozen(1))
        });

        assert!(result.is_err());
        assert_eq!(store.get(1).unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_with_wallet_pair_commits_both() {
        let store = store_with_wallets(&[1, 2]);

        store
            .with_wallet_pair(2, 1, |second, first| {
                second.balance = Decimal::new(4000, 2);
                first.balance = Decimal::new(6000, 2);
                Ok(())
            })
            .unwrap();

        assert_eq!(store.get(2).unwrap().balance, Decimal::new(4000, 2));
        assert_eq!(store.get(1).unwrap().balance, Decimal::new(6000, 2));
    }

    #[test]
    fn test_with_wallet_pair_discards_both_on_err() {
        let store = store_with_wallets(&[1, 2]);

        let result: Result<(), WalletError> = store.with_wallet_pair(1, 2, |a, b| {
            a.balance = Decimal::new(100, 2);
            b.balance = Decimal::new(100, 2);
            Err(WalletError::insufficient_funds(
                1,
                Decimal::ZERO,
                Decimal::new(100, 2),
            ))
        });

        assert!(result.is_err());
        assert_eq!(store.get(1).unwrap().balance, Decimal::ZERO);
        assert_eq!(store.get(2).unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_with_wallet_pair_missing_wallet_fails() {
        let store = store_with_wallets(&[1]);
        let result = store.with_wallet_pair(1, 99, |_, _| Ok(()));
        assert!(matches!(
            result,
            Err(WalletError::WalletNotFound { wallet: 99 })
        ));
    }

    #[test]
    fn test_snapshot_sorted_by_wallet_id() {
        let store = store_with_wallets(&[3, 1, 2]);
        let ids: Vec<WalletId> = store.snapshot().iter().map(|w| w.wallet_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    // Two threads hammering the same pair from opposite directions must
    // neither deadlock nor lose an update.
    #[test]
    fn test_opposite_order_pair_updates_do_not_deadlock() {
        use std::thread;

        let store = Arc::new(store_with_wallets(&[1, 2]));
        let mut handles = vec![];

        for direction in 0..2u64 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let (from, to) = if direction == 0 { (1, 2) } else { (2, 1) };
                for _ in 0..1000 {
                    store
                        .with_wallet_pair(from, to, |sender, receiver| {
                            sender.balance -= Decimal::ONE;
                            receiver.balance += Decimal::ONE;
                            Ok(())
                        })
                        .unwrap();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // Equal traffic in both directions nets to zero.
        assert_eq!(store.get(1).unwrap().balance, Decimal::ZERO);
        assert_eq!(store.get(2).unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_concurrent_single_wallet_updates_are_not_lost() {
        use std::thread;

        let store = Arc::new(store_with_wallets(&[1]));
        let mut handles = vec![];

        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    store
                        .with_wallet(1, |wallet| {
                            wallet.balance += Decimal::ONE;
                            Ok(())
                        })
                        .unwrap();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get(1).unwrap().balance, Decimal::new(4000, 0));
    }
}
