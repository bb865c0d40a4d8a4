//! Transfer engine
//!
//! Moves funds between two wallets under a single atomic unit and appends
//! the transaction record inside that unit: the debit, credit, and log
//! append are all visible or none are. Also hosts the external bank
//! deposit, the only operation that increases total supply.
//!
//! # Precondition order
//!
//! Checked in this order, first failure wins:
//! 1. amount is positive with at most two decimal places
//! 2. sender wallet exists and is active
//! 3. receiver wallet is distinct from the sender and exists
//! 4. sender balance covers the amount (re-checked at commit time under
//!    the wallet locks, so two concurrent transfers from one wallet can
//!    never jointly overspend it)
//!
//! A frozen receiver does not block an incoming transfer; frozen blocks
//! outbound movement only.

use crate::types::{
    validate_amount, Deposit, DepositId, Transaction, WalletError, WalletId,
};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::clock::Clock;
use super::ledger_store::LedgerStore;
use super::transaction_log::TransactionLog;

/// Wallet-to-wallet transfer processing
pub struct TransferEngine {
    ledger: Arc<LedgerStore>,
    log: Arc<TransactionLog>,
    clock: Arc<dyn Clock>,
    deposits: DashMap<DepositId, Deposit>,
    next_deposit_id: AtomicU64,
}

impl TransferEngine {
    /// Create an engine over the shared ledger and transaction log
    pub fn new(ledger: Arc<LedgerStore>, log: Arc<TransactionLog>, clock: Arc<dyn Clock>) -> Self {
        TransferEngine {
            ledger,
            log,
            clock,
            deposits: DashMap::new(),
            next_deposit_id: AtomicU64::new(1),
        }
    }

    /// Transfer funds between two wallets
    ///
    /// On success the sender is debited, the receiver credited, and a
    /// `completed` transaction appended, all within one atomic unit. A
    /// failed precondition leaves every balance and the log untouched.
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - non-positive or sub-cent amount
    /// * `WalletNotFound` - sender or receiver row missing
    /// * `WalletFrozen` - sender wallet is frozen
    /// * `InvalidReceiver` - sender and receiver are the same wallet
    /// * `InsufficientFunds` - sender balance below the amount at commit
    ///   time
    pub fn transfer(
        &self,
        sender_wallet_id: WalletId,
        receiver_wallet_id: WalletId,
        amount: Decimal,
    ) -> Result<Transaction, WalletError> {
        let amount = validate_amount(amount)?;

        // Precondition ordering outside the locks; frozen and funds are
        // re-checked under the locks before commit.
        let sender = self.ledger.get(sender_wallet_id)?;
        if !sender.is_active {
            return Err(WalletError::wallet_frozen(sender_wallet_id));
        }
        if receiver_wallet_id == sender_wallet_id {
            return Err(WalletError::invalid_receiver(sender_wallet_id));
        }
        if !self.ledger.contains(receiver_wallet_id) {
            return Err(WalletError::wallet_not_found(receiver_wallet_id));
        }

        self.ledger
            .with_wallet_pair(sender_wallet_id, receiver_wallet_id, |sender, receiver| {
                if !sender.is_active {
                    return Err(WalletError::wallet_frozen(sender_wallet_id));
                }
                if sender.balance < amount {
                    return Err(WalletError::insufficient_funds(
                        sender_wallet_id,
                        sender.balance,
                        amount,
                    ));
                }

                sender.balance = sender.balance.checked_sub(amount).ok_or_else(|| {
                    WalletError::arithmetic_overflow("transfer", sender_wallet_id)
                })?;
                receiver.balance = receiver.balance.checked_add(amount).ok_or_else(|| {
                    WalletError::arithmetic_overflow("transfer", receiver_wallet_id)
                })?;

                // Appended inside the atomic unit: the entry exists if
                // and only if the debit and credit commit.
                Ok(self.log.append(
                    sender_wallet_id,
                    receiver_wallet_id,
                    amount,
                    self.clock.now(),
                ))
            })
    }

    /// Credit a wallet from an external bank deposit
    ///
    /// Trusted-caller operation: the bank gateway has already
    /// authenticated the request. Frozen wallets may still receive
    /// deposits; frozen blocks outbound movement only.
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - non-positive or sub-cent amount
    /// * `WalletNotFound` - no such wallet
    pub fn deposit(
        &self,
        wallet_id: WalletId,
        amount: Decimal,
        bank_reference: Option<&str>,
    ) -> Result<Deposit, WalletError> {
        let amount = validate_amount(amount)?;

        let receipt = self.ledger.with_wallet(wallet_id, |wallet| {
            wallet.balance = wallet
                .balance
                .checked_add(amount)
                .ok_or_else(|| WalletError::arithmetic_overflow("deposit", wallet_id))?;

            let deposit_id = self.next_deposit_id.fetch_add(1, Ordering::Relaxed);
            Ok(Deposit {
                deposit_id,
                wallet_id,
                amount,
                bank_reference: bank_reference.map(str::to_string),
                deposited_at: self.clock.now(),
            })
        })?;

        self.deposits.insert(receipt.deposit_id, receipt.clone());
        Ok(receipt)
    }

    /// Deposit receipts for a wallet, most recent first
    pub fn deposits_for(&self, wallet_id: WalletId) -> Vec<Deposit> {
        let mut receipts: Vec<Deposit> = self
            .deposits
            .iter()
            .filter(|entry| entry.wallet_id == wallet_id)
            .map(|entry| entry.value().clone())
            .collect();
        receipts.sort_by(|a, b| b.deposit_id.cmp(&a.deposit_id));
        receipts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SystemClock;
    use crate::types::{TransactionStatus, Wallet};

    fn cents(value: i64) -> Decimal {
        Decimal::new(value, 2)
    }

    fn engine_with_wallets(wallets: &[(WalletId, i64)]) -> (TransferEngine, Arc<LedgerStore>) {
        let ledger = Arc::new(LedgerStore::new());
        for &(id, balance) in wallets {
            let mut wallet = Wallet::new(id, id);
            wallet.balance = cents(balance);
            ledger.insert(wallet);
        }
        let log = Arc::new(TransactionLog::new());
        let engine = TransferEngine::new(Arc::clone(&ledger), log, Arc::new(SystemClock));
        (engine, ledger)
    }

    #[test]
    fn test_transfer_moves_funds_and_logs() {
        let (engine, ledger) = engine_with_wallets(&[(1, 10000), (2, 0)]);

        let tx = engine.transfer(1, 2, cents(4000)).unwrap();

        assert_eq!(tx.transaction_id, 1);
        assert_eq!(tx.amount, cents(4000));
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(ledger.get(1).unwrap().balance, cents(6000));
        assert_eq!(ledger.get(2).unwrap().balance, cents(4000));
    }

    #[test]
    fn test_transfer_invalid_amount_checked_first() {
        // Even with a nonexistent sender, the amount fails first.
        let (engine, _) = engine_with_wallets(&[]);
        assert!(matches!(
            engine.transfer(1, 2, cents(0)),
            Err(WalletError::InvalidAmount { .. })
        ));
        assert!(matches!(
            engine.transfer(1, 2, cents(-100)),
            Err(WalletError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_transfer_missing_sender_fails() {
        let (engine, _) = engine_with_wallets(&[(2, 0)]);
        assert!(matches!(
            engine.transfer(1, 2, cents(100)),
            Err(WalletError::WalletNotFound { wallet: 1 })
        ));
    }

    #[test]
    fn test_transfer_frozen_sender_fails() {
        let (engine, ledger) = engine_with_wallets(&[(1, 10000), (2, 0)]);
        ledger
            .with_wallet(1, |w| {
                w.is_active = false;
                Ok(())
            })
            .unwrap();

        assert!(matches!(
            engine.transfer(1, 2, cents(100)),
            Err(WalletError::WalletFrozen { wallet: 1 })
        ));
        assert_eq!(ledger.get(1).unwrap().balance, cents(10000));
    }

    #[test]
    fn test_transfer_to_self_fails() {
        let (engine, _) = engine_with_wallets(&[(1, 10000)]);
        assert!(matches!(
            engine.transfer(1, 1, cents(100)),
            Err(WalletError::InvalidReceiver { wallet: 1 })
        ));
    }

    #[test]
    fn test_transfer_missing_receiver_fails() {
        let (engine, _) = engine_with_wallets(&[(1, 10000)]);
        assert!(matches!(
            engine.transfer(1, 9, cents(100)),
            Err(WalletError::WalletNotFound { wallet: 9 })
        ));
    }

    #[test]
    fn test_transfer_insufficient_funds_leaves_balances_untouched() {
        let (engine, ledger) = engine_with_wallets(&[(1, 5000), (2, 0)]);

        let result = engine.transfer(1, 2, cents(10000));

        assert!(matches!(
            result,
            Err(WalletError::InsufficientFunds { wallet: 1, .. })
        ));
        assert_eq!(ledger.get(1).unwrap().balance, cents(5000));
        assert_eq!(ledger.get(2).unwrap().balance, cents(0));
    }

    #[test]
    fn test_frozen_receiver_still_receives() {
        let (engine, ledger) = engine_with_wallets(&[(1, 10000), (2, 0)]);
        ledger
            .with_wallet(2, |w| {
                w.is_active = false;
                Ok(())
            })
            .unwrap();

        assert!(engine.transfer(1, 2, cents(4000)).is_ok());
        assert_eq!(ledger.get(2).unwrap().balance, cents(4000));
    }

    #[test]
    fn test_failed_transfer_appends_nothing() {
        let (engine, _) = engine_with_wallets(&[(1, 5000), (2, 0)]);

        let _ = engine.transfer(1, 2, cents(10000));

        assert!(engine.log.is_empty());
    }

    #[test]
    fn test_deposit_credits_wallet_and_records_receipt() {
        let (engine, ledger) = engine_with_wallets(&[(1, 0)]);

        let receipt = engine.deposit(1, cents(10000), Some("BANKREF-77")).unwrap();

        assert_eq!(receipt.deposit_id, 1);
        assert_eq!(receipt.amount, cents(10000));
        assert_eq!(receipt.bank_reference.as_deref(), Some("BANKREF-77"));
        assert_eq!(ledger.get(1).unwrap().balance, cents(10000));
    }

    #[test]
    fn test_deposit_unknown_wallet_fails() {
        let (engine, _) = engine_with_wallets(&[]);
        assert!(matches!(
            engine.deposit(9, cents(100), None),
            Err(WalletError::WalletNotFound { wallet: 9 })
        ));
    }

    #[test]
    fn test_deposits_for_most_recent_first() {
        let (engine, _) = engine_with_wallets(&[(1, 0), (2, 0)]);
        engine.deposit(1, cents(100), None).unwrap();
        engine.deposit(2, cents(200), None).unwrap();
        engine.deposit(1, cents(300), None).unwrap();

        let receipts = engine.deposits_for(1);
        assert_eq!(receipts.len(), 2);
        assert_eq!(receipts[0].amount, cents(300));
        assert_eq!(receipts[1].amount, cents(100));
    }

    // Two simultaneous transfers from the same wallet cannot both succeed
    // when their combined amount exceeds the balance.
    #[test]
    fn test_concurrent_transfers_cannot_overspend() {
        use std::thread;

        let (engine, ledger) = engine_with_wallets(&[(1, 10000), (2, 0), (3, 0)]);
        let engine = Arc::new(engine);

        let mut handles = vec![];
        for receiver in [2u64, 3u64] {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                engine.transfer(1, receiver, cents(7000)).is_ok()
            }));
        }

        let successes = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(ledger.get(1).unwrap().balance, cents(3000));
    }

    // Conservation: transfers move money, they never create or destroy it.
    #[test]
    fn test_conservation_under_concurrent_transfers() {
        use std::thread;

        let (engine, ledger) = engine_with_wallets(&[(1, 100000), (2, 100000), (3, 100000)]);
        let engine = Arc::new(engine);

        let mut handles = vec![];
        for (from, to) in [(1u64, 2u64), (2, 3), (3, 1), (1, 3), (2, 1), (3, 2)] {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                for _ in 0..200 {
                    // Ignore insufficient-funds rejections; they leave
                    // balances untouched.
                    let _ = engine.transfer(from, to, cents(700));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let total: Decimal = ledger
            .snapshot()
            .iter()
            .map(|w| w.balance + w.hold_balance)
            .sum();
        assert_eq!(total, cents(300000));
    }
}
