//! Append-only transaction log
//!
//! Every committed transfer appends exactly one entry here. Entries are
//! immutable apart from the informational `refunded` marking applied when
//! a dispute is accepted; there are no update or delete operations.
//!
//! The log is queried by users ("transactions involving my wallet") and
//! by the dispute engine (amount and parties of a contested transfer).

use crate::types::{Transaction, TransactionId, TransactionStatus, WalletError, WalletId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};

/// Append-only store of committed transfers
#[derive(Debug)]
pub struct TransactionLog {
    entries: DashMap<TransactionId, Transaction>,
    next_id: AtomicU64,
}

impl TransactionLog {
    /// Create an empty log; ids are assigned sequentially from 1
    pub fn new() -> Self {
        TransactionLog {
            entries: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append a completed transfer and return the new entry
    ///
    /// Called from inside the transfer's atomic unit, after the debit and
    /// credit have been validated: an append happens if and only if the
    /// balance movement commits.
    pub fn append(
        &self,
        sender_wallet_id: WalletId,
        receiver_wallet_id: WalletId,
        amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Transaction {
        let transaction_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let transaction = Transaction {
            transaction_id,
            sender_wallet_id,
            receiver_wallet_id,
            amount,
            status: TransactionStatus::Completed,
            created_at,
        };
        self.entries.insert(transaction_id, transaction.clone());
        transaction
    }

    /// Look up a transaction by id
    pub fn get(&self, transaction_id: TransactionId) -> Option<Transaction> {
        self.entries
            .get(&transaction_id)
            .map(|entry| entry.value().clone())
    }

    /// All transactions where any of the given wallets is sender or receiver
    ///
    /// Results are sorted by transaction id. Fetches are explicit and
    /// batched; there is no lazy relation loading anywhere in the system.
    pub fn involving(&self, wallet_ids: &[WalletId]) -> Vec<Transaction> {
        let mut matches: Vec<Transaction> = self
            .entries
            .iter()
            .filter(|entry| {
                wallet_ids.contains(&entry.sender_wallet_id)
                    || wallet_ids.contains(&entry.receiver_wallet_id)
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|tx| tx.transaction_id);
        matches
    }

    /// Mark a transaction as refunded after an accepted dispute
    ///
    /// Informational only: the ledger effect of the dispute is carried by
    /// the balance and hold movements, not by this flag.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the id is unknown.
    pub fn mark_refunded(&self, transaction_id: TransactionId) -> Result<(), WalletError> {
        let mut entry = self
            .entries
            .get_mut(&transaction_id)
            .ok_or_else(|| WalletError::transaction_not_found(transaction_id))?;
        entry.status = TransactionStatus::Refunded;
        Ok(())
    }

    /// Number of entries in the log
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}
