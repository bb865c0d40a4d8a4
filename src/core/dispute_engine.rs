//! Dispute/hold engine
//!
//! Filing a dispute moves the contested amount out of the receiver's
//! available balance into its hold balance, atomically with the creation
//! of the dispute record. Resolution releases the hold to exactly one
//! party: back to the receiver when the dispute is rejected, or to the
//! sender when it is accepted.
//!
//! The hold is enforced even if the receiver has already spent the
//! funds: the receiver's balance may go negative, which represents a
//! debt owed back to the ledger, not an error.
//!
//! # State machine
//!
//! `open → resolved | rejected`, with an optional `under_review`
//! annotation an admin may set before the final decision. Nothing forces
//! the intermediate step; terminal states accept no further transitions.

use crate::types::{
    Dispute, DisputeId, DisputeResolution, DisputeStatus, TransactionId, UserId, WalletError,
};
use chrono::TimeDelta;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::clock::Clock;
use super::ledger_store::LedgerStore;
use super::transaction_log::TransactionLog;

/// Length of the dispute filing window, in days
///
/// A transaction strictly older than this cannot be disputed; a filing at
/// exactly the boundary still goes through.
pub const DISPUTE_WINDOW_DAYS: i64 = 30;

/// Dispute lifecycle and hold management
pub struct DisputeEngine {
    ledger: Arc<LedgerStore>,
    log: Arc<TransactionLog>,
    clock: Arc<dyn Clock>,
    disputes: DashMap<DisputeId, Dispute>,
    by_transaction: DashMap<TransactionId, DisputeId>,
    next_id: AtomicU64,
}

impl DisputeEngine {
    /// Create an engine over the shared ledger and transaction log
    pub fn new(ledger: Arc<LedgerStore>, log: Arc<TransactionLog>, clock: Arc<dyn Clock>) -> Self {
        DisputeEngine {
            ledger,
            log,
            clock,
            disputes: DashMap::new(),
            by_transaction: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// File a dispute against a transaction
    ///
    /// The filer must own the sender or receiver wallet of the
    /// transaction. The per-transaction dispute slot is claimed through
    /// atomic insert-if-absent, so two concurrent filings cannot both
    /// succeed; any later failure in the same filing releases the claim.
    ///
    /// Atomically with dispute creation, the receiver wallet is debited
    /// by the transaction amount and its hold balance credited by the
    /// same amount. The debit may drive the balance negative.
    ///
    /// # Errors
    ///
    /// * `TransactionNotFound` - unknown transaction id
    /// * `Forbidden` - filer owns neither side of the transaction
    /// * `WindowExpired` - transaction older than [`DISPUTE_WINDOW_DAYS`]
    /// * `DuplicateDispute` - a dispute already exists for the
    ///   transaction
    pub fn file_dispute(
        &self,
        filer: UserId,
        transaction_id: TransactionId,
        reason: &str,
    ) -> Result<Dispute, WalletError> {
        let transaction = self
            .log
            .get(transaction_id)
            .ok_or_else(|| WalletError::transaction_not_found(transaction_id))?;

        let sender = self.ledger.get(transaction.sender_wallet_id)?;
        let receiver = self.ledger.get(transaction.receiver_wallet_id)?;
        if sender.owner != filer && receiver.owner != filer {
            return Err(WalletError::forbidden(filer, "transaction", transaction_id));
        }

        let age = self.clock.now() - transaction.created_at;
        if age > TimeDelta::days(DISPUTE_WINDOW_DAYS) {
            return Err(WalletError::window_expired(
                transaction_id,
                age.num_days(),
                DISPUTE_WINDOW_DAYS,
            ));
        }

        // Atomic insert-if-absent: the first filer's id sticks, every
        // later filer sees it and conflicts.
        let dispute_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let claimed = *self.by_transaction.entry(transaction_id).or_insert(dispute_id);
        if claimed != dispute_id {
            return Err(WalletError::duplicate_dispute(transaction_id));
        }

        let amount = transaction.amount;
        let held = self.ledger.with_wallet(transaction.receiver_wallet_id, |wallet| {
            // The debit is unconditional; a negative balance is the
            // accepted outcome when the funds were already spent.
            wallet.balance = wallet.balance.checked_sub(amount).ok_or_else(|| {
                WalletError::arithmetic_overflow("file_dispute", wallet.wallet_id)
            })?;
            wallet.hold_balance = wallet.hold_balance.checked_add(amount).ok_or_else(|| {
                WalletError::arithmetic_overflow("file_dispute", wallet.wallet_id)
            })?;
            Ok(())
        });
        if let Err(e) = held {
            self.by_transaction.remove(&transaction_id);
            return Err(e);
        }

        let dispute = Dispute {
            dispute_id,
            transaction_id,
            filed_by: filer,
            reason: reason.to_string(),
            status: DisputeStatus::Open,
            created_at: self.clock.now(),
        };
        self.disputes.insert(dispute_id, dispute.clone());
        Ok(dispute)
    }

    /// Resolve a dispute to one of the two parties
    ///
    /// * `Rejected` — the original transaction stands: the hold is
    ///   released back into the receiver's available balance.
    /// * `Accepted` — the dispute is upheld: the hold is removed and the
    ///   sender's balance credited; the receiver's available balance is
    ///   left where the filing put it. The transaction is marked
    ///   `refunded` (informational only).
    ///
    /// # Errors
    ///
    /// * `DisputeNotFound` - unknown dispute id
    /// * `DisputeClosed` - already resolved or rejected
    /// * `TransactionNotFound` / `WalletNotFound` - underlying records
    ///   unresolvable
    pub fn resolve_dispute(
        &self,
        dispute_id: DisputeId,
        resolution: DisputeResolution,
    ) -> Result<Dispute, WalletError> {
        // The entry guard stays held across the wallet update, so two
        // concurrent resolutions of one dispute serialize here and the
        // loser sees the terminal status.
        let mut entry = self
            .disputes
            .get_mut(&dispute_id)
            .ok_or_else(|| WalletError::dispute_not_found(dispute_id))?;

        if entry.status.is_terminal() {
            return Err(WalletError::dispute_closed(dispute_id, entry.status));
        }

        let transaction = self
            .log
            .get(entry.transaction_id)
            .ok_or_else(|| WalletError::transaction_not_found(entry.transaction_id))?;
        let amount = transaction.amount;

        match resolution {
            DisputeResolution::Rejected => {
                self.ledger
                    .with_wallet(transaction.receiver_wallet_id, |receiver| {
                        receiver.hold_balance =
                            receiver.hold_balance.checked_sub(amount).ok_or_else(|| {
                                WalletError::arithmetic_overflow(
                                    "resolve_dispute",
                                    receiver.wallet_id,
                                )
                            })?;
                        receiver.balance =
                            receiver.balance.checked_add(amount).ok_or_else(|| {
                                WalletError::arithmetic_overflow(
                                    "resolve_dispute",
                                    receiver.wallet_id,
                                )
                            })?;
                        Ok(())
                    })?;
                entry.status = DisputeStatus::Rejected;
            }
            DisputeResolution::Accepted => {
                self.ledger.with_wallet_pair(
                    transaction.sender_wallet_id,
                    transaction.receiver_wallet_id,
                    |sender, receiver| {
                        // Receiver's available balance was already
                        // debited at filing time; only the hold moves.
                        receiver.hold_balance =
                            receiver.hold_balance.checked_sub(amount).ok_or_else(|| {
                                WalletError::arithmetic_overflow(
                                    "resolve_dispute",
                                    receiver.wallet_id,
                                )
                            })?;
                        sender.balance = sender.balance.checked_add(amount).ok_or_else(|| {
                            WalletError::arithmetic_overflow("resolve_dispute", sender.wallet_id)
                        })?;
                        Ok(())
                    },
                )?;
                self.log.mark_refunded(transaction.transaction_id)?;
                entry.status = DisputeStatus::Resolved;
            }
        }

        Ok(entry.clone())
    }

    /// Mark an open dispute as picked up by an admin
    ///
    /// Annotation only; no ledger effect, and resolution from `open`
    /// remains possible without it.
    ///
    /// # Errors
    ///
    /// * `DisputeNotFound` - unknown dispute id
    /// * `DisputeClosed` - already resolved or rejected
    pub fn set_under_review(&self, dispute_id: DisputeId) -> Result<Dispute, WalletError> {
        let mut entry = self
            .disputes
            .get_mut(&dispute_id)
            .ok_or_else(|| WalletError::dispute_not_found(dispute_id))?;

        if entry.status.is_terminal() {
            return Err(WalletError::dispute_closed(dispute_id, entry.status));
        }

        entry.status = DisputeStatus::UnderReview;
        Ok(entry.clone())
    }

    /// Look up a dispute by id
    pub fn get(&self, dispute_id: DisputeId) -> Option<Dispute> {
        self.disputes
            .get(&dispute_id)
            .map(|entry| entry.value().clone())
    }

    /// All disputes filed by one identity, sorted by id
    pub fn disputes_of(&self, filer: UserId) -> Vec<Dispute> {
        let mut disputes: Vec<Dispute> = self
            .disputes
            .iter()
            .filter(|entry| entry.filed_by == filer)
            .map(|entry| entry.value().clone())
            .collect();
        disputes.sort_by_key(|dispute| dispute.dispute_id);
        disputes
    }

    /// All disputes, sorted by id
    pub fn all(&self) -> Vec<Dispute> {
        let mut disputes: Vec<Dispute> = self
            .disputes
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        disputes.sort_by_key(|dispute| dispute.dispute_id);
        disputes
    }
}
