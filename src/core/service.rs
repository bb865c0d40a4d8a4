//! Wallet service facade
//!
//! Wires the directory, verification registry, ledger, and engines
//! together and exposes the user-facing operations. The service trusts
//! the authenticated identity passed to each call; credentials and
//! tokens live in an external collaborator.
//!
//! Visibility follows ownership: a user asking for a transaction or
//! dispute they are not party to gets a not-found answer, never a peek
//! at someone else's record.

use crate::types::{
    Deposit, Dispute, DisputeId, KycRecord, KycStatus, Transaction, TransactionId, User, UserId,
    Wallet, WalletError, WalletId,
};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::dispute_engine::DisputeEngine;
use super::kyc_registry::KycRegistry;
use super::ledger_store::LedgerStore;
use super::transaction_log::TransactionLog;
use super::transfer_engine::TransferEngine;
use super::user_directory::UserDirectory;
use super::wallet_manager::WalletManager;

/// The assembled wallet ledger backend
///
/// Safe to share across request-handling threads behind an `Arc`; every
/// component supplies its own synchronization.
pub struct WalletService {
    clock: Arc<dyn Clock>,
    users: UserDirectory,
    kyc: KycRegistry,
    ledger: Arc<LedgerStore>,
    log: Arc<TransactionLog>,
    wallets: WalletManager,
    transfers: TransferEngine,
    disputes: DisputeEngine,
}

impl WalletService {
    /// Assemble a service on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Assemble a service on an injected clock (used by tests to steer
    /// the dispute window)
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let ledger = Arc::new(LedgerStore::new());
        let log = Arc::new(TransactionLog::new());

        WalletService {
            users: UserDirectory::new(),
            kyc: KycRegistry::new(Arc::clone(&clock)),
            wallets: WalletManager::new(Arc::clone(&ledger)),
            transfers: TransferEngine::new(
                Arc::clone(&ledger),
                Arc::clone(&log),
                Arc::clone(&clock),
            ),
            disputes: DisputeEngine::new(
                Arc::clone(&ledger),
                Arc::clone(&log),
                Arc::clone(&clock),
            ),
            ledger,
            log,
            clock,
        }
    }

    /// Register a new user
    pub fn register_user(
        &self,
        full_name: &str,
        email: &str,
        phone: &str,
    ) -> Result<User, WalletError> {
        self.users.register(full_name, email, phone)
    }

    /// Submit a verification document for an existing user
    pub fn submit_verification(
        &self,
        user_id: UserId,
        document_type: &str,
        document_number: &str,
        document_ref: &str,
    ) -> Result<KycRecord, WalletError> {
        self.users.get(user_id)?;
        self.kyc
            .submit(user_id, document_type, document_number, document_ref)
    }

    /// The verification fact for a user
    pub fn verification_status(&self, user_id: UserId) -> KycStatus {
        self.kyc.status_of(user_id)
    }

    /// Open a wallet for a verified user
    pub fn create_wallet(&self, user_id: UserId) -> Result<Wallet, WalletError> {
        self.users.get(user_id)?;
        let verification = self.kyc.status_of(user_id);
        self.wallets.create_wallet(user_id, verification)
    }

    /// The caller's wallet
    pub fn get_wallet(&self, user_id: UserId) -> Result<Wallet, WalletError> {
        self.wallets.wallet_of(user_id)
    }

    /// Credit a wallet from the external bank gateway (trusted caller)
    pub fn deposit(
        &self,
        wallet_id: WalletId,
        amount: Decimal,
        bank_reference: Option<&str>,
    ) -> Result<Deposit, WalletError> {
        self.transfers.deposit(wallet_id, amount, bank_reference)
    }

    /// Deposit receipts for a wallet, most recent first
    pub fn deposits_for(&self, wallet_id: WalletId) -> Vec<Deposit> {
        self.transfers.deposits_for(wallet_id)
    }

    /// Transfer from the caller's wallet to a receiver wallet
    pub fn transfer(
        &self,
        user_id: UserId,
        receiver_wallet_id: WalletId,
        amount: Decimal,
    ) -> Result<Transaction, WalletError> {
        let sender = self.wallets.wallet_of(user_id)?;
        self.transfers
            .transfer(sender.wallet_id, receiver_wallet_id, amount)
    }

    /// All transactions involving the caller's wallet
    pub fn list_transactions(&self, user_id: UserId) -> Vec<Transaction> {
        match self.wallets.owner_wallet_id(user_id) {
            Some(wallet_id) => self.log.involving(&[wallet_id]),
            None => Vec::new(),
        }
    }

    /// One transaction, visible only to its sender or receiver
    pub fn get_transaction(
        &self,
        user_id: UserId,
        transaction_id: TransactionId,
    ) -> Result<Transaction, WalletError> {
        let transaction = self
            .log
            .get(transaction_id)
            .ok_or_else(|| WalletError::transaction_not_found(transaction_id))?;

        let wallet_id = self.wallets.owner_wallet_id(user_id);
        if wallet_id != Some(transaction.sender_wallet_id)
            && wallet_id != Some(transaction.receiver_wallet_id)
        {
            return Err(WalletError::transaction_not_found(transaction_id));
        }
        Ok(transaction)
    }

    /// File a dispute against a transaction the caller is party to
    pub fn file_dispute(
        &self,
        user_id: UserId,
        transaction_id: TransactionId,
        reason: &str,
    ) -> Result<Dispute, WalletError> {
        self.disputes.file_dispute(user_id, transaction_id, reason)
    }

    /// All disputes filed by the caller
    pub fn list_disputes(&self, user_id: UserId) -> Vec<Dispute> {
        self.disputes.disputes_of(user_id)
    }

    /// One dispute, visible only to its filer
    pub fn get_dispute(
        &self,
        user_id: UserId,
        dispute_id: DisputeId,
    ) -> Result<Dispute, WalletError> {
        let dispute = self
            .disputes
            .get(dispute_id)
            .ok_or_else(|| WalletError::dispute_not_found(dispute_id))?;
        if dispute.filed_by != user_id {
            return Err(WalletError::dispute_not_found(dispute_id));
        }
        Ok(dispute)
    }

    // Component handles for the admin layer and replay front-end.

    /// The user directory
    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// The verification registry
    pub fn kyc(&self) -> &KycRegistry {
        &self.kyc
    }

    /// The wallet lifecycle manager
    pub fn wallet_manager(&self) -> &WalletManager {
        &self.wallets
    }

    /// The dispute engine
    pub fn dispute_engine(&self) -> &DisputeEngine {
        &self.disputes
    }

    /// The ledger store
    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// The transaction log
    pub fn transaction_log(&self) -> &TransactionLog {
        &self.log
    }

    /// The clock the service was assembled on
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}

impl Default for WalletService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DisputeResolution, DisputeStatus, KycVerdict, TransactionStatus};

    fn cents(value: i64) -> Decimal {
        Decimal::new(value, 2)
    }

    /// Register, verify, and open a wallet; returns (user_id, wallet_id).
    fn onboarded(service: &WalletService, name: &str, email: &str, phone: &str) -> (UserId, WalletId) {
        let user = service.register_user(name, email, phone).unwrap();
        let kyc = service
            .submit_verification(user.user_id, "passport", "A1", "ref")
            .unwrap();
        service.kyc().review(kyc.kyc_id, KycVerdict::Verified).unwrap();
        let wallet = service.create_wallet(user.user_id).unwrap();
        (user.user_id, wallet.wallet_id)
    }

    #[test]
    fn test_create_wallet_requires_verification() {
        let service = WalletService::new();
        let user = service
            .register_user("Ada Obi", "ada@example.com", "0801")
            .unwrap();

        // No submission at all.
        assert!(matches!(
            service.create_wallet(user.user_id),
            Err(WalletError::VerificationRequired { .. })
        ));

        // Pending submission is still not enough.
        service
            .submit_verification(user.user_id, "passport", "A1", "ref")
            .unwrap();
        assert!(matches!(
            service.create_wallet(user.user_id),
            Err(WalletError::VerificationRequired { .. })
        ));
    }

    #[test]
    fn test_create_wallet_unknown_user_fails() {
        let service = WalletService::new();
        assert!(matches!(
            service.create_wallet(9),
            Err(WalletError::UserNotFound { user: 9 })
        ));
    }

    #[test]
    fn test_submit_verification_requires_registered_user() {
        let service = WalletService::new();
        assert!(matches!(
            service.submit_verification(9, "passport", "A1", "ref"),
            Err(WalletError::UserNotFound { user: 9 })
        ));
    }

    #[test]
    fn test_transfer_requires_sender_wallet() {
        let service = WalletService::new();
        let user = service
            .register_user("Ada Obi", "ada@example.com", "0801")
            .unwrap();

        assert!(matches!(
            service.transfer(user.user_id, 2, cents(100)),
            Err(WalletError::NoWallet { .. })
        ));
    }

    #[test]
    fn test_transaction_visibility_limited_to_parties() {
        let service = WalletService::new();
        let (ada, ada_wallet) = onboarded(&service, "Ada Obi", "ada@example.com", "0801");
        let (ben, ben_wallet) = onboarded(&service, "Ben Eze", "ben@example.com", "0802");
        let (cleo, _) = onboarded(&service, "Cleo Ma", "cleo@example.com", "0803");

        service.deposit(ada_wallet, cents(10000), None).unwrap();
        let tx = service.transfer(ada, ben_wallet, cents(4000)).unwrap();

        assert!(service.get_transaction(ada, tx.transaction_id).is_ok());
        assert!(service.get_transaction(ben, tx.transaction_id).is_ok());
        assert!(matches!(
            service.get_transaction(cleo, tx.transaction_id),
            Err(WalletError::TransactionNotFound { .. })
        ));
    }

    #[test]
    fn test_dispute_visibility_limited_to_filer() {
        let service = WalletService::new();
        let (ada, ada_wallet) = onboarded(&service, "Ada Obi", "ada@example.com", "0801");
        let (ben, ben_wallet) = onboarded(&service, "Ben Eze", "ben@example.com", "0802");

        service.deposit(ada_wallet, cents(10000), None).unwrap();
        let tx = service.transfer(ada, ben_wallet, cents(4000)).unwrap();
        let dispute = service
            .file_dispute(ada, tx.transaction_id, "no goods")
            .unwrap();

        assert!(service.get_dispute(ada, dispute.dispute_id).is_ok());
        assert!(matches!(
            service.get_dispute(ben, dispute.dispute_id),
            Err(WalletError::DisputeNotFound { .. })
        ));
        assert_eq!(service.list_disputes(ada).len(), 1);
        assert!(service.list_disputes(ben).is_empty());
    }

    #[test]
    fn test_list_transactions_covers_both_directions() {
        let service = WalletService::new();
        let (ada, ada_wallet) = onboarded(&service, "Ada Obi", "ada@example.com", "0801");
        let (ben, ben_wallet) = onboarded(&service, "Ben Eze", "ben@example.com", "0802");

        service.deposit(ada_wallet, cents(10000), None).unwrap();
        service.deposit(ben_wallet, cents(10000), None).unwrap();
        service.transfer(ada, ben_wallet, cents(1000)).unwrap();
        service.transfer(ben, ada_wallet, cents(2000)).unwrap();

        assert_eq!(service.list_transactions(ada).len(), 2);
        assert_eq!(service.list_transactions(ben).len(), 2);
        assert!(service.list_transactions(999).is_empty());
    }

    // The full ledger walk from the product brief: transfer, dispute,
    // then each resolution branch.
    #[test]
    fn test_dispute_accepted_returns_funds_to_sender() {
        let service = WalletService::new();
        let (ada, ada_wallet) = onboarded(&service, "Ada Obi", "ada@example.com", "0801");
        let (_, ben_wallet) = onboarded(&service, "Ben Eze", "ben@example.com", "0802");

        service.deposit(ada_wallet, cents(10000), None).unwrap();
        let tx = service.transfer(ada, ben_wallet, cents(4000)).unwrap();

        assert_eq!(service.get_wallet(ada).unwrap().balance, cents(6000));
        let ben_state = service.ledger().get(ben_wallet).unwrap();
        assert_eq!(ben_state.balance, cents(4000));

        let dispute = service
            .file_dispute(ada, tx.transaction_id, "no goods")
            .unwrap();
        let ben_state = service.ledger().get(ben_wallet).unwrap();
        assert_eq!(ben_state.balance, cents(0));
        assert_eq!(ben_state.hold_balance, cents(4000));
        assert_eq!(dispute.status, DisputeStatus::Open);

        let resolved = service
            .dispute_engine()
            .resolve_dispute(dispute.dispute_id, DisputeResolution::Accepted)
            .unwrap();

        assert_eq!(resolved.status, DisputeStatus::Resolved);
        assert_eq!(service.get_wallet(ada).unwrap().balance, cents(10000));
        let ben_state = service.ledger().get(ben_wallet).unwrap();
        assert_eq!(ben_state.balance, cents(0));
        assert_eq!(ben_state.hold_balance, cents(0));
        assert_eq!(
            service.transaction_log().get(tx.transaction_id).unwrap().status,
            TransactionStatus::Refunded
        );
    }

    #[test]
    fn test_dispute_rejected_restores_receiver() {
        let service = WalletService::new();
        let (ada, ada_wallet) = onboarded(&service, "Ada Obi", "ada@example.com", "0801");
        let (_, ben_wallet) = onboarded(&service, "Ben Eze", "ben@example.com", "0802");

        service.deposit(ada_wallet, cents(10000), None).unwrap();
        let tx = service.transfer(ada, ben_wallet, cents(4000)).unwrap();
        let dispute = service
            .file_dispute(ada, tx.transaction_id, "no goods")
            .unwrap();

        let resolved = service
            .dispute_engine()
            .resolve_dispute(dispute.dispute_id, DisputeResolution::Rejected)
            .unwrap();

        assert_eq!(resolved.status, DisputeStatus::Rejected);
        assert_eq!(service.get_wallet(ada).unwrap().balance, cents(6000));
        let ben_state = service.ledger().get(ben_wallet).unwrap();
        assert_eq!(ben_state.balance, cents(4000));
        assert_eq!(ben_state.hold_balance, cents(0));
    }

    // Deposits are the only supply increase; everything after conserves
    // the total across balance and hold.
    #[test]
    fn test_conservation_across_dispute_lifecycle() {
        let service = WalletService::new();
        let (ada, ada_wallet) = onboarded(&service, "Ada Obi", "ada@example.com", "0801");
        let (_, ben_wallet) = onboarded(&service, "Ben Eze", "ben@example.com", "0802");

        service.deposit(ada_wallet, cents(10000), None).unwrap();

        let total = |service: &WalletService| -> Decimal {
            service
                .ledger()
                .snapshot()
                .iter()
                .map(|w| w.balance + w.hold_balance)
                .sum()
        };
        assert_eq!(total(&service), cents(10000));

        let tx = service.transfer(ada, ben_wallet, cents(4000)).unwrap();
        assert_eq!(total(&service), cents(10000));

        let dispute = service
            .file_dispute(ada, tx.transaction_id, "no goods")
            .unwrap();
        assert_eq!(total(&service), cents(10000));

        service
            .dispute_engine()
            .resolve_dispute(dispute.dispute_id, DisputeResolution::Accepted)
            .unwrap();
        assert_eq!(total(&service), cents(10000));
    }
}
