//! Admin oversight layer
//!
//! Thin coordinator over the lifecycle, verification, and dispute
//! components, invoked only by a trusted actor (the is-admin claim is
//! established by the caller's auth collaborator and passed in as the
//! actor id). Every action appends one audit record.
//!
//! Audit writes are best-effort and decoupled from the mutation: the
//! record is appended after the mutation commits, and an append failure
//! surfaces as a warning on the [`Audited`] result rather than rolling
//! anything back.

use crate::types::{
    AdminId, AuditRecord, Audited, Dispute, DisputeId, DisputeResolution, KycId, KycRecord,
    KycVerdict, User, UserId, UserStatus, Wallet, WalletError, WalletId,
};
use std::sync::Arc;
use tracing::warn;

use super::audit_trail::AuditSink;
use super::service::WalletService;

/// Admin operations over a [`WalletService`]
pub struct AdminOversight<S: AuditSink> {
    service: Arc<WalletService>,
    audit: Arc<S>,
}

impl<S: AuditSink> AdminOversight<S> {
    /// Wrap a service with an audit sink
    pub fn new(service: Arc<WalletService>, audit: Arc<S>) -> Self {
        AdminOversight { service, audit }
    }

    /// Suspend a user account
    pub fn suspend_user(
        &self,
        actor: AdminId,
        user_id: UserId,
    ) -> Result<Audited<User>, WalletError> {
        let user = self
            .service
            .users()
            .set_status(user_id, UserStatus::Suspended)?;
        Ok(self.audited(user, actor, "suspend_user", "user", user_id))
    }

    /// Reactivate a suspended user account
    pub fn activate_user(
        &self,
        actor: AdminId,
        user_id: UserId,
    ) -> Result<Audited<User>, WalletError> {
        let user = self
            .service
            .users()
            .set_status(user_id, UserStatus::Active)?;
        Ok(self.audited(user, actor, "activate_user", "user", user_id))
    }

    /// Freeze a wallet (blocks outbound transfers only)
    pub fn freeze_wallet(
        &self,
        actor: AdminId,
        wallet_id: WalletId,
    ) -> Result<Audited<Wallet>, WalletError> {
        let wallet = self.service.wallet_manager().set_active(wallet_id, false)?;
        Ok(self.audited(wallet, actor, "freeze_wallet", "wallet", wallet_id))
    }

    /// Unfreeze a wallet
    pub fn unfreeze_wallet(
        &self,
        actor: AdminId,
        wallet_id: WalletId,
    ) -> Result<Audited<Wallet>, WalletError> {
        let wallet = self.service.wallet_manager().set_active(wallet_id, true)?;
        Ok(self.audited(wallet, actor, "unfreeze_wallet", "wallet", wallet_id))
    }

    /// Approve or reject a verification submission
    pub fn review_verification(
        &self,
        actor: AdminId,
        kyc_id: KycId,
        verdict: KycVerdict,
    ) -> Result<Audited<KycRecord>, WalletError> {
        let record = self.service.kyc().review(kyc_id, verdict)?;
        let action = match verdict {
            KycVerdict::Verified => "verify_kyc",
            KycVerdict::Rejected => "reject_kyc",
        };
        Ok(self.audited(record, actor, action, "kyc", kyc_id))
    }

    /// Annotate a dispute as under review
    pub fn set_under_review(
        &self,
        actor: AdminId,
        dispute_id: DisputeId,
    ) -> Result<Audited<Dispute>, WalletError> {
        let dispute = self.service.dispute_engine().set_under_review(dispute_id)?;
        Ok(self.audited(dispute, actor, "review_dispute", "dispute", dispute_id))
    }

    /// Resolve a dispute to one of the two parties
    pub fn resolve_dispute(
        &self,
        actor: AdminId,
        dispute_id: DisputeId,
        resolution: DisputeResolution,
    ) -> Result<Audited<Dispute>, WalletError> {
        let dispute = self
            .service
            .dispute_engine()
            .resolve_dispute(dispute_id, resolution)?;
        let action = match resolution {
            DisputeResolution::Accepted => "accept_dispute",
            DisputeResolution::Rejected => "reject_dispute",
        };
        Ok(self.audited(dispute, actor, action, "dispute", dispute_id))
    }

    /// All registered users
    pub fn list_users(&self) -> Vec<User> {
        self.service.users().all()
    }

    /// All wallets with their balance state
    pub fn list_wallets(&self) -> Vec<Wallet> {
        self.service.ledger().snapshot()
    }

    /// All verification records
    pub fn list_kyc_records(&self) -> Vec<KycRecord> {
        self.service.kyc().all()
    }

    /// All disputes
    pub fn list_disputes(&self) -> Vec<Dispute> {
        self.service.dispute_engine().all()
    }

    /// Attach the audit outcome to a committed mutation
    fn audited<T>(
        &self,
        value: T,
        actor: AdminId,
        action: &str,
        target_type: &str,
        target_id: u64,
    ) -> Audited<T> {
        let record = AuditRecord {
            actor,
            action: action.to_string(),
            target_type: target_type.to_string(),
            target_id,
            timestamp: self.service.clock().now(),
        };

        let audit_warning = match self.audit.append(record) {
            Ok(()) => None,
            Err(e) => {
                warn!(actor, action, target_type, target_id, error = %e,
                    "audit append failed; mutation stands");
                Some(format!("action applied but not audited: {e}"))
            }
        };

        Audited {
            value,
            audit_warning,
        }
    }
}
