//! Operation replay dispatcher
//!
//! Binds the typed CSV operations to the service and admin surfaces. One
//! `Replay` owns a fresh [`WalletService`], an [`AdminOversight`] layer
//! over it, and the audit trail; the strategies feed it operations in
//! file order and read the final wallet states back out.

use crate::core::{AdminOversight, AuditTrail, WalletService};
use crate::io::csv_format::Operation;
use crate::types::{AuditRecord, Wallet, WalletError};
use std::sync::Arc;
use tracing::debug;

/// A service instance plus the dispatch from typed operations onto it
pub struct Replay {
    service: Arc<WalletService>,
    admin: AdminOversight<AuditTrail>,
    audit: Arc<AuditTrail>,
}

impl Replay {
    /// Create a replay over a fresh service and empty audit trail
    pub fn new() -> Self {
        let service = Arc::new(WalletService::new());
        let audit = Arc::new(AuditTrail::new());
        let admin = AdminOversight::new(Arc::clone(&service), Arc::clone(&audit));
        Replay {
            service,
            admin,
            audit,
        }
    }

    /// Apply one operation
    ///
    /// Business-rule rejections come back as typed errors; the caller
    /// decides whether to log and continue (the strategies do). An admin
    /// action that committed but failed to audit is logged here and
    /// still counts as applied.
    pub fn apply(&self, operation: Operation) -> Result<(), WalletError> {
        match operation {
            Operation::Register {
                full_name,
                email,
                phone,
            } => {
                self.service.register_user(&full_name, &email, &phone)?;
            }
            Operation::SubmitKyc {
                user,
                document_type,
                document_number,
                document_ref,
            } => {
                self.service.submit_verification(
                    user,
                    &document_type,
                    &document_number,
                    &document_ref,
                )?;
            }
            Operation::ReviewKyc {
                admin,
                kyc,
                verdict,
            } => {
                self.warn_unaudited(
                    self.admin
                        .review_verification(admin, kyc, verdict)?
                        .audit_warning,
                );
            }
            Operation::CreateWallet { user } => {
                self.service.create_wallet(user)?;
            }
            Operation::Deposit {
                wallet,
                amount,
                bank_reference,
            } => {
                self.service
                    .deposit(wallet, amount, bank_reference.as_deref())?;
            }
            Operation::Transfer {
                user,
                to_wallet,
                amount,
            } => {
                self.service.transfer(user, to_wallet, amount)?;
            }
            Operation::FileDispute {
                user,
                transaction,
                reason,
            } => {
                self.service.file_dispute(user, transaction, &reason)?;
            }
            Operation::ReviewDispute { admin, dispute } => {
                self.warn_unaudited(self.admin.set_under_review(admin, dispute)?.audit_warning);
            }
            Operation::ResolveDispute {
                admin,
                dispute,
                resolution,
            } => {
                self.warn_unaudited(
                    self.admin
                        .resolve_dispute(admin, dispute, resolution)?
                        .audit_warning,
                );
            }
            Operation::FreezeWallet { admin, wallet } => {
                self.warn_unaudited(self.admin.freeze_wallet(admin, wallet)?.audit_warning);
            }
            Operation::UnfreezeWallet { admin, wallet } => {
                self.warn_unaudited(self.admin.unfreeze_wallet(admin, wallet)?.audit_warning);
            }
            Operation::SuspendUser { admin, user } => {
                self.warn_unaudited(self.admin.suspend_user(admin, user)?.audit_warning);
            }
            Operation::ActivateUser { admin, user } => {
                self.warn_unaudited(self.admin.activate_user(admin, user)?.audit_warning);
            }
        }
        Ok(())
    }

    /// Final wallet states, sorted by wallet id
    pub fn wallets(&self) -> Vec<Wallet> {
        self.service.ledger().snapshot()
    }

    /// The audit trail accumulated during the replay
    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.audit.records()
    }

    /// The underlying service
    pub fn service(&self) -> &WalletService {
        &self.service
    }

    fn warn_unaudited(&self, warning: Option<String>) {
        if let Some(warning) = warning {
            debug!(%warning, "admin action applied without audit record");
        }
    }
}

impl Default for Replay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DisputeResolution, KycVerdict};
    use rust_decimal::Decimal;

    fn cents(value: i64) -> Decimal {
        Decimal::new(value, 2)
    }

    fn onboard(replay: &Replay, name: &str, email: &str, phone: &str, kyc_id: u64, user: u64) {
        replay
            .apply(Operation::Register {
                full_name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
            })
            .unwrap();
        replay
            .apply(Operation::SubmitKyc {
                user,
                document_type: "passport".to_string(),
                document_number: "A1".to_string(),
                document_ref: "ref".to_string(),
            })
            .unwrap();
        replay
            .apply(Operation::ReviewKyc {
                admin: 1,
                kyc: kyc_id,
                verdict: KycVerdict::Verified,
            })
            .unwrap();
        replay.apply(Operation::CreateWallet { user }).unwrap();
    }

    #[test]
    fn test_full_dispute_cycle_through_operations() {
        let replay = Replay::new();
        onboard(&replay, "Ada Obi", "ada@example.com", "0801", 1, 1);
        onboard(&replay, "Ben Eze", "ben@example.com", "0802", 2, 2);

        replay
            .apply(Operation::Deposit {
                wallet: 1,
                amount: cents(10000),
                bank_reference: None,
            })
            .unwrap();
        replay
            .apply(Operation::Transfer {
                user: 1,
                to_wallet: 2,
                amount: cents(4000),
            })
            .unwrap();
        replay
            .apply(Operation::FileDispute {
                user: 1,
                transaction: 1,
                reason: "no goods".to_string(),
            })
            .unwrap();
        replay
            .apply(Operation::ResolveDispute {
                admin: 1,
                dispute: 1,
                resolution: DisputeResolution::Accepted,
            })
            .unwrap();

        let wallets = replay.wallets();
        assert_eq!(wallets[0].balance, cents(10000));
        assert_eq!(wallets[1].balance, cents(0));
        assert_eq!(wallets[1].hold_balance, cents(0));

        // Two KYC reviews plus the resolution were audited.
        let actions: Vec<String> = replay
            .audit_records()
            .iter()
            .map(|record| record.action.clone())
            .collect();
        assert_eq!(actions, vec!["verify_kyc", "verify_kyc", "accept_dispute"]);
    }

    #[test]
    fn test_business_rejection_propagates() {
        let replay = Replay::new();
        onboard(&replay, "Ada Obi", "ada@example.com", "0801", 1, 1);
        onboard(&replay, "Ben Eze", "ben@example.com", "0802", 2, 2);

        let result = replay.apply(Operation::Transfer {
            user: 1,
            to_wallet: 2,
            amount: cents(10000),
        });
        assert!(matches!(
            result,
            Err(WalletError::InsufficientFunds { .. })
        ));
    }
}
