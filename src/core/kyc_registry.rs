//! Identity verification (KYC) registry
//!
//! One submission per identity, reviewed by the admin layer. The registry
//! owns the tri-state verification fact that gates wallet creation; the
//! document itself lives in an external store and is referenced only by
//! an opaque handle.

use crate::core::Clock;
use crate::types::{KycId, KycRecord, KycStatus, KycVerdict, UserId, WalletError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Concurrent registry of verification submissions
pub struct KycRegistry {
    records: DashMap<KycId, KycRecord>,
    by_user: DashMap<UserId, KycId>,
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl KycRegistry {
    /// Create an empty registry; ids are assigned sequentially from 1
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        KycRegistry {
            records: DashMap::new(),
            by_user: DashMap::new(),
            next_id: AtomicU64::new(1),
            clock,
        }
    }

    /// Submit a verification document for review
    ///
    /// The per-user slot is claimed through atomic insert-if-absent, so
    /// concurrent submissions for the same identity cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `KycAlreadySubmitted` if the identity already has a record.
    pub fn submit(
        &self,
        user_id: UserId,
        document_type: &str,
        document_number: &str,
        document_ref: &str,
    ) -> Result<KycRecord, WalletError> {
        // Atomic insert-if-absent on the per-user slot.
        let kyc_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let claimed = *self.by_user.entry(user_id).or_insert(kyc_id);
        if claimed != kyc_id {
            return Err(WalletError::kyc_already_submitted(user_id));
        }

        let record = KycRecord {
            kyc_id,
            user_id,
            document_type: document_type.to_string(),
            document_number: document_number.to_string(),
            document_ref: document_ref.to_string(),
            status: KycStatus::Pending,
            submitted_at: self.clock.now(),
            verified_at: None,
        };
        self.records.insert(kyc_id, record.clone());
        Ok(record)
    }

    /// The verification fact for an identity
    ///
    /// `Unverified` when no submission exists; otherwise the status of
    /// the stored record. This is the only fact wallet creation consumes.
    pub fn status_of(&self, user_id: UserId) -> KycStatus {
        self.record_of(user_id)
            .map(|record| record.status)
            .unwrap_or(KycStatus::Unverified)
    }

    /// The submission for an identity, if one exists
    pub fn record_of(&self, user_id: UserId) -> Option<KycRecord> {
        let kyc_id = *self.by_user.get(&user_id)?;
        self.records.get(&kyc_id).map(|entry| entry.value().clone())
    }

    /// Look up a record by its id
    ///
    /// # Errors
    ///
    /// Returns `KycNotFound` if the id is unknown.
    pub fn get(&self, kyc_id: KycId) -> Result<KycRecord, WalletError> {
        self.records
            .get(&kyc_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| WalletError::kyc_not_found(kyc_id))
    }

    /// Apply an admin verdict to a submission
    ///
    /// Approval stamps `verified_at`; a later re-review may still flip
    /// the status (the admin layer is trusted).
    ///
    /// # Errors
    ///
    /// Returns `KycNotFound` if the id is unknown.
    pub fn review(&self, kyc_id: KycId, verdict: KycVerdict) -> Result<KycRecord, WalletError> {
        let mut entry = self
            .records
            .get_mut(&kyc_id)
            .ok_or_else(|| WalletError::kyc_not_found(kyc_id))?;

        match verdict {
            KycVerdict::Verified => {
                entry.status = KycStatus::Verified;
                entry.verified_at = Some(self.clock.now());
            }
            KycVerdict::Rejected => {
                entry.status = KycStatus::Rejected;
            }
        }
        Ok(entry.clone())
    }

    /// All records, sorted by id
    pub fn all(&self) -> Vec<KycRecord> {
        let mut records: Vec<KycRecord> = self.records.iter().map(|e| e.value().clone()).collect();
        records.sort_by_key(|record| record.kyc_id);
        records
    }
}
