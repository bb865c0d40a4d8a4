//! Identity verification (KYC) types
//!
//! One submission per identity, carrying an opaque reference to a stored
//! document image. The registry never interprets document bytes; it only
//! records and returns the handle supplied by the document store.

use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verification record identifier
pub type KycId = u64;

/// Tri-state verification fact gating wallet creation
///
/// `Unverified` means no submission exists for the identity; stored
/// records start at `Pending` and move to `Verified` or `Rejected` on
/// admin review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    Unverified,
    Pending,
    Verified,
    Rejected,
}

/// Admin verdict on a verification submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycVerdict {
    Verified,
    Rejected,
}

/// A verification submission for one identity
#[derive(Debug, Clone, PartialEq)]
pub struct KycRecord {
    /// The record ID
    pub kyc_id: KycId,

    /// Identity the submission belongs to
    pub user_id: UserId,

    /// Kind of document submitted (passport, national id, ...)
    pub document_type: String,

    /// Document number as printed on the document
    pub document_number: String,

    /// Opaque handle to the stored document image
    pub document_ref: String,

    /// Current verification status
    pub status: KycStatus,

    /// Submission time
    pub submitted_at: DateTime<Utc>,

    /// Set when an admin approves the submission
    pub verified_at: Option<DateTime<Utc>>,
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KycStatus::Unverified => write!(f, "unverified"),
            KycStatus::Pending => write!(f, "pending"),
            KycStatus::Verified => write!(f, "verified"),
            KycStatus::Rejected => write!(f, "rejected"),
        }
    }
}
