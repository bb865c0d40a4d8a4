//! Dispute types for the Wallet Ledger Engine
//!
//! A dispute is a claim against one specific transaction. Filing a dispute
//! moves the contested amount from the receiver's available balance into
//! its hold balance; resolution releases the hold to exactly one party.

use super::transaction::TransactionId;
use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dispute identifier
pub type DisputeId = u64;

/// Lifecycle status of a dispute
///
/// `UnderReview` is an administrative annotation: no transition logic
/// forces it, and a dispute may be resolved directly from `Open`.
/// `Resolved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    /// Filed and awaiting an admin decision
    Open,

    /// An admin has picked the dispute up (annotation only)
    UnderReview,

    /// Upheld: funds were returned to the sender
    Resolved,

    /// Denied: the original transaction stands
    Rejected,
}

impl DisputeStatus {
    /// Whether the status is terminal (no further resolution possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, DisputeStatus::Resolved | DisputeStatus::Rejected)
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisputeStatus::Open => write!(f, "open"),
            DisputeStatus::UnderReview => write!(f, "under_review"),
            DisputeStatus::Resolved => write!(f, "resolved"),
            DisputeStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Admin decision on a dispute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisputeResolution {
    /// Dispute upheld: held funds go back to the sender
    Accepted,

    /// Dispute denied: held funds return to the receiver
    Rejected,
}

/// A claim against a specific transaction
///
/// At most one dispute exists per transaction. Mutated only through the
/// dispute engine; `status` is the single mutable field.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispute {
    /// The dispute ID
    pub dispute_id: DisputeId,

    /// The contested transaction
    pub transaction_id: TransactionId,

    /// Identity that filed the dispute (sender or receiver side)
    pub filed_by: UserId,

    /// Free-text reason supplied by the filer
    pub reason: String,

    /// Current lifecycle status
    pub status: DisputeStatus,

    /// Filing time
    pub created_at: DateTime<Utc>,
}
