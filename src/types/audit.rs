//! Admin activity audit types
//!
//! Every admin action appends one audit record. Audit writes are
//! best-effort: a failed append never rolls back the mutation it
//! describes, but is surfaced to the caller as a warning on the result.

use chrono::{DateTime, Utc};

/// Administrator identifier
pub type AdminId = u64;

/// One admin action, recorded after the mutation commits
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// Admin that performed the action
    pub actor: AdminId,

    /// Action name, e.g. "freeze_wallet" or "accept_dispute"
    pub action: String,

    /// Kind of entity acted on: "user", "wallet", "kyc", "dispute"
    pub target_type: String,

    /// Id of the entity acted on
    pub target_id: u64,

    /// Time the record was appended
    pub timestamp: DateTime<Utc>,
}

/// Result of an admin operation plus its audit outcome
///
/// `audit_warning` is `Some` when the action succeeded but the audit
/// append did not; the financial or lifecycle mutation stands either way.
#[derive(Debug, Clone, PartialEq)]
pub struct Audited<T> {
    /// The operation result
    pub value: T,

    /// Human-readable warning when the audit append failed
    pub audit_warning: Option<String>,
}
