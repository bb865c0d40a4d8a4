//! Admin activity audit trail
//!
//! Append-only record of admin actions. The trail sits behind the
//! [`AuditSink`] trait so the admin layer stays decoupled from the sink:
//! a failed append is reported as a warning to the caller and logged, but
//! it never rolls back the mutation it describes.

use crate::types::{AuditRecord, WalletError};
use parking_lot::RwLock;

/// Destination for audit records
///
/// Implementations may fail (a database binding losing its connection,
/// for example); the admin layer treats failure as a warning, not an
/// error.
pub trait AuditSink: Send + Sync {
    /// Append one record
    fn append(&self, record: AuditRecord) -> Result<(), WalletError>;
}

/// In-process append-only audit trail
#[derive(Debug, Default)]
pub struct AuditTrail {
    records: RwLock<Vec<AuditRecord>>,
}

impl AuditTrail {
    /// Create an empty trail
    pub fn new() -> Self {
        AuditTrail {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of all records in append order
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }
}

impl AuditSink for AuditTrail {
    fn append(&self, record: AuditRecord) -> Result<(), WalletError> {
        self.records.write().push(record);
        Ok(())
    }
}
