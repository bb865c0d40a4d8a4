//! Time source abstraction
//!
//! Transaction timestamps and the dispute filing window depend on wall
//! time. Components take a `Clock` handle instead of calling `Utc::now()`
//! directly so the 30-day window boundary is testable.

use chrono::{DateTime, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source used outside of tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
