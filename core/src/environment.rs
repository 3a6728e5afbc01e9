//! Services injected into reducers

use chrono::{DateTime, Utc};

/// Source of the current time
///
/// The form stamps availability pools and completed reservations with it;
/// tests pin it to a fixed instant.
pub trait Clock: Send + Sync {
    /// Now
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
