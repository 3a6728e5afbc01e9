//! Deterministic time

use chrono::{DateTime, TimeZone, Utc};
use room_desk_core::environment::Clock;

/// A [`Clock`] stuck at one instant
///
/// ```
/// use chrono::Utc;
/// use room_desk_core::environment::Clock;
/// use room_desk_testing::FixedClock;
///
/// let clock = FixedClock::new(Utc::now());
/// assert_eq!(clock.now(), clock.now());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Pin the clock at `time`
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// The clock every test shares: midnight UTC, 1 January 2025
#[must_use]
pub fn test_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_new_year_2025() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }
}
