//! Time sources.

use chrono::{DateTime, Utc};

/// Supplies the current time. Injected so tests can pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freeze at `millis` since the epoch. Out-of-range values clamp to the epoch.
    pub fn from_millis(millis: i64) -> Self {
        Self(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_millis() {
        let clock = FixedClock::from_millis(1_736_870_400_000);
        assert_eq!(clock.now_millis(), 1_736_870_400_000);
        assert_eq!(clock.now().to_rfc3339(), "2025-01-14T16:00:00+00:00");
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
        assert!(a > 1_600_000_000_000);
    }
}
