//! Wall-clock abstraction for testability
//!
//! Metric events are stamped with epoch milliseconds. Production code uses
//! [`SystemClock`]; tests inject a [`MockClock`] so timestamps and day
//! boundaries are deterministic.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use super::format::millis_to_utc;

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    /// Milliseconds since the UNIX epoch
    fn now_millis(&self) -> i64;

    /// Current time as a UTC datetime
    fn now_utc(&self) -> DateTime<Utc> {
        millis_to_utc(self.now_millis())
    }
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|dur| dur.as_millis() as i64)
            .unwrap_or_default()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same underlying time, so a test can hold one handle and
/// advance the clock seen by the code under test.
///
/// ```
/// use std::time::Duration;
///
/// use vitalscope_common::time::{Clock, MockClock};
///
/// let clock = MockClock::at_millis(1_000);
/// clock.advance(Duration::from_secs(2));
/// assert_eq!(clock.now_millis(), 3_000);
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    millis: Arc<AtomicI64>,
}

impl MockClock {
    /// Create a mock clock frozen at the current system time
    pub fn new() -> Self {
        Self::at_millis(SystemClock.now_millis())
    }

    /// Create a mock clock frozen at `millis` since the epoch
    pub fn at_millis(millis: i64) -> Self {
        Self { millis: Arc::new(AtomicI64::new(millis)) }
    }

    /// Advance the clock without waiting
    pub fn advance(&self, duration: Duration) {
        self.millis.fetch_add(duration.as_millis() as i64, Ordering::SeqCst);
    }

    /// Jump to an absolute epoch-millisecond value
    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now_millis() > 0);
    }

    #[test]
    fn mock_clock_advances_and_sets() {
        let clock = MockClock::at_millis(10);
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now_millis(), 15);

        clock.set_millis(100);
        assert_eq!(clock.now_millis(), 100);
    }

    #[test]
    fn mock_clock_clones_share_time() {
        let clock = MockClock::at_millis(0);
        let shared = clock.clone();

        clock.advance(Duration::from_secs(1));
        assert_eq!(shared.now_millis(), 1_000);
    }

    #[test]
    fn now_utc_matches_millis() {
        let clock = MockClock::at_millis(86_400_000);
        assert_eq!(clock.now_utc().to_rfc3339(), "1970-01-02T00:00:00+00:00");
    }
}
