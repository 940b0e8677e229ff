//! Time sources for the alert engine.
//!
//! All entry and snooze bookkeeping is done against a monotonic [`Clock`]
//! rather than direct `Instant::now()` calls, so tests can drive time
//! manually and the async service can stay coherent with tokio's paused
//! clock.

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

/// A monotonic time source.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// A clock backed by `std::time::Instant`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock backed by `tokio::time::Instant`.
///
/// The async service schedules expiries on a `DelayQueue`, which runs on
/// tokio's clock. Reading "now" through tokio as well keeps deadline
/// comparisons consistent when the runtime's clock is paused or auto-advanced.
#[derive(Debug, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// A manually advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    pub fn new() -> Self {
        Self { base: Instant::now(), elapsed: Mutex::new(Duration::ZERO) }
    }

    /// Advances the clock by `delta`.
    pub fn advance(&self, delta: Duration) {
        *self.elapsed.lock().unwrap() += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.elapsed.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_only_on_request() {
        let clock = ManualClock::new();
        let start = clock.now();
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), start + Duration::from_millis(250));
    }
}
