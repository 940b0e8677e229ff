//! Accessibility-aware timeout recommendation.

use std::time::Duration;

use bitflags::bitflags;
#[cfg(test)]
use mockall::automock;

bitflags! {
    /// Kinds of content an alert surface presents, used when asking for a
    /// recommended display duration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ContentFlags: u8 {
        /// The surface contains interactive controls.
        const CONTROLS = 0b0000_0001;
        /// The surface contains icons.
        const ICONS    = 0b0000_0010;
        /// The surface contains text.
        const TEXT     = 0b0000_0100;
    }
}

/// Supplies the effective display duration for an alert, given the caller's
/// requested timeout and the content the surface shows.
///
/// Implementations must never return less than `requested`: users relying on
/// longer interaction windows get a raised floor, never a shortened one.
#[cfg_attr(test, automock)]
pub trait TimeoutSource: Send + Sync {
    /// Returns the timeout to actually apply.
    fn recommended_timeout(&self, requested: Duration, flags: ContentFlags) -> Duration;
}

/// A fixed configured minimum, the stand-in for a platform accessibility
/// service.
#[derive(Debug, Clone, Copy)]
pub struct StaticTimeouts {
    minimum: Duration,
}

impl StaticTimeouts {
    /// Creates a source that floors every request at `minimum`.
    pub fn new(minimum: Duration) -> Self {
        Self { minimum }
    }
}

impl TimeoutSource for StaticTimeouts {
    fn recommended_timeout(&self, requested: Duration, _flags: ContentFlags) -> Duration {
        requested.max(self.minimum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_is_applied_below_minimum() {
        let source = StaticTimeouts::new(Duration::from_millis(10_000));
        let effective =
            source.recommended_timeout(Duration::from_millis(5_000), ContentFlags::all());
        assert_eq!(effective, Duration::from_millis(10_000));
    }

    #[test]
    fn requested_wins_above_minimum() {
        let source = StaticTimeouts::new(Duration::from_millis(2_000));
        let effective =
            source.recommended_timeout(Duration::from_millis(5_000), ContentFlags::TEXT);
        assert_eq!(effective, Duration::from_millis(5_000));
    }
}
