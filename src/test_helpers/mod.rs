//! A set of helpers for testing

use std::time::{Duration, Instant};

use crate::{
    engine::lifecycle::AlertTiming,
    models::{AlertCategory, AlertEntry, AlertMetadata},
};

/// Plain metadata for `package`: no full-screen intent, not ongoing.
pub fn metadata(package: &str) -> AlertMetadata {
    AlertMetadata {
        package_name: package.to_string(),
        user_id: 0,
        has_full_screen_intent: false,
        ongoing: false,
        category: AlertCategory::Other,
    }
}

/// Metadata for `package` carrying a full-screen intent.
pub fn full_screen_metadata(package: &str) -> AlertMetadata {
    AlertMetadata { has_full_screen_intent: true, ..metadata(package) }
}

/// A detached entry with the given metadata, posted now with a 5s window.
pub fn entry(key: &str, metadata: AlertMetadata) -> AlertEntry {
    let posted_at = Instant::now();
    AlertEntry {
        key: key.to_string(),
        metadata,
        posted_at,
        finish_at: posted_at + Duration::from_millis(5_000),
        pinned: false,
        expanded: false,
        remote_input_active: false,
    }
}

/// A builder for [`AlertTiming`] values in tests.
///
/// Defaults match the production defaults (120ms touch acceptance, 5s
/// auto-dismiss, 60s snooze).
#[derive(Debug, Default)]
pub struct TimingBuilder {
    timing: AlertTiming,
}

impl TimingBuilder {
    /// Starts from the default timing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the touch-acceptance delay in milliseconds.
    pub fn touch_acceptance_delay_ms(mut self, ms: u64) -> Self {
        self.timing.touch_acceptance_delay = Duration::from_millis(ms);
        self
    }

    /// Sets the requested auto-dismiss delay in milliseconds.
    pub fn auto_dismiss_ms(mut self, ms: u64) -> Self {
        self.timing.auto_dismiss = Duration::from_millis(ms);
        self
    }

    /// Sets the snooze length in milliseconds.
    pub fn snooze_length_ms(mut self, ms: u64) -> Self {
        self.timing.snooze_length = Duration::from_millis(ms);
        self
    }

    /// Builds the timing value.
    pub fn build(self) -> AlertTiming {
        self.timing
    }
}
