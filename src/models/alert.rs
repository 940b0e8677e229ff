//! Alert metadata and tracked entry state.

use std::{cmp::Ordering, time::Instant};

use serde::{Deserialize, Serialize};

/// Coarse classification of a notification, as supplied by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    /// An incoming or ongoing call.
    Call,
    /// Anything else.
    #[default]
    Other,
}

/// Metadata supplied by the notification source for a single alert key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMetadata {
    /// The package (application) that posted the notification.
    pub package_name: String,

    /// The user the notification was posted for.
    pub user_id: i64,

    /// Whether the notification carries a full-screen intent.
    pub has_full_screen_intent: bool,

    /// Whether the notification is marked ongoing (e.g. a call in progress).
    pub ongoing: bool,

    /// The notification category.
    #[serde(default)]
    pub category: AlertCategory,
}

impl AlertMetadata {
    /// True if this is an ongoing call notification.
    pub fn is_ongoing_call(&self) -> bool {
        self.ongoing && self.category == AlertCategory::Call
    }
}

/// A tracked alert and how long it stays in the heads-up surface.
///
/// At most one entry per key exists in the manager at any time; re-adding an
/// existing key is ignored, and fresh metadata goes through an update.
#[derive(Debug, Clone)]
pub struct AlertEntry {
    /// Unique identifier of the underlying notification.
    pub key: String,

    /// Source-supplied metadata, refreshed on every update.
    pub metadata: AlertMetadata,

    /// The moment the entry was accepted, including the touch-acceptance
    /// grace delay.
    pub posted_at: Instant,

    /// The moment the entry becomes eligible for auto-dismissal.
    pub finish_at: Instant,

    /// Whether the entry must remain visible regardless of elapsed time.
    pub pinned: bool,

    /// Whether a user interaction currently keeps the entry open.
    pub expanded: bool,

    /// Whether the user is composing a reply targeting this entry.
    pub remote_input_active: bool,
}

impl AlertEntry {
    /// A sticky entry is immune to ordinary timeout-based removal.
    pub fn is_sticky(&self) -> bool {
        (self.pinned && self.expanded)
            || self.remote_input_active
            || self.metadata.has_full_screen_intent
    }

    /// Ranks two entries for display; `Ordering::Less` means `self` ranks
    /// higher (shows first).
    ///
    /// The chain is: pinned, full-screen intent, ongoing call, active remote
    /// input, then earlier posted time wins. Each criterion is a strict
    /// boolean comparison, so the ordering is transitive and the final age
    /// tie-break keeps it stable.
    pub fn rank(&self, other: &AlertEntry) -> Ordering {
        other
            .pinned
            .cmp(&self.pinned)
            .then(other.metadata.has_full_screen_intent.cmp(&self.metadata.has_full_screen_intent))
            .then(other.metadata.is_ongoing_call().cmp(&self.metadata.is_ongoing_call()))
            .then(other.remote_input_active.cmp(&self.remote_input_active))
            .then(self.posted_at.cmp(&other.posted_at))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_helpers::{entry, metadata};

    #[test]
    fn ongoing_call_requires_both_flags() {
        let mut meta = metadata("com.example.dialer");
        assert!(!meta.is_ongoing_call());

        meta.ongoing = true;
        assert!(!meta.is_ongoing_call());

        meta.category = AlertCategory::Call;
        assert!(meta.is_ongoing_call());
    }

    #[test]
    fn sticky_derivation() {
        let mut e = entry("a", metadata("com.example"));
        assert!(!e.is_sticky());

        // Expanded alone is not sticky; it has to be pinned as well.
        e.expanded = true;
        assert!(!e.is_sticky());
        e.pinned = true;
        assert!(e.is_sticky());

        let mut e = entry("b", metadata("com.example"));
        e.remote_input_active = true;
        assert!(e.is_sticky());

        let mut meta = metadata("com.example");
        meta.has_full_screen_intent = true;
        assert!(entry("c", meta).is_sticky());
    }

    #[test]
    fn pinned_outranks_everything() {
        let mut pinned = entry("a", metadata("com.example"));
        pinned.pinned = true;
        pinned.posted_at += Duration::from_secs(10);

        let mut loud = metadata("com.example");
        loud.has_full_screen_intent = true;
        loud.ongoing = true;
        loud.category = AlertCategory::Call;
        let unpinned = entry("b", loud);

        assert_eq!(pinned.rank(&unpinned), Ordering::Less);
        assert_eq!(unpinned.rank(&pinned), Ordering::Greater);
    }

    #[test]
    fn equal_flags_tie_break_by_age() {
        let older = entry("a", metadata("com.example"));
        let mut newer = entry("b", metadata("com.example"));
        newer.posted_at = older.posted_at + Duration::from_millis(1);

        assert_eq!(older.rank(&newer), Ordering::Less);
        assert_eq!(newer.rank(&older), Ordering::Greater);
    }
}
