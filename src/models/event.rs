//! Events emitted by the alert lifecycle manager.

use serde::{Deserialize, Serialize};

/// Why an entry left the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// The notification source cancelled the entry, or the user dismissed it.
    Cancelled,
    /// The entry's finish time elapsed with no sticky condition holding.
    TimedOut,
}

/// A state change observed by presentation-host subscribers.
///
/// Events are emitted synchronously after the entry set has been fully
/// updated, in mutation order, so a subscriber always sees a consistent
/// manager state when queried from a callback context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AlertEvent {
    /// A new entry was accepted.
    EntryAdded {
        /// Key of the added entry.
        key: String,
    },

    /// A tracked entry was removed.
    EntryRemoved {
        /// Key of the removed entry.
        key: String,
        /// Why it was removed.
        reason: RemovalReason,
    },

    /// An entry's pinned flag flipped.
    PinnedChanged {
        /// Key of the affected entry.
        key: String,
        /// The new pinned state.
        pinned: bool,
    },

    /// The "any entry pinned" aggregate flipped.
    PinnedModeChanged {
        /// Whether any tracked entry is now pinned.
        has_pinned: bool,
    },

    /// A user-initiated unpin released an entry that must stay on screen;
    /// the presentation host should surface it through its non-pinned
    /// channel.
    VisibilityHandoff {
        /// Key of the affected entry.
        key: String,
    },
}
