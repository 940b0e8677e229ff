//! The alert lifecycle state machine.
//!
//! [`AlertLifecycleManager`] owns the set of currently-alerting entries and
//! the per-package snooze table. It is a plain synchronous state machine: the
//! async service confines it to a single worker task and feeds it commands in
//! submission order, and every mutation returns an [`Outcome`] carrying the
//! events to fan out and the timer adjustments the host must apply.

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    clock::Clock,
    engine::{
        policy::{FullScreenPinPolicy, PinPolicy},
        snooze::SnoozeList,
        timeouts::{ContentFlags, TimeoutSource},
    },
    models::{AlertEntry, AlertEvent, AlertMetadata, RemovalReason},
};

/// Timing inputs, sourced from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertTiming {
    /// Grace period after posting before user touches are accepted; the
    /// entry's effective posted time includes it.
    pub touch_acceptance_delay: Duration,

    /// Requested auto-dismiss delay, before the accessibility floor.
    pub auto_dismiss: Duration,

    /// How long a package stays snoozed after `snooze_all`.
    pub snooze_length: Duration,
}

impl Default for AlertTiming {
    fn default() -> Self {
        Self {
            touch_acceptance_delay: Duration::from_millis(120),
            auto_dismiss: Duration::from_millis(5_000),
            snooze_length: Duration::from_millis(60_000),
        }
    }
}

/// A timer adjustment the hosting runtime must apply after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerOp {
    /// Arrange for `handle_expiry(key)` to run at or after `at`.
    Schedule {
        /// The entry the timer belongs to.
        key: String,
        /// The deadline.
        at: Instant,
    },
    /// Drop any pending expiry timer for `key`.
    Cancel {
        /// The entry the timer belonged to.
        key: String,
    },
}

/// The result of one mutation: events for subscribers (in emission order)
/// and timer adjustments for the host.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Events to fan out, in order.
    pub events: Vec<AlertEvent>,
    /// Timer adjustments to apply.
    pub timers: Vec<TimerOp>,
}

/// Hook consulted during a user-initiated `unpin_all`: entries it approves
/// are handed off to the presentation host's non-pinned visibility channel.
pub type StayOnScreenHook = Box<dyn Fn(&AlertEntry) -> bool + Send + Sync>;

/// Maintains the set of currently-alerting entries, computes ranking and
/// visibility, and manages automatic and snooze-based expiry.
///
/// Caller misuse (duplicate add, operations on unknown keys) is treated as a
/// benign no-op rather than an error: entries race with asynchronous
/// cancellation from the notification source, so idempotence beats strict
/// validation here.
pub struct AlertLifecycleManager {
    entries: HashMap<String, AlertEntry>,
    snoozed: SnoozeList,
    timing: AlertTiming,
    clock: Arc<dyn Clock>,
    timeouts: Arc<dyn TimeoutSource>,
    pin_policy: Box<dyn PinPolicy>,
    stay_on_screen: Option<StayOnScreenHook>,
    user: i64,
    has_pinned: bool,
}

impl AlertLifecycleManager {
    /// Creates a manager with the default full-screen-intent pin policy.
    pub fn new(
        timing: AlertTiming,
        clock: Arc<dyn Clock>,
        timeouts: Arc<dyn TimeoutSource>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            snoozed: SnoozeList::default(),
            timing,
            clock,
            timeouts,
            pin_policy: Box::new(FullScreenPinPolicy),
            stay_on_screen: None,
            user: 0,
            has_pinned: false,
        }
    }

    /// Replaces the pin policy.
    pub fn with_pin_policy(mut self, policy: Box<dyn PinPolicy>) -> Self {
        self.pin_policy = policy;
        self
    }

    /// Installs the stay-on-screen hook consulted by `unpin_all`.
    pub fn with_stay_on_screen(mut self, hook: StayOnScreenHook) -> Self {
        self.stay_on_screen = Some(hook);
        self
    }

    /// Accepts a new entry for `key`. No-op if the key is already tracked;
    /// callers with fresh metadata for a live entry use [`Self::update`].
    pub fn add(&mut self, key: &str, metadata: AlertMetadata) -> Outcome {
        let mut out = Outcome::default();
        if self.entries.contains_key(key) {
            tracing::debug!(key, "Duplicate add ignored; entry already tracked.");
            return out;
        }

        let posted_at = self.clock.now() + self.timing.touch_acceptance_delay;
        let finish_at = posted_at + self.effective_timeout();
        let pinned = self.pin_policy.should_pin(&metadata);
        let entry = AlertEntry {
            key: key.to_string(),
            metadata,
            posted_at,
            finish_at,
            pinned,
            expanded: false,
            remote_input_active: false,
        };

        tracing::debug!(key, pinned, "Alert entry added.");
        if !entry.is_sticky() {
            out.timers.push(TimerOp::Schedule { key: key.to_string(), at: finish_at });
        }
        out.events.push(AlertEvent::EntryAdded { key: key.to_string() });
        if pinned {
            out.events.push(AlertEvent::PinnedChanged { key: key.to_string(), pinned: true });
        }
        self.entries.insert(key.to_string(), entry);
        self.update_pinned_mode(&mut out.events);
        out
    }

    /// Refreshes a tracked entry: new metadata, reset timers, re-evaluated
    /// pin state. No-op if the key is not tracked.
    pub fn update(&mut self, key: &str, metadata: AlertMetadata) -> Outcome {
        let mut out = Outcome::default();
        let posted_at = self.clock.now() + self.timing.touch_acceptance_delay;
        let finish_at = posted_at + self.effective_timeout();

        let Some(entry) = self.entries.get_mut(key) else {
            tracing::debug!(key, "Update for untracked key ignored.");
            return out;
        };
        entry.metadata = metadata;
        entry.posted_at = posted_at;
        entry.finish_at = finish_at;

        let should_pin = self.pin_policy.should_pin(&entry.metadata);
        if entry.pinned != should_pin {
            entry.pinned = should_pin;
            out.events
                .push(AlertEvent::PinnedChanged { key: key.to_string(), pinned: should_pin });
        }
        out.timers.push(Self::timer_for(entry));
        self.update_pinned_mode(&mut out.events);
        out
    }

    /// Removes the entry for `key` at the source's or the user's request.
    /// No-op if the key is not tracked.
    pub fn remove(&mut self, key: &str) -> Outcome {
        let mut out = Outcome::default();
        self.remove_entry(key, RemovalReason::Cancelled, &mut out);
        out
    }

    /// Marks a pinned entry as expanded (or collapsed). Only pinned entries
    /// are affected; the flag feeds the sticky derivation.
    pub fn set_expanded(&mut self, key: &str, expanded: bool) -> Outcome {
        let mut out = Outcome::default();
        match self.entries.get_mut(key) {
            Some(entry) if entry.pinned => {
                if entry.expanded == expanded {
                    return out;
                }
                entry.expanded = expanded;
                self.reevaluate(key, &mut out);
            }
            Some(_) => tracing::debug!(key, "setExpanded ignored; entry not pinned."),
            None => tracing::debug!(key, "setExpanded for untracked key ignored."),
        }
        out
    }

    /// Records whether the user is composing a reply targeting this entry.
    pub fn set_remote_input_active(&mut self, key: &str, active: bool) -> Outcome {
        let mut out = Outcome::default();
        let Some(entry) = self.entries.get_mut(key) else {
            tracing::debug!(key, "Remote input change for untracked key ignored.");
            return out;
        };
        if entry.remote_input_active == active {
            return out;
        }
        entry.remote_input_active = active;
        self.reevaluate(key, &mut out);
        out
    }

    /// Snoozes the package of every currently tracked entry for the
    /// configured snooze length. Pure bookkeeping; no entry is removed.
    pub fn snooze_all(&mut self) {
        let now = self.clock.now();
        for entry in self.entries.values() {
            tracing::debug!(
                package = %entry.metadata.package_name,
                user = self.user,
                "Snoozing package."
            );
            self.snoozed.snooze(
                self.user,
                &entry.metadata.package_name,
                now,
                self.timing.snooze_length,
            );
        }
    }

    /// Returns whether `package` is snoozed for the current user, lazily
    /// evicting an expired record.
    pub fn is_snoozed(&mut self, package: &str) -> bool {
        let now = self.clock.now();
        self.snoozed.is_snoozed(self.user, package, now)
    }

    /// Forces `pinned = false` on every entry and re-evaluates each entry's
    /// natural expiry. When `user_initiated`, entries the stay-on-screen hook
    /// approves are handed off via [`AlertEvent::VisibilityHandoff`].
    pub fn unpin_all(&mut self, user_initiated: bool) -> Outcome {
        let mut out = Outcome::default();
        let keys: Vec<String> = self.entries.keys().cloned().collect();
        for key in keys {
            let Some(entry) = self.entries.get_mut(&key) else { continue };
            if entry.pinned {
                entry.pinned = false;
                out.events.push(AlertEvent::PinnedChanged { key: key.clone(), pinned: false });
            }
            let handoff = user_initiated
                && self.stay_on_screen.as_ref().is_some_and(|hook| hook(entry));
            if handoff {
                out.events.push(AlertEvent::VisibilityHandoff { key: key.clone() });
            }
            self.reevaluate(&key, &mut out);
        }
        self.update_pinned_mode(&mut out.events);
        out
    }

    /// Handles an expiry timer firing for `key`. Removes the entry if its
    /// finish time has elapsed and it is not sticky; a timer that raced a
    /// reset is rescheduled for the new finish time.
    pub fn handle_expiry(&mut self, key: &str) -> Outcome {
        let mut out = Outcome::default();
        let now = self.clock.now();
        let Some(entry) = self.entries.get(key) else {
            return out;
        };
        if entry.is_sticky() {
            // Re-evaluated when a sticky input clears; no timer until then.
            tracing::debug!(key, "Expiry deferred; entry is sticky.");
        } else if now < entry.finish_at {
            out.timers.push(TimerOp::Schedule { key: key.to_string(), at: entry.finish_at });
        } else {
            self.remove_entry(key, RemovalReason::TimedOut, &mut out);
        }
        out
    }

    /// Returns the highest-priority tracked entry, or `None` if empty.
    pub fn top_entry(&self) -> Option<&AlertEntry> {
        self.entries.values().min_by(|a, b| a.rank(b))
    }

    /// Ranks two keys for display; an untracked key ranks below a tracked
    /// one, and `Ordering::Less` means `a` shows first.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.entries.get(a), self.entries.get(b)) {
            (Some(ea), Some(eb)) => ea.rank(eb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// True iff any tracked entry is pinned.
    pub fn has_pinned_entry(&self) -> bool {
        self.has_pinned
    }

    /// Returns the tracked entry for `key`, if any.
    pub fn entry(&self, key: &str) -> Option<&AlertEntry> {
        self.entries.get(key)
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets the user snooze records are evaluated against.
    pub fn set_user(&mut self, user: i64) {
        self.user = user;
    }

    /// Applies new timing configuration and clears accumulated snooze
    /// records, as a settings change invalidates their windows. Timers of
    /// already-tracked entries are unaffected.
    pub fn set_timing(&mut self, timing: AlertTiming) {
        tracing::debug!(?timing, "Alert timing updated; snooze records cleared.");
        self.timing = timing;
        self.snoozed.clear();
    }

    fn effective_timeout(&self) -> Duration {
        self.timeouts.recommended_timeout(self.timing.auto_dismiss, ContentFlags::all())
    }

    fn timer_for(entry: &AlertEntry) -> TimerOp {
        if entry.is_sticky() {
            TimerOp::Cancel { key: entry.key.clone() }
        } else {
            TimerOp::Schedule { key: entry.key.clone(), at: entry.finish_at }
        }
    }

    /// After a sticky input may have changed: removes the entry if it is due
    /// and no longer protected, otherwise fixes up its timer.
    fn reevaluate(&mut self, key: &str, out: &mut Outcome) {
        let now = self.clock.now();
        let Some(entry) = self.entries.get(key) else { return };
        if entry.is_sticky() {
            out.timers.push(TimerOp::Cancel { key: key.to_string() });
        } else if now >= entry.finish_at {
            self.remove_entry(key, RemovalReason::TimedOut, out);
        } else {
            out.timers.push(TimerOp::Schedule { key: key.to_string(), at: entry.finish_at });
        }
    }

    fn remove_entry(&mut self, key: &str, reason: RemovalReason, out: &mut Outcome) {
        let Some(entry) = self.entries.remove(key) else {
            tracing::debug!(key, "Remove for untracked key ignored.");
            return;
        };
        tracing::debug!(key, ?reason, "Alert entry removed.");
        if entry.pinned {
            out.events.push(AlertEvent::PinnedChanged { key: key.to_string(), pinned: false });
        }
        out.events.push(AlertEvent::EntryRemoved { key: key.to_string(), reason });
        out.timers.push(TimerOp::Cancel { key: key.to_string() });
        self.update_pinned_mode(&mut out.events);
    }

    fn update_pinned_mode(&mut self, events: &mut Vec<AlertEvent>) {
        let has_pinned = self.entries.values().any(|e| e.pinned);
        if has_pinned == self.has_pinned {
            return;
        }
        tracing::debug!(from = self.has_pinned, to = has_pinned, "Pinned mode changed.");
        self.has_pinned = has_pinned;
        events.push(AlertEvent::PinnedModeChanged { has_pinned });
    }
}
