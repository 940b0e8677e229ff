//! Per-package snooze bookkeeping.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

/// Tracks `(user, package) -> snoozed-until` windows.
///
/// Records are evaluated lazily against the clock at lookup time and evicted
/// once expired; no timers are kept per snoozed package.
#[derive(Debug, Default)]
pub struct SnoozeList {
    records: HashMap<(i64, String), Instant>,
}

impl SnoozeList {
    /// Inserts or refreshes the window for `(user, package)`.
    pub fn snooze(&mut self, user: i64, package: &str, now: Instant, length: Duration) {
        self.records.insert((user, package.to_string()), now + length);
    }

    /// Returns whether `(user, package)` is currently snoozed, evicting the
    /// record if its window has passed.
    pub fn is_snoozed(&mut self, user: i64, package: &str, now: Instant) -> bool {
        let key = (user, package.to_string());
        match self.records.get(&key) {
            Some(until) if now < *until => true,
            Some(_) => {
                self.records.remove(&key);
                false
            }
            None => false,
        }
    }

    /// Drops every record, snoozed or not.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of live records, including any not yet lazily evicted.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_expires_and_evicts_lazily() {
        let mut list = SnoozeList::default();
        let start = Instant::now();
        list.snooze(0, "com.example", start, Duration::from_millis(60_000));

        assert!(list.is_snoozed(0, "com.example", start + Duration::from_millis(1_000)));
        assert_eq!(list.len(), 1);

        assert!(!list.is_snoozed(0, "com.example", start + Duration::from_millis(60_001)));
        assert!(list.is_empty());
    }

    #[test]
    fn windows_are_per_user() {
        let mut list = SnoozeList::default();
        let now = Instant::now();
        list.snooze(0, "com.example", now, Duration::from_secs(60));

        assert!(list.is_snoozed(0, "com.example", now));
        assert!(!list.is_snoozed(1, "com.example", now));
    }

    #[test]
    fn refresh_extends_the_window() {
        let mut list = SnoozeList::default();
        let start = Instant::now();
        list.snooze(0, "com.example", start, Duration::from_secs(10));
        list.snooze(0, "com.example", start + Duration::from_secs(5), Duration::from_secs(10));

        assert!(list.is_snoozed(0, "com.example", start + Duration::from_secs(12)));
    }
}
