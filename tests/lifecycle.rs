//! End-to-end scenarios against the lifecycle engine, driven by a manual
//! clock.

use std::{cmp::Ordering, sync::Arc, time::Duration};

use headsup::{
    clock::ManualClock,
    engine::{lifecycle::AlertLifecycleManager, timeouts::StaticTimeouts},
    models::{AlertCategory, AlertEvent, RemovalReason},
    test_helpers::{TimingBuilder, full_screen_metadata, metadata},
};

fn manager(clock: Arc<ManualClock>, floor_ms: u64) -> AlertLifecycleManager {
    AlertLifecycleManager::new(
        TimingBuilder::new().touch_acceptance_delay_ms(0).auto_dismiss_ms(5_000).build(),
        clock,
        Arc::new(StaticTimeouts::new(Duration::from_millis(floor_ms))),
    )
}

#[test]
fn full_screen_alert_outranks_and_outlives_a_plain_one() {
    let clock = Arc::new(ManualClock::new());
    let mut mgr = manager(clock.clone(), 0);

    mgr.add("a", metadata("com.example.a"));
    clock.advance(Duration::from_millis(1));
    mgr.add("b", full_screen_metadata("com.example.b"));

    assert_eq!(mgr.top_entry().unwrap().key, "b");

    clock.advance(Duration::from_millis(5_000));
    let out = mgr.handle_expiry("a");
    assert!(out.events.contains(&AlertEvent::EntryRemoved {
        key: "a".into(),
        reason: RemovalReason::TimedOut
    }));
    assert!(mgr.handle_expiry("b").events.is_empty());

    assert_eq!(mgr.len(), 1);
    assert_eq!(mgr.top_entry().unwrap().key, "b");
    assert!(mgr.has_pinned_entry());
}

#[test]
fn snooze_window_opens_immediately_and_closes_on_schedule() {
    let clock = Arc::new(ManualClock::new());
    let mut mgr = AlertLifecycleManager::new(
        TimingBuilder::new().snooze_length_ms(60_000).build(),
        clock.clone(),
        Arc::new(StaticTimeouts::new(Duration::ZERO)),
    );

    mgr.add("a", metadata("com.example"));
    mgr.snooze_all();

    clock.advance(Duration::from_millis(1_000));
    assert!(mgr.is_snoozed("com.example"));

    clock.advance(Duration::from_millis(59_001));
    assert!(!mgr.is_snoozed("com.example"));
    // Packages never alerted are never snoozed.
    assert!(!mgr.is_snoozed("com.other"));
}

#[test]
fn ranking_chain_is_applied_in_order() {
    let clock = Arc::new(ManualClock::new());
    let mut mgr = manager(clock.clone(), 0);

    mgr.add("old", metadata("com.example.old"));
    clock.advance(Duration::from_millis(1));
    mgr.add("new", metadata("com.example.new"));

    let mut call = metadata("com.example.call");
    call.ongoing = true;
    call.category = AlertCategory::Call;
    mgr.add("call", call);

    mgr.add("reply", metadata("com.example.reply"));
    mgr.set_remote_input_active("reply", true);

    mgr.add("fs", full_screen_metadata("com.example.fs"));

    // Pinned (full-screen) > ongoing call > remote input > older post time.
    assert_eq!(mgr.top_entry().unwrap().key, "fs");
    assert_eq!(mgr.compare("fs", "call"), Ordering::Less);
    assert_eq!(mgr.compare("call", "reply"), Ordering::Less);
    assert_eq!(mgr.compare("reply", "old"), Ordering::Less);
    assert_eq!(mgr.compare("old", "new"), Ordering::Less);
}

#[test]
fn timeout_floor_holds_for_any_shorter_request() {
    let clock = Arc::new(ManualClock::new());
    for requested_ms in [0, 1, 4_999, 9_999] {
        let mut mgr = AlertLifecycleManager::new(
            TimingBuilder::new().touch_acceptance_delay_ms(0).auto_dismiss_ms(requested_ms).build(),
            clock.clone(),
            Arc::new(StaticTimeouts::new(Duration::from_millis(10_000))),
        );
        mgr.add("a", metadata("com.example"));
        let entry = mgr.entry("a").unwrap();
        assert_eq!(
            entry.finish_at - entry.posted_at,
            Duration::from_millis(10_000),
            "requested {}ms must be floored",
            requested_ms
        );
    }
}

#[test]
fn interleaved_adds_and_removes_keep_one_entry_per_key() {
    let clock = Arc::new(ManualClock::new());
    let mut mgr = manager(clock.clone(), 0);

    for round in 0..5 {
        mgr.add("a", metadata("com.example"));
        mgr.add("b", metadata("com.example"));
        mgr.update("a", metadata("com.example"));
        assert_eq!(mgr.len(), 2, "round {}", round);
        mgr.remove("b");
        mgr.remove("b");
        assert_eq!(mgr.len(), 1);
        mgr.remove("a");
        assert!(mgr.is_empty());
    }
}
