//! Integration tests for the boundary scheduler driven by virtual time.

use chrono::DateTime;
use standards_core::{
    AdvanceReason, BoundaryScheduler, Cadence, Event, LogSlice, ManualClock, ManualTimer,
    PeriodStatus, Standard, TimestampMs,
};

fn ms(rfc3339: &str) -> TimestampMs {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().timestamp_millis()
}

fn harness(at: &str) -> (BoundaryScheduler<ManualClock, ManualTimer>, ManualClock, ManualTimer) {
    let clock = ManualClock::new(ms(at));
    let timer = ManualTimer::new();
    let scheduler =
        BoundaryScheduler::with_timezone_name(clock.clone(), timer.clone(), "UTC").unwrap();
    (scheduler, clock, timer)
}

/// Fire the virtual timer if it is due and feed the scheduler.
fn pump(
    scheduler: &mut BoundaryScheduler<ManualClock, ManualTimer>,
    clock: &ManualClock,
    timer: &ManualTimer,
) -> Vec<Event> {
    use standards_core::Clock;
    if timer.fire_if_due(clock.now_ms()) {
        scheduler.on_timer_fired().unwrap()
    } else {
        Vec::new()
    }
}

#[test]
fn daily_period_rolls_over_at_midnight() {
    let (mut scheduler, clock, timer) = harness("2025-12-10T23:58:00Z");
    let standards = vec![Standard::new("calls", Cadence::daily(), 10.0, "calls")];
    let logs = vec![LogSlice {
        id: "l1".into(),
        standard_id: "calls".into(),
        value: 4.0,
        occurred_at_ms: ms("2025-12-10T10:00:00Z"),
    }];

    scheduler.start(standards).unwrap();
    let before = scheduler.progress(&logs).unwrap();
    assert_eq!(before["calls"].period_label, "12/10/2025");
    assert_eq!(before["calls"].status, PeriodStatus::InProgress);
    assert_eq!(timer.armed_target(), Some(ms("2025-12-11T00:00:00Z")));

    clock.set(ms("2025-12-11T00:01:00Z"));

    // Until the timer is serviced the label holds, but status already uses
    // the real clock.
    let stale = scheduler.progress(&logs).unwrap();
    assert_eq!(stale["calls"].period_label, "12/10/2025");
    assert_eq!(stale["calls"].status, PeriodStatus::Missed);

    let events = pump(&mut scheduler, &clock, &timer);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::ReferenceAdvanced {
            reason: AdvanceReason::TimerFired,
            ..
        }
    )));
    assert!(events.iter().any(Event::requires_refresh));

    let after = scheduler.progress(&logs).unwrap();
    assert_eq!(after["calls"].period_label, "12/11/2025");
    assert_eq!(after["calls"].current_total, 0.0);
    assert_eq!(after["calls"].status, PeriodStatus::InProgress);
    assert_eq!(timer.armed_target(), Some(ms("2025-12-12T00:00:00Z")));
}

#[test]
fn arms_for_earliest_boundary_not_first_listed() {
    let (mut scheduler, _clock, timer) = harness("2025-12-10T12:00:00Z");
    scheduler
        .start(vec![
            Standard::new("monthly", Cadence::monthly(), 1.0, "x"),
            Standard::new("weekly", Cadence::weekly(), 1.0, "x"),
            Standard::new("daily", Cadence::daily(), 1.0, "x"),
        ])
        .unwrap();
    assert_eq!(timer.armed_target(), Some(ms("2025-12-11T00:00:00Z")));
    assert_eq!(
        scheduler.state().armed_timeout_target_ms,
        Some(ms("2025-12-11T00:00:00Z"))
    );
}

#[test]
fn month_end_can_precede_week_end() {
    // Monday Dec 29 2025: the week ends Jan 5, the month ends Jan 1.
    let (mut scheduler, _clock, timer) = harness("2025-12-29T08:00:00Z");
    scheduler
        .start(vec![
            Standard::new("weekly", Cadence::weekly(), 1.0, "x"),
            Standard::new("monthly", Cadence::monthly(), 1.0, "x"),
        ])
        .unwrap();
    assert_eq!(timer.armed_target(), Some(ms("2026-01-01T00:00:00Z")));
}

#[test]
fn resume_snaps_forward_over_skipped_days() {
    let (mut scheduler, clock, timer) = harness("2025-12-10T20:00:00Z");
    scheduler
        .start(vec![Standard::new("calls", Cadence::daily(), 10.0, "calls")])
        .unwrap();

    // Backgrounded: the timer never ran.
    clock.advance(2 * 24 * 3_600_000);
    let events = scheduler.on_resume().unwrap();

    let advances: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::ReferenceAdvanced { .. }))
        .collect();
    assert_eq!(advances.len(), 1);
    assert_eq!(scheduler.window_reference_ms(), ms("2025-12-12T20:00:00Z"));

    let progress = scheduler.progress(&[]).unwrap();
    assert_eq!(progress["calls"].period_label, "12/12/2025");
    assert_eq!(timer.armed_target(), Some(ms("2025-12-13T00:00:00Z")));
}

#[test]
fn passed_boundary_snaps_on_next_recompute() {
    let (mut scheduler, clock, timer) = harness("2025-12-10T20:00:00Z");
    scheduler
        .start(vec![Standard::new("a", Cadence::daily(), 1.0, "x")])
        .unwrap();

    clock.set(ms("2025-12-13T09:00:00Z"));
    let events = scheduler
        .set_standards(vec![
            Standard::new("a", Cadence::daily(), 1.0, "x"),
            Standard::new("b", Cadence::weekly(), 1.0, "x"),
        ])
        .unwrap();

    assert!(matches!(
        events[0],
        Event::ReferenceAdvanced {
            reason: AdvanceReason::BoundaryPassed,
            ..
        }
    ));
    assert_eq!(scheduler.window_reference_ms(), ms("2025-12-13T09:00:00Z"));
    assert_eq!(timer.armed_target(), Some(ms("2025-12-14T00:00:00Z")));
}

#[test]
fn standards_change_replaces_armed_timer() {
    let (mut scheduler, _clock, timer) = harness("2025-12-10T12:00:00Z");
    scheduler
        .start(vec![Standard::new("monthly", Cadence::monthly(), 1.0, "x")])
        .unwrap();
    assert_eq!(timer.armed_target(), Some(ms("2026-01-01T00:00:00Z")));

    let events = scheduler
        .set_standards(vec![
            Standard::new("monthly", Cadence::monthly(), 1.0, "x"),
            Standard::new("daily", Cadence::daily(), 1.0, "x"),
        ])
        .unwrap();
    assert!(matches!(events[0], Event::TimerCancelled { .. }));
    assert!(matches!(events[1], Event::TimerArmed { .. }));
    assert_eq!(timer.armed_target(), Some(ms("2025-12-11T00:00:00Z")));
    assert_eq!(timer.arm_count(), 2);
    assert_eq!(timer.cancel_count(), 1);

    // Emptying the list disarms.
    scheduler.set_standards(Vec::new()).unwrap();
    assert_eq!(timer.armed_target(), None);
    assert_eq!(scheduler.state().armed_timeout_target_ms, None);
}

#[test]
fn redundant_triggers_do_not_double_arm() {
    let (mut scheduler, _clock, timer) = harness("2025-12-10T12:00:00Z");
    let standards = vec![Standard::new("a", Cadence::weekly(), 1.0, "x")];
    scheduler.start(standards.clone()).unwrap();
    scheduler.set_standards(standards.clone()).unwrap();
    scheduler.recompute().unwrap();
    scheduler.on_resume().unwrap();
    assert_eq!(timer.arm_count(), 1);
    assert_eq!(timer.cancel_count(), 0);
}

#[test]
fn consecutive_boundaries_follow_each_other() {
    let (mut scheduler, clock, timer) = harness("2025-12-10T12:00:00Z");
    scheduler
        .start(vec![Standard::new("a", Cadence::daily(), 1.0, "x")])
        .unwrap();

    for day in 11..=14 {
        let boundary = ms(&format!("2025-12-{day}T00:00:00Z"));
        assert_eq!(timer.armed_target(), Some(boundary));
        clock.set(boundary);
        pump(&mut scheduler, &clock, &timer);
        assert_eq!(scheduler.window_reference_ms(), boundary);
    }
}
