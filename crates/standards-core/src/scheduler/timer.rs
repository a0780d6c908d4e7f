//! One-shot timer abstraction.
//!
//! The scheduler never sleeps itself. It tells a [`Timer`] when it wants to be
//! woken and the host calls [`BoundaryScheduler::on_timer_fired`] when that
//! happens.
//!
//! [`BoundaryScheduler::on_timer_fired`]: super::BoundaryScheduler::on_timer_fired

use std::cell::RefCell;
use std::rc::Rc;

use crate::calendar::TimestampMs;

pub trait Timer {
    /// Arm for `target_ms`, `delay_ms` from now. Replaces any pending arm.
    fn arm(&mut self, target_ms: TimestampMs, delay_ms: u64);
    fn cancel(&mut self);
}

/// Holds the pending deadline for an async host loop to sleep on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeadlineTimer {
    pending: Option<Deadline>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub target_ms: TimestampMs,
    pub delay_ms: u64,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<Deadline> {
        self.pending
    }
}

impl Timer for DeadlineTimer {
    fn arm(&mut self, target_ms: TimestampMs, delay_ms: u64) {
        self.pending = Some(Deadline {
            target_ms,
            delay_ms,
        });
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}

#[derive(Debug, Default)]
struct ManualTimerState {
    armed: Option<TimestampMs>,
    arm_count: usize,
    cancel_count: usize,
}

/// Virtual timer for deterministic tests. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    inner: Rc<RefCell<ManualTimerState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed_target(&self) -> Option<TimestampMs> {
        self.inner.borrow().armed
    }

    pub fn is_due(&self, now_ms: TimestampMs) -> bool {
        self.armed_target().is_some_and(|target| now_ms >= target)
    }

    /// Consume the pending arm if it is due. The caller then notifies the
    /// scheduler.
    pub fn fire_if_due(&self, now_ms: TimestampMs) -> bool {
        let mut state = self.inner.borrow_mut();
        match state.armed {
            Some(target) if now_ms >= target => {
                state.armed = None;
                true
            }
            _ => false,
        }
    }

    pub fn arm_count(&self) -> usize {
        self.inner.borrow().arm_count
    }

    pub fn cancel_count(&self) -> usize {
        self.inner.borrow().cancel_count
    }
}

impl Timer for ManualTimer {
    fn arm(&mut self, target_ms: TimestampMs, _delay_ms: u64) {
        let mut state = self.inner.borrow_mut();
        state.armed = Some(target_ms);
        state.arm_count += 1;
    }

    fn cancel(&mut self) {
        let mut state = self.inner.borrow_mut();
        if state.armed.take().is_some() {
            state.cancel_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timer_fires_once() {
        let mut timer = ManualTimer::new();
        timer.arm(100, 100);
        assert!(!timer.fire_if_due(99));
        assert!(timer.fire_if_due(100));
        assert!(!timer.fire_if_due(200));
        assert_eq!(timer.arm_count(), 1);
    }

    #[test]
    fn cancel_only_counts_pending_arms() {
        let mut timer = ManualTimer::new();
        timer.cancel();
        assert_eq!(timer.cancel_count(), 0);
        timer.arm(10, 10);
        timer.cancel();
        assert_eq!(timer.cancel_count(), 1);
        assert_eq!(timer.armed_target(), None);
    }

    #[test]
    fn deadline_timer_tracks_latest_arm() {
        let mut timer = DeadlineTimer::new();
        timer.arm(1_000, 250);
        timer.arm(2_000, 500);
        assert_eq!(
            timer.pending(),
            Some(Deadline {
                target_ms: 2_000,
                delay_ms: 500
            })
        );
        timer.cancel();
        assert_eq!(timer.pending(), None);
    }
}
