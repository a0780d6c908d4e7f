//! Boundary scheduler.
//!
//! Holds the reference time every standard's period is computed against and
//! keeps one timer armed for the nearest upcoming period boundary. Like the
//! rest of the engine it has no internal thread: the host owns the clock and
//! timer and calls back into the scheduler when something happens.
//!
//! ## Triggers
//!
//! ```text
//! start / set_standards ─┐
//! on_timer_fired ────────┼─> recompute ─> (advance reference if boundary passed)
//! on_resume ─────────────┘                 ─> arm timer for nearest boundary
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut scheduler = BoundaryScheduler::new(SystemClock, DeadlineTimer::new(), tz);
//! scheduler.start(standards)?;
//! // when the deadline elapses:
//! scheduler.on_timer_fired()?;
//! let progress = scheduler.progress(&logs)?;
//! ```

mod clock;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timer::{Deadline, DeadlineTimer, ManualTimer, Timer};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calendar::{calculate_period_window_in, parse_timezone, TimestampMs};
use crate::error::{Result, TimeError};
use crate::events::{AdvanceReason, Event};
use crate::progress::{build_progress_map_in, LogSlice, ProgressMap, Standard};

/// Mutable state owned by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerState {
    /// "As of" instant used for period windows instead of the wall clock.
    pub window_reference_ms: TimestampMs,
    pub armed_timeout_target_ms: Option<TimestampMs>,
}

pub struct BoundaryScheduler<C: Clock, T: Timer> {
    clock: C,
    timer: T,
    timezone: Tz,
    standards: Vec<Standard>,
    state: SchedulerState,
    running: bool,
}

impl<C: Clock, T: Timer> BoundaryScheduler<C, T> {
    /// Create a stopped scheduler with its reference at the clock's now.
    pub fn new(clock: C, timer: T, timezone: Tz) -> Self {
        let now = clock.now_ms();
        Self {
            clock,
            timer,
            timezone,
            standards: Vec::new(),
            state: SchedulerState {
                window_reference_ms: now,
                armed_timeout_target_ms: None,
            },
            running: false,
        }
    }

    /// Like [`new`](Self::new) with an IANA zone name.
    pub fn with_timezone_name(clock: C, timer: T, timezone: &str) -> Result<Self> {
        Ok(Self::new(clock, timer, parse_timezone(timezone)?))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn window_reference_ms(&self) -> TimestampMs {
        self.state.window_reference_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn standards(&self) -> &[Standard] {
        &self.standards
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Earliest window end across all standards at the current reference.
    /// `None` when there are no standards.
    pub fn next_boundary_ms(&self) -> Result<Option<TimestampMs>> {
        let reference = self.state.window_reference_ms;
        let mut nearest: Option<TimestampMs> = None;
        for standard in &self.standards {
            let window = match calculate_period_window_in(
                reference,
                &standard.cadence,
                &self.timezone,
                standard.window_options(),
            ) {
                Ok(window) => window,
                Err(e) => {
                    debug!(standard_id = %standard.id, error = %e, "window computation failed");
                    return Err(e);
                }
            };
            nearest = Some(nearest.map_or(window.end_ms, |n| n.min(window.end_ms)));
        }
        Ok(nearest)
    }

    /// Progress for `logs`, windows at the reference time, status at the
    /// clock's true now.
    pub fn progress(&self, logs: &[LogSlice]) -> Result<ProgressMap> {
        build_progress_map_in(
            &self.standards,
            logs,
            &self.timezone,
            self.clock.now_ms(),
            Some(self.state.window_reference_ms),
        )
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin scheduling `standards`, with the reference reset to now.
    pub fn start(&mut self, standards: Vec<Standard>) -> Result<Vec<Event>> {
        let now = self.clock.now_ms();
        self.standards = standards;
        self.state.window_reference_ms = now;
        self.running = true;
        info!(
            standards = self.standards.len(),
            timezone = %self.timezone,
            "boundary scheduler started"
        );

        let mut events = vec![Event::SchedulerStarted {
            reference_ms: now,
            at_ms: now,
        }];
        events.extend(self.recompute()?);
        Ok(events)
    }

    /// Release the pending timer. Later fires are ignored.
    pub fn stop(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        let mut events = Vec::new();
        events.extend(self.cancel_armed());
        self.running = false;
        let now = self.clock.now_ms();
        info!("boundary scheduler stopped");
        events.push(Event::SchedulerStopped { at_ms: now });
        events
    }

    /// Replace the active standards and recompute the boundary.
    pub fn set_standards(&mut self, standards: Vec<Standard>) -> Result<Vec<Event>> {
        self.standards = standards;
        self.recompute()
    }

    /// The armed timer elapsed. Advance the reference to now and arm for the
    /// following boundary.
    pub fn on_timer_fired(&mut self) -> Result<Vec<Event>> {
        if !self.running {
            debug!("ignoring timer fire on stopped scheduler");
            return Ok(Vec::new());
        }
        // The fired arm is spent; nothing left to cancel.
        self.state.armed_timeout_target_ms = None;
        let now = self.clock.now_ms();
        let mut events = vec![self.advance_reference(now, AdvanceReason::TimerFired)];
        events.extend(self.recompute()?);
        Ok(events)
    }

    /// Host returned from background: snap the reference to now.
    ///
    /// Boundaries crossed while suspended are skipped, only the period
    /// containing the new now is surfaced.
    pub fn on_resume(&mut self) -> Result<Vec<Event>> {
        if !self.running {
            return Ok(Vec::new());
        }
        let now = self.clock.now_ms();
        let mut events = vec![self.advance_reference(now, AdvanceReason::Resumed)];
        events.extend(self.recompute()?);
        Ok(events)
    }

    /// Re-derive the nearest boundary and make sure exactly one timer is
    /// armed for it. Safe to call redundantly.
    pub fn recompute(&mut self) -> Result<Vec<Event>> {
        if !self.running {
            return Ok(Vec::new());
        }
        let now = self.clock.now_ms();
        let mut events = Vec::new();

        let mut next = self.next_boundary_ms()?;
        if let Some(boundary) = next {
            if boundary <= now {
                // Slept through it. One snap suffices: the window containing
                // now always ends after now.
                events.push(self.advance_reference(now, AdvanceReason::BoundaryPassed));
                next = self.next_boundary_ms()?;
            }
        }

        let Some(boundary) = next else {
            events.extend(self.cancel_armed());
            debug!("no active standards; scheduler idle");
            events.push(Event::SchedulerIdle { at_ms: now });
            return Ok(events);
        };

        if boundary <= now {
            return Err(TimeError::invalid(format!(
                "boundary {boundary} is not after now {now} after snapping forward"
            ))
            .into());
        }

        if self.state.armed_timeout_target_ms == Some(boundary) {
            debug!(target_ms = boundary, "boundary timer already armed");
            return Ok(events);
        }

        events.extend(self.cancel_armed());
        let delay_ms = (boundary - now) as u64;
        self.timer.arm(boundary, delay_ms);
        self.state.armed_timeout_target_ms = Some(boundary);
        debug!(target_ms = boundary, delay_ms, "boundary timer armed");
        events.push(Event::TimerArmed {
            target_ms: boundary,
            delay_ms,
        });
        Ok(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance_reference(&mut self, to_ms: TimestampMs, reason: AdvanceReason) -> Event {
        let from_ms = self.state.window_reference_ms;
        self.state.window_reference_ms = to_ms;
        info!(from_ms, to_ms, ?reason, "window reference advanced");
        Event::ReferenceAdvanced {
            from_ms,
            to_ms,
            reason,
        }
    }

    fn cancel_armed(&mut self) -> Option<Event> {
        let target_ms = self.state.armed_timeout_target_ms.take()?;
        self.timer.cancel();
        debug!(target_ms, "boundary timer cancelled");
        Some(Event::TimerCancelled { target_ms })
    }
}

impl<C: Clock, T: Timer> Drop for BoundaryScheduler<C, T> {
    fn drop(&mut self) {
        if self.state.armed_timeout_target_ms.take().is_some() {
            self.timer.cancel();
        }
    }
}
