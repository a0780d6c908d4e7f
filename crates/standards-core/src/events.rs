use serde::{Deserialize, Serialize};

use crate::calendar::TimestampMs;

/// Why the scheduler moved its reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceReason {
    /// The armed boundary timer fired.
    TimerFired,
    /// The nearest boundary was already in the past at recompute time.
    BoundaryPassed,
    /// The host came back from background.
    Resumed,
}

/// Every scheduler transition produces Events.
/// Hosts re-render on `ReferenceAdvanced`; the rest are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SchedulerStarted {
        reference_ms: TimestampMs,
        at_ms: TimestampMs,
    },
    ReferenceAdvanced {
        from_ms: TimestampMs,
        to_ms: TimestampMs,
        reason: AdvanceReason,
    },
    TimerArmed {
        target_ms: TimestampMs,
        delay_ms: u64,
    },
    TimerCancelled {
        target_ms: TimestampMs,
    },
    /// No active standards; nothing armed.
    SchedulerIdle {
        at_ms: TimestampMs,
    },
    SchedulerStopped {
        at_ms: TimestampMs,
    },
}

impl Event {
    /// Whether consumers should rebuild their progress snapshot.
    pub fn requires_refresh(&self) -> bool {
        matches!(
            self,
            Event::ReferenceAdvanced { .. } | Event::SchedulerStarted { .. }
        )
    }
}
