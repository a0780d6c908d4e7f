//! Time sources for the boundary scheduler.

use chrono::Utc;
use std::cell::Cell;
use std::rc::Rc;

use crate::calendar::TimestampMs;

pub trait Clock {
    fn now_ms(&self) -> TimestampMs;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        Utc::now().timestamp_millis()
    }
}

/// Virtual clock for deterministic tests.
///
/// Clones share the same instant, so a test can keep one handle and move time
/// under a scheduler that owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<TimestampMs>>,
}

impl ManualClock {
    pub fn new(now_ms: TimestampMs) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: TimestampMs) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> TimestampMs {
        self.now.get()
    }
}
