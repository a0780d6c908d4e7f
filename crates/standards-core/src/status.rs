//! Tri-state period status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::TimestampMs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodStatus {
    Met,
    #[serde(rename = "In Progress")]
    InProgress,
    Missed,
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodStatus::Met => write!(f, "Met"),
            PeriodStatus::InProgress => write!(f, "In Progress"),
            PeriodStatus::Missed => write!(f, "Missed"),
        }
    }
}

/// Status of a period given its accumulated total.
///
/// Meeting the minimum wins over expiry: a met period stays met after it ends.
/// A non-positive minimum is met by any total, negative ones included.
pub fn derive_period_status(
    period_total: f64,
    minimum: f64,
    now_ms: TimestampMs,
    period_end_ms: TimestampMs,
) -> PeriodStatus {
    if minimum <= 0.0 || period_total >= minimum {
        PeriodStatus::Met
    } else if now_ms >= period_end_ms {
        PeriodStatus::Missed
    } else {
        PeriodStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn met_regardless_of_time() {
        assert_eq!(derive_period_status(100.0, 100.0, 0, 10), PeriodStatus::Met);
        assert_eq!(derive_period_status(100.0, 100.0, 50, 10), PeriodStatus::Met);
    }

    #[test]
    fn under_minimum_before_end_is_in_progress() {
        assert_eq!(derive_period_status(50.0, 100.0, 5, 10), PeriodStatus::InProgress);
    }

    #[test]
    fn under_minimum_at_or_after_end_is_missed() {
        assert_eq!(derive_period_status(50.0, 100.0, 10, 10), PeriodStatus::Missed);
        assert_eq!(derive_period_status(50.0, 100.0, 11, 10), PeriodStatus::Missed);
    }

    #[test]
    fn met_overrides_expiry() {
        assert_eq!(derive_period_status(150.0, 100.0, 20, 10), PeriodStatus::Met);
    }

    #[test]
    fn zero_minimum_always_met() {
        assert_eq!(derive_period_status(0.0, 0.0, 20, 10), PeriodStatus::Met);
        assert_eq!(derive_period_status(-3.0, 0.0, 20, 10), PeriodStatus::Met);
    }

    #[test]
    fn negative_minimum_always_met() {
        assert_eq!(derive_period_status(-5.0, -10.0, 20, 10), PeriodStatus::Met);
        assert_eq!(derive_period_status(-15.0, -10.0, 20, 10), PeriodStatus::Met);
        assert_eq!(derive_period_status(-15.0, -10.0, 5, 10), PeriodStatus::Met);
    }

    #[test]
    fn display_and_serde_use_human_names() {
        assert_eq!(PeriodStatus::InProgress.to_string(), "In Progress");
        assert_eq!(
            serde_json::to_string(&PeriodStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
    }
}
