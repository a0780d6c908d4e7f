//! Period window computation.
//!
//! A window is the half-open interval `[start_ms, end_ms)` of the period that
//! contains a given instant. Both ends are local midnights in the target zone,
//! so month windows and windows spanning a DST change have variable length.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::cadence::{Cadence, CadenceUnit, PeriodStartPreference};
use super::zone::{add_days, add_months, parse_timezone, sub_days, ZoneCalendar};
use super::TimestampMs;
use crate::error::{Result, TimeError};

const DATE_LABEL: &str = "%m/%d/%Y";
const MONTH_LABEL: &str = "%m/%Y";

/// One concrete instance of a cadence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodWindow {
    /// Inclusive start (epoch milliseconds).
    pub start_ms: TimestampMs,
    /// Exclusive end (epoch milliseconds).
    pub end_ms: TimestampMs,
    /// Stable identity of the period: `yyyy-mm-dd` of the start day, or
    /// `yyyy-mm` for monthly cadences.
    pub period_key: String,
    /// Human-readable range, e.g. `12/08/2025 - 12/14/2025`.
    pub label: String,
}

impl PeriodWindow {
    /// Half-open membership: the end instant belongs to the next window.
    pub fn contains(&self, timestamp_ms: TimestampMs) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms < self.end_ms
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// Optional knobs for [`calculate_period_window`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowOptions {
    pub period_start_preference: Option<PeriodStartPreference>,
}

impl WindowOptions {
    pub fn with_preference(preference: Option<PeriodStartPreference>) -> Self {
        Self {
            period_start_preference: preference,
        }
    }
}

/// Compute the window of `cadence` containing `timestamp_ms` in the IANA
/// zone named by `timezone`.
///
/// # Errors
/// - [`TimeError::InvalidTimeInput`] for an unknown zone or an
///   unrepresentable timestamp.
/// - A validation error for a zero interval or an out-of-range start weekday.
pub fn calculate_period_window(
    timestamp_ms: TimestampMs,
    cadence: &Cadence,
    timezone: &str,
    options: WindowOptions,
) -> Result<PeriodWindow> {
    let tz = parse_timezone(timezone)?;
    calculate_period_window_in(timestamp_ms, cadence, &tz, options)
}

/// Zone-generic form of [`calculate_period_window`].
pub fn calculate_period_window_in<Z: ZoneCalendar + ?Sized>(
    timestamp_ms: TimestampMs,
    cadence: &Cadence,
    zone: &Z,
    options: WindowOptions,
) -> Result<PeriodWindow> {
    cadence.validate()?;
    let preference = options.period_start_preference.unwrap_or_default();
    let day = zone.local_date(timestamp_ms)?;
    let interval = cadence.interval;

    let (start_date, end_date) = match cadence.unit {
        CadenceUnit::Day => (day, add_days(day, u64::from(interval))?),
        CadenceUnit::Week => {
            preference.validate()?;
            let weekday = day.weekday().number_from_monday();
            let week_start = u32::from(preference.week_start_day());
            let offset = (weekday + 7 - week_start) % 7;
            let start = sub_days(day, u64::from(offset))?;
            (start, add_days(start, 7 * u64::from(interval))?)
        }
        CadenceUnit::Month => {
            let start = day
                .with_day(1)
                .ok_or_else(|| TimeError::invalid(format!("no first day for {day}")))?;
            (start, add_months(start, interval)?)
        }
    };

    let start_ms = zone.start_of_local_day(start_date)?;
    let end_ms = zone.start_of_local_day(end_date)?;
    let last_day = sub_days(end_date, 1)?;

    Ok(PeriodWindow {
        start_ms,
        end_ms,
        period_key: period_key(cadence.unit, start_date),
        label: period_label(cadence, start_date, last_day),
    })
}

fn period_key(unit: CadenceUnit, start: NaiveDate) -> String {
    match unit {
        CadenceUnit::Day | CadenceUnit::Week => start.format("%Y-%m-%d").to_string(),
        CadenceUnit::Month => start.format("%Y-%m").to_string(),
    }
}

fn period_label(cadence: &Cadence, start: NaiveDate, last_day: NaiveDate) -> String {
    match cadence.unit {
        CadenceUnit::Day if cadence.interval == 1 => start.format(DATE_LABEL).to_string(),
        CadenceUnit::Day | CadenceUnit::Week => format!(
            "{} - {}",
            start.format(DATE_LABEL),
            last_day.format(DATE_LABEL)
        ),
        CadenceUnit::Month if cadence.interval == 1 => start.format(MONTH_LABEL).to_string(),
        CadenceUnit::Month => format!(
            "{} - {}",
            start.format(MONTH_LABEL),
            last_day.format(MONTH_LABEL)
        ),
    }
}
