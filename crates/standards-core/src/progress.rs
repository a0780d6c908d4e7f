//! Progress aggregation.
//!
//! Combines standards, log slices and a reference instant into one
//! [`ProgressSnapshot`] per standard. Pure: identical input gives identical
//! output, and nothing passed in is mutated.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::calendar::{
    calculate_period_window_in, parse_timezone, Cadence, PeriodStartPreference, TimestampMs,
    WindowOptions, ZoneCalendar,
};
use crate::error::Result;
use crate::status::{derive_period_status, PeriodStatus};

/// Session expectations for a standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_sessions_per_cadence")]
    pub sessions_per_cadence: u32,
}

fn default_sessions_per_cadence() -> u32 {
    1
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sessions_per_cadence: default_sessions_per_cadence(),
        }
    }
}

/// The fields of a standard the engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standard {
    pub id: String,
    pub cadence: Cadence,
    pub minimum: f64,
    /// Unit of the logged value, e.g. "calls".
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub session_config: SessionConfig,
    #[serde(default)]
    pub period_start_preference: Option<PeriodStartPreference>,
}

impl Standard {
    pub fn new(id: impl Into<String>, cadence: Cadence, minimum: f64, unit: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cadence,
            minimum,
            unit: unit.into(),
            session_config: SessionConfig::default(),
            period_start_preference: None,
        }
    }

    pub fn with_sessions(mut self, sessions_per_cadence: u32) -> Self {
        self.session_config.sessions_per_cadence = sessions_per_cadence;
        self
    }

    pub fn with_preference(mut self, preference: PeriodStartPreference) -> Self {
        self.period_start_preference = Some(preference);
        self
    }

    pub fn window_options(&self) -> WindowOptions {
        WindowOptions::with_preference(self.period_start_preference)
    }

    /// "100 calls / week"
    pub fn summary(&self) -> String {
        let unit = if self.unit.is_empty() {
            String::new()
        } else {
            format!(" {}", self.unit)
        };
        format!("{}{} / {}", format_amount(self.minimum), unit, self.cadence.describe())
    }
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Read-only projection of a log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSlice {
    pub id: String,
    pub standard_id: String,
    pub value: f64,
    pub occurred_at_ms: TimestampMs,
}

/// Per-standard progress for the period containing the reference instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub standard_id: String,
    pub period_label: String,
    pub period_key: String,
    pub current_total: f64,
    pub target_value: f64,
    /// 0..=100, two decimal places.
    pub progress_percent: f64,
    pub status: PeriodStatus,
    pub current_sessions: u32,
    pub target_sessions: u32,
    pub period_start_ms: TimestampMs,
    pub period_end_ms: TimestampMs,
}

pub type ProgressMap = BTreeMap<String, ProgressSnapshot>;

/// Inputs for [`build_dashboard_progress_map`].
#[derive(Debug, Clone, Copy)]
pub struct ProgressInput<'a> {
    pub standards: &'a [Standard],
    pub logs: &'a [LogSlice],
    pub timezone: &'a str,
    /// True wall-clock time; drives status.
    pub now_ms: TimestampMs,
    /// Instant used to pick each standard's period; falls back to `now_ms`.
    pub window_reference_ms: Option<TimestampMs>,
}

/// Build the progress map for every standard.
///
/// Windows are computed at `window_reference_ms` (or `now_ms`), but status is
/// judged against `now_ms` so a period held at a stale reference still turns
/// `Missed` once it has really ended.
///
/// # Errors
/// Fails if the zone is unknown or any standard's cadence is invalid.
pub fn build_dashboard_progress_map(input: ProgressInput<'_>) -> Result<ProgressMap> {
    let tz = parse_timezone(input.timezone)?;
    build_progress_map_in(
        input.standards,
        input.logs,
        &tz,
        input.now_ms,
        input.window_reference_ms,
    )
}

/// Zone-generic form of [`build_dashboard_progress_map`].
pub fn build_progress_map_in<Z: ZoneCalendar + ?Sized>(
    standards: &[Standard],
    logs: &[LogSlice],
    zone: &Z,
    now_ms: TimestampMs,
    window_reference_ms: Option<TimestampMs>,
) -> Result<ProgressMap> {
    let reference_ms = window_reference_ms.unwrap_or(now_ms);

    let mut by_standard: HashMap<&str, Vec<&LogSlice>> = HashMap::new();
    for log in logs {
        by_standard.entry(log.standard_id.as_str()).or_default().push(log);
    }

    let mut map = ProgressMap::new();
    for standard in standards {
        let window =
            calculate_period_window_in(reference_ms, &standard.cadence, zone, standard.window_options())?;

        let (current_total, current_sessions) = by_standard
            .get(standard.id.as_str())
            .map(|entries| {
                entries
                    .iter()
                    .filter(|log| window.contains(log.occurred_at_ms))
                    .fold((0.0, 0u32), |(sum, count), log| (sum + log.value, count + 1))
            })
            .unwrap_or((0.0, 0));

        let snapshot = ProgressSnapshot {
            standard_id: standard.id.clone(),
            period_label: window.label,
            period_key: window.period_key,
            current_total,
            target_value: standard.minimum,
            progress_percent: progress_percent(current_total, standard.minimum),
            status: derive_period_status(current_total, standard.minimum, now_ms, window.end_ms),
            current_sessions,
            target_sessions: standard.session_config.sessions_per_cadence,
            period_start_ms: window.start_ms,
            period_end_ms: window.end_ms,
        };
        map.insert(standard.id.clone(), snapshot);
    }
    Ok(map)
}

/// Percentage of `minimum` reached, clamped to 0..=100 and rounded to two
/// decimals. A non-positive minimum counts as fully met.
pub fn progress_percent(total: f64, minimum: f64) -> f64 {
    let ratio = if minimum <= 0.0 {
        1.0
    } else {
        let ratio = total / minimum;
        if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        }
    };
    (ratio * 100.0 * 100.0).round() / 100.0
}
