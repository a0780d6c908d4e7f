//! Cadence and period-start preference value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TimeError, ValidationError};

/// Calendar unit a cadence repeats in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CadenceUnit {
    Day,
    Week,
    Month,
}

impl CadenceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            CadenceUnit::Day => "day",
            CadenceUnit::Week => "week",
            CadenceUnit::Month => "month",
        }
    }
}

impl fmt::Display for CadenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CadenceUnit {
    type Err = TimeError;

    /// Accepts singular or plural forms, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(CadenceUnit::Day),
            "week" | "weeks" => Ok(CadenceUnit::Week),
            "month" | "months" => Ok(CadenceUnit::Month),
            other => Err(TimeError::UnsupportedCadenceUnit(other.to_string())),
        }
    }
}

/// Recurrence rule: every `interval` `unit`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cadence {
    pub interval: u32,
    pub unit: CadenceUnit,
}

impl Cadence {
    /// Create a validated cadence.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidInterval`] when `interval` is zero.
    pub fn new(interval: u32, unit: CadenceUnit) -> Result<Self, ValidationError> {
        let cadence = Self { interval, unit };
        cadence.validate()?;
        Ok(cadence)
    }

    pub fn daily() -> Self {
        Self {
            interval: 1,
            unit: CadenceUnit::Day,
        }
    }

    pub fn weekly() -> Self {
        Self {
            interval: 1,
            unit: CadenceUnit::Week,
        }
    }

    pub fn monthly() -> Self {
        Self {
            interval: 1,
            unit: CadenceUnit::Month,
        }
    }

    /// Deserialized cadences bypass `new`, so window computation re-checks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval < 1 {
            return Err(ValidationError::InvalidInterval {
                interval: self.interval,
            });
        }
        Ok(())
    }

    /// "week", "2 weeks", "month" ...
    pub fn describe(&self) -> String {
        if self.interval == 1 {
            self.unit.to_string()
        } else {
            format!("{} {}s", self.interval, self.unit)
        }
    }
}

/// Where a period starts.
///
/// `WeekDay` only affects weekly cadences; day and month cadences ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PeriodStartPreference {
    /// Calendar-aligned: weeks start Monday, months on the 1st.
    #[default]
    Default,
    /// Weeks start on the given weekday (Monday=1 .. Sunday=7).
    WeekDay { week_start_day: u8 },
}

impl PeriodStartPreference {
    /// Create a validated weekday preference.
    pub fn week_day(week_start_day: u8) -> Result<Self, ValidationError> {
        let pref = PeriodStartPreference::WeekDay { week_start_day };
        pref.validate()?;
        Ok(pref)
    }

    /// Effective first day of the week, Monday=1.
    pub fn week_start_day(&self) -> u8 {
        match self {
            PeriodStartPreference::Default => 1,
            PeriodStartPreference::WeekDay { week_start_day } => *week_start_day,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            PeriodStartPreference::Default => Ok(()),
            PeriodStartPreference::WeekDay { week_start_day } => {
                if (1..=7).contains(week_start_day) {
                    Ok(())
                } else {
                    Err(ValidationError::InvalidWeekday {
                        weekday: *week_start_day,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parses_plural_and_case() {
        assert_eq!("Weeks".parse::<CadenceUnit>().unwrap(), CadenceUnit::Week);
        assert_eq!(" day ".parse::<CadenceUnit>().unwrap(), CadenceUnit::Day);
        assert_eq!("MONTH".parse::<CadenceUnit>().unwrap(), CadenceUnit::Month);
    }

    #[test]
    fn unknown_unit_is_unsupported() {
        let err = "fortnight".parse::<CadenceUnit>().unwrap_err();
        assert_eq!(err, TimeError::UnsupportedCadenceUnit("fortnight".into()));
    }

    #[test]
    fn zero_interval_rejected() {
        assert_eq!(
            Cadence::new(0, CadenceUnit::Day).unwrap_err(),
            ValidationError::InvalidInterval { interval: 0 }
        );
    }

    #[test]
    fn describe_pluralizes() {
        assert_eq!(Cadence::weekly().describe(), "week");
        assert_eq!(Cadence::new(3, CadenceUnit::Month).unwrap().describe(), "3 months");
    }

    #[test]
    fn preference_serde_shape() {
        let pref: PeriodStartPreference =
            serde_json::from_str(r#"{"mode":"week_day","week_start_day":3}"#).unwrap();
        assert_eq!(pref.week_start_day(), 3);

        let default: PeriodStartPreference = serde_json::from_str(r#"{"mode":"default"}"#).unwrap();
        assert_eq!(default, PeriodStartPreference::Default);
        assert_eq!(default.week_start_day(), 1);
    }

    #[test]
    fn weekday_out_of_range_rejected() {
        assert!(PeriodStartPreference::week_day(0).is_err());
        assert!(PeriodStartPreference::week_day(8).is_err());
        assert!(PeriodStartPreference::week_day(7).is_ok());
    }
}
