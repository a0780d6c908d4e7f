//! Timezone-aware calendar arithmetic.
//!
//! The period math only needs two questions answered by a zone: which local
//! calendar date contains an instant, and when does a local date begin.
//! Everything else (adding days, weeks, months) happens on naive dates.

use chrono::{DateTime, Days, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::TimestampMs;
use crate::error::TimeError;

/// Any UTC offset plus the longest skipped span (a whole day) fits in this.
const GAP_SEARCH_SPAN_MS: i64 = 40 * 3_600_000;

/// Calendar queries in a specific zone.
pub trait ZoneCalendar {
    /// Local calendar date containing `timestamp_ms`.
    fn local_date(&self, timestamp_ms: TimestampMs) -> Result<NaiveDate, TimeError>;

    /// First instant of `date` in this zone.
    ///
    /// Midnight inside a DST gap resolves to the first valid local instant
    /// after it; an ambiguous midnight resolves to the earlier instant.
    fn start_of_local_day(&self, date: NaiveDate) -> Result<TimestampMs, TimeError>;
}

impl<Z: TimeZone> ZoneCalendar for Z {
    fn local_date(&self, timestamp_ms: TimestampMs) -> Result<NaiveDate, TimeError> {
        let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
            TimeError::invalid(format!("timestamp {timestamp_ms} is out of range"))
        })?;
        Ok(utc.with_timezone(self).date_naive())
    }

    fn start_of_local_day(&self, date: NaiveDate) -> Result<TimestampMs, TimeError> {
        let midnight = date.and_time(NaiveTime::MIN);
        match self.from_local_datetime(&midnight) {
            LocalResult::Single(dt) => Ok(dt.timestamp_millis()),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp_millis()),
            LocalResult::None => first_instant_at_or_after(self, midnight).ok_or_else(|| {
                TimeError::invalid(format!("local midnight of {date} cannot be resolved"))
            }),
        }
    }
}

/// Earliest instant whose local wall time is at or after `local`.
///
/// Only used when `local` does not exist; wall time is non-decreasing across
/// a gap, so a binary search over the surrounding span finds where it ends.
fn first_instant_at_or_after<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> Option<TimestampMs> {
    let reaches = |ts: TimestampMs| {
        DateTime::<Utc>::from_timestamp_millis(ts)
            .is_some_and(|utc| utc.with_timezone(zone).naive_local() >= local)
    };
    let naive_ms = local.and_utc().timestamp_millis();
    let mut lo = naive_ms - GAP_SEARCH_SPAN_MS;
    let mut hi = naive_ms + GAP_SEARCH_SPAN_MS;
    if reaches(lo) || !reaches(hi) {
        return None;
    }
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if reaches(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some(hi)
}

/// Parse an IANA zone name such as `"America/New_York"`.
pub fn parse_timezone(name: &str) -> Result<Tz, TimeError> {
    name.parse::<Tz>()
        .map_err(|_| TimeError::invalid(format!("unrecognized timezone '{name}'")))
}

pub(crate) fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, TimeError> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| TimeError::invalid(format!("{date} + {days} days overflows")))
}

pub(crate) fn sub_days(date: NaiveDate, days: u64) -> Result<NaiveDate, TimeError> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| TimeError::invalid(format!("{date} - {days} days overflows")))
}

pub(crate) fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, TimeError> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| TimeError::invalid(format!("{date} + {months} months overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(rfc3339: &str) -> TimestampMs {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().timestamp_millis()
    }

    #[test]
    fn local_date_follows_zone() {
        // 03:00 UTC on Dec 10 is still Dec 9 in New York.
        let tz = parse_timezone("America/New_York").unwrap();
        let date = tz.local_date(ms("2025-12-10T03:00:00Z")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 12, 9).unwrap());
    }

    #[test]
    fn start_of_day_in_offset_zone() {
        let tz = parse_timezone("Asia/Tokyo").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
        assert_eq!(
            tz.start_of_local_day(date).unwrap(),
            ms("2025-12-09T15:00:00Z")
        );
    }

    #[test]
    fn midnight_in_dst_gap_resolves_forward() {
        // Chile springs forward at local midnight; 2024-09-08 starts at 01:00 -03.
        let tz = parse_timezone("America/Santiago").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        assert_eq!(
            tz.start_of_local_day(date).unwrap(),
            ms("2024-09-08T04:00:00Z")
        );
    }

    #[test]
    fn skipped_calendar_day_resolves_to_next_existing_instant() {
        // Samoa jumped from 2011-12-29 23:59:59 -10:00 to 2011-12-31 00:00 +14:00.
        let tz = parse_timezone("Pacific/Apia").unwrap();
        let skipped = NaiveDate::from_ymd_opt(2011, 12, 30).unwrap();
        assert_eq!(
            tz.start_of_local_day(skipped).unwrap(),
            ms("2011-12-30T10:00:00Z")
        );
    }

    #[test]
    fn unknown_zone_is_invalid_time_input() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, TimeError::InvalidTimeInput { .. }));
    }

    #[test]
    fn utc_and_fixed_offsets_are_zones_too() {
        let date = Utc.local_date(ms("2025-01-31T23:59:59Z")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());

        let plus_two = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let date = plus_two.local_date(ms("2025-01-31T23:00:00Z")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    }
}
