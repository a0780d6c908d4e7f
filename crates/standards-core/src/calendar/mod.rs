//! Calendar math core: period boundaries for day/week/month cadences in an
//! IANA timezone.

mod cadence;
mod window;
mod zone;

pub use cadence::{Cadence, CadenceUnit, PeriodStartPreference};
pub use window::{calculate_period_window, calculate_period_window_in, PeriodWindow, WindowOptions};
pub use zone::{parse_timezone, ZoneCalendar};

/// Milliseconds since the Unix epoch.
pub type TimestampMs = i64;
