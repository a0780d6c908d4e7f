use clap::Args;
use standards_core::{calculate_period_window, Cadence, CadenceUnit, Config, PeriodStartPreference, WindowOptions};

use crate::common::instant_or_now;

#[derive(Args)]
pub struct WindowArgs {
    /// Cadence unit: day, week or month
    #[arg(long)]
    unit: String,
    /// Number of units per period
    #[arg(long, default_value_t = 1)]
    interval: u32,
    /// Instant to evaluate (RFC 3339); defaults to now
    #[arg(long)]
    at: Option<String>,
    /// IANA timezone; defaults to the configured one
    #[arg(long)]
    tz: Option<String>,
    /// First day of the week for weekly cadences (1 = Monday .. 7 = Sunday)
    #[arg(long)]
    week_start: Option<u8>,
}

pub fn run(args: WindowArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let unit: CadenceUnit = args.unit.parse()?;
    let cadence = Cadence::new(args.interval, unit)?;
    let preference = args
        .week_start
        .map(PeriodStartPreference::week_day)
        .transpose()?;
    let at = instant_or_now(args.at.as_deref())?;
    let timezone = args.tz.as_deref().unwrap_or(&config.timezone);

    let window = calculate_period_window(at, &cadence, timezone, WindowOptions::with_preference(preference))?;
    println!("{}", serde_json::to_string_pretty(&window)?);
    Ok(())
}
