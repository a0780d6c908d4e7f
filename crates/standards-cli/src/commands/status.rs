use clap::Args;
use standards_core::derive_period_status;

use crate::common::instant_or_now;

#[derive(Args)]
pub struct StatusArgs {
    /// Accumulated total for the period
    #[arg(long, allow_hyphen_values = true)]
    total: f64,
    /// Minimum required for the period
    #[arg(long, allow_hyphen_values = true)]
    minimum: f64,
    /// Period end (RFC 3339, exclusive)
    #[arg(long)]
    end: String,
    /// Evaluation instant (RFC 3339); defaults to now
    #[arg(long)]
    now: Option<String>,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let end = instant_or_now(Some(args.end.as_str()))?;
    let now = instant_or_now(args.now.as_deref())?;
    println!("{}", derive_period_status(args.total, args.minimum, now, end));
    Ok(())
}
