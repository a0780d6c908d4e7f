use clap::Args;
use std::path::PathBuf;
use standards_core::{build_dashboard_progress_map, Config, ProgressInput};

use crate::common::{instant_or_now, load_input};

#[derive(Args)]
pub struct ProgressArgs {
    /// JSON file with `standards` and `logs`
    #[arg(long)]
    input: Option<PathBuf>,
    /// Wall-clock instant (RFC 3339); defaults to now
    #[arg(long)]
    now: Option<String>,
    /// Reference instant for period selection (RFC 3339); defaults to --now
    #[arg(long)]
    reference: Option<String>,
}

pub fn run(args: ProgressArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let input = load_input(args.input.as_deref(), config)?;
    let now_ms = instant_or_now(args.now.as_deref())?;
    let window_reference_ms = args
        .reference
        .as_deref()
        .map(|r| instant_or_now(Some(r)))
        .transpose()?;

    let map = build_dashboard_progress_map(ProgressInput {
        standards: &input.standards,
        logs: &input.logs,
        timezone: input.timezone(config),
        now_ms,
        window_reference_ms,
    })?;
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}
