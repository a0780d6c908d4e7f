//! Real-time boundary following.
//!
//! Drives the boundary scheduler against the system clock. The loop naps in
//! slices no longer than the suspend threshold so that a wall-clock jump
//! (laptop lid closed, process stopped) is noticed and handled as a resume
//! rather than a late timer fire.

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use standards_core::{
    parse_timezone, BoundaryScheduler, Clock, Config, DeadlineTimer, Event, LogSlice, SystemClock,
};
use tracing::{debug, info, warn};

use crate::common::load_input;

#[derive(Args)]
pub struct WatchArgs {
    /// JSON file with `standards` and `logs`
    #[arg(long)]
    input: Option<PathBuf>,
    /// Exit after this many period advances
    #[arg(long)]
    max_advances: Option<u32>,
}

pub fn run(args: WatchArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch(args, config))
}

type Scheduler = BoundaryScheduler<SystemClock, DeadlineTimer>;

async fn watch(args: WatchArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let input = load_input(args.input.as_deref(), config)?;
    let tz = parse_timezone(input.timezone(config))?;
    let threshold_secs = config.scheduler.suspend_threshold_secs.max(1);
    let nap_cap = Duration::from_secs(threshold_secs);
    let suspend_threshold_ms = (threshold_secs * 1000) as i64;

    let mut scheduler: Scheduler = BoundaryScheduler::new(SystemClock, DeadlineTimer::new(), tz);
    let events = scheduler.start(input.standards.clone())?;
    log_events(&events);
    report(&scheduler, &input.logs)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut advances = 0u32;

    loop {
        let Some(deadline) = scheduler.timer().pending() else {
            info!("no active standards; nothing to watch");
            break;
        };

        let before = scheduler.clock().now_ms();
        let remaining = (deadline.target_ms - before).max(0) as u64;
        let nap = Duration::from_millis(remaining).min(nap_cap);

        tokio::select! {
            _ = tokio::time::sleep(nap) => {}
            result = &mut ctrl_c => {
                result?;
                log_events(&scheduler.stop());
                break;
            }
        }

        let now = scheduler.clock().now_ms();
        let nap_ms = nap.as_millis() as i64;
        let events = match wake_kind(before, now, nap_ms, suspend_threshold_ms, deadline.target_ms) {
            Some(Wake::Resume) => {
                warn!(overslept_ms = now - before - nap_ms, "wall clock jumped; treating as resume");
                scheduler.on_resume()?
            }
            Some(Wake::TimerFired) => scheduler.on_timer_fired()?,
            None => continue,
        };
        log_events(&events);

        if events.iter().any(Event::requires_refresh) {
            report(&scheduler, &input.logs)?;
            advances += 1;
        }
        if args.max_advances.is_some_and(|max| advances >= max) {
            log_events(&scheduler.stop());
            break;
        }
    }
    Ok(())
}

/// Why the loop woke up, if it needs to tell the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Resume,
    TimerFired,
}

/// Classify a wake from a nap of `nap_ms` that began at `before_ms`.
///
/// Oversleeping by more than `threshold_ms` means the process was suspended
/// and takes priority over a deadline that also passed meanwhile.
fn wake_kind(
    before_ms: i64,
    now_ms: i64,
    nap_ms: i64,
    threshold_ms: i64,
    deadline_ms: i64,
) -> Option<Wake> {
    let overslept_ms = now_ms - before_ms - nap_ms;
    if overslept_ms > threshold_ms {
        Some(Wake::Resume)
    } else if now_ms >= deadline_ms {
        Some(Wake::TimerFired)
    } else {
        None
    }
}

fn log_events(events: &[Event]) {
    for event in events {
        debug!(?event, "scheduler event");
    }
}

/// One JSON line per refresh.
fn report(scheduler: &Scheduler, logs: &[LogSlice]) -> Result<(), Box<dyn std::error::Error>> {
    let progress = scheduler.progress(logs)?;
    let line = serde_json::json!({
        "reference_ms": scheduler.window_reference_ms(),
        "progress": progress,
    });
    println!("{line}");
    Ok(())
}
