//! # Standards Core Library
//!
//! Period window and progress engine for "Standards": recurring minimum
//! volumes of an activity (e.g. "100 calls / week") that users log progress
//! against. Persistence, sync and presentation belong to the host; the core
//! only answers "which period is current", "how far along is it" and "when
//! does the current period end".
//!
//! ## Architecture
//!
//! - **Calendar**: timezone-aware day/week/month period boundaries
//! - **Status**: tri-state `Met | In Progress | Missed` derivation
//! - **Progress**: per-standard totals, sessions and percent for the period
//!   containing a reference instant
//! - **Scheduler**: a single-timer state machine that advances the reference
//!   instant atomically for all standards at the nearest period boundary
//!
//! ## Key Components
//!
//! - [`calculate_period_window`]: period containing an instant
//! - [`build_dashboard_progress_map`]: per-standard progress snapshot
//! - [`BoundaryScheduler`]: reference-time owner and boundary timer
//! - [`Config`]: engine configuration

pub mod calendar;
pub mod config;
pub mod error;
pub mod events;
pub mod progress;
pub mod scheduler;
pub mod status;

pub use calendar::{
    calculate_period_window, calculate_period_window_in, parse_timezone, Cadence, CadenceUnit,
    PeriodStartPreference, PeriodWindow, TimestampMs, WindowOptions, ZoneCalendar,
};
pub use config::Config;
pub use error::{ConfigError, CoreError, TimeError, ValidationError};
pub use events::{AdvanceReason, Event};
pub use progress::{
    build_dashboard_progress_map, build_progress_map_in, progress_percent, LogSlice,
    ProgressInput, ProgressMap, ProgressSnapshot, SessionConfig, Standard,
};
pub use scheduler::{
    BoundaryScheduler, Clock, DeadlineTimer, ManualClock, ManualTimer, SchedulerState,
    SystemClock, Timer,
};
pub use status::{derive_period_status, PeriodStatus};
