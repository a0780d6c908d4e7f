//! Core error types for standards-core.
//!
//! Every failure in the engine is a contract violation on the caller's side
//! (bad zone string, out-of-range timestamp, malformed cadence). Nothing here
//! is transient, so nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for standards-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Calendar arithmetic errors
    #[error("Time error: {0}")]
    Time(#[from] TimeError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the calendar math core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Unknown IANA zone, unrepresentable timestamp or unresolvable local time.
    #[error("Invalid time input: {message}")]
    InvalidTimeInput { message: String },

    /// Cadence unit outside `day | week | month`.
    #[error("Unsupported cadence unit: {0}")]
    UnsupportedCadenceUnit(String),
}

impl TimeError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidTimeInput {
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Cadence interval below one
    #[error("Invalid cadence interval {interval}: must be at least 1")]
    InvalidInterval { interval: u32 },

    /// Weekday outside Monday=1..Sunday=7
    #[error("Invalid weekday {weekday}: expected 1 (Monday) through 7 (Sunday)")]
    InvalidWeekday { weekday: u8 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
