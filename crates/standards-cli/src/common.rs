//! Shared helpers for CLI commands.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use standards_core::{Config, LogSlice, Standard, TimestampMs};

/// Standards and logs supplied by the host application as JSON.
#[derive(Debug, Deserialize)]
pub struct InputFile {
    /// Overrides the configured timezone.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub standards: Vec<Standard>,
    #[serde(default)]
    pub logs: Vec<LogSlice>,
}

impl InputFile {
    pub fn timezone<'a>(&'a self, config: &'a Config) -> &'a str {
        self.timezone.as_deref().unwrap_or(&config.timezone)
    }
}

/// Read the input file from `path`, or from the configured default.
pub fn load_input(path: Option<&Path>, config: &Config) -> Result<InputFile, Box<dyn std::error::Error>> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => config
            .input
            .as_ref()
            .map(PathBuf::from)
            .ok_or("no input file given (pass --input or set the `input` config key)")?,
    };
    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let input: InputFile = serde_json::from_str(&content)?;
    Ok(input)
}

/// Parse an RFC 3339 instant, or use the current time when absent.
pub fn instant_or_now(value: Option<&str>) -> Result<TimestampMs, Box<dyn std::error::Error>> {
    match value {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .map_err(|e| format!("invalid timestamp '{s}': {e}"))?
            .timestamp_millis()),
        None => Ok(Utc::now().timestamp_millis()),
    }
}
