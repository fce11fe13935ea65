//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub tracks: TracksConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Capture behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Deadline for one capture when the caller does not pass one.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Wait for the page-stability signal before reading the main frame.
    #[serde(default = "default_true")]
    pub wait_for_stable: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            wait_for_stable: true,
        }
    }
}

impl SnapshotConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

/// Incremental-diff baselines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksConfig {
    /// Baselines kept per page; the least recently used one is dropped beyond this.
    #[serde(default = "default_max_tracks")]
    pub max_tracks: usize,
}

impl Default for TracksConfig {
    fn default() -> Self {
        Self {
            max_tracks: default_max_tracks(),
        }
    }
}

fn default_max_tracks() -> usize {
    64
}

/// Tracing subscriber setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,

    /// Directory for daily rolling log files. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            dir: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
