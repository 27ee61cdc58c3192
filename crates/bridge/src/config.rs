//! Bridge run configuration
//!
//! Loaded from a TOML file by the host wiring; everything except the serial
//! number and the parameter map path has a default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use contracts::BridgeError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BridgeConfig {
    /// Serial number of the camera to bind to
    #[validate(length(min = 1))]
    pub serial: String,

    /// Coordinate frame id stamped on outgoing messages
    #[serde(default = "default_frame_id")]
    pub frame_id: String,

    /// Path of the parameter map file
    pub parameter_file: PathBuf,

    /// Handoff queue capacity
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1))]
    pub queue_capacity: usize,

    /// Interval between throughput status reports (milliseconds)
    #[serde(default = "default_status_interval_ms")]
    #[validate(range(min = 100))]
    pub status_interval_ms: u64,

    /// Ask the device to compute mean brightness per frame
    #[serde(default)]
    pub compute_brightness: bool,

    /// Device-side acquisition timeout (seconds)
    #[serde(default = "default_acquisition_timeout_s")]
    pub acquisition_timeout_s: f64,

    /// Log the full device node map after init
    #[serde(default)]
    pub dump_node_map: bool,

    /// Discovery retry attempts before giving up
    #[serde(default = "default_discovery_attempts")]
    #[validate(range(min = 1))]
    pub discovery_attempts: u32,

    /// Spacing between discovery attempts (milliseconds)
    #[serde(default = "default_discovery_delay_ms")]
    pub discovery_delay_ms: u64,
}

fn default_frame_id() -> String {
    "camera".to_string()
}

fn default_queue_capacity() -> usize {
    2
}

fn default_status_interval_ms() -> u64 {
    5_000
}

fn default_acquisition_timeout_s() -> f64 {
    3.0
}

fn default_discovery_attempts() -> u32 {
    5
}

fn default_discovery_delay_ms() -> u64 {
    1_000
}

impl BridgeConfig {
    /// Minimal configuration for the given serial and parameter map
    pub fn new(serial: impl Into<String>, parameter_file: impl Into<PathBuf>) -> Self {
        Self {
            serial: serial.into(),
            frame_id: default_frame_id(),
            parameter_file: parameter_file.into(),
            queue_capacity: default_queue_capacity(),
            status_interval_ms: default_status_interval_ms(),
            compute_brightness: false,
            acquisition_timeout_s: default_acquisition_timeout_s(),
            dump_node_map: false,
            discovery_attempts: default_discovery_attempts(),
            discovery_delay_ms: default_discovery_delay_ms(),
        }
    }

    /// Load and validate a configuration file
    ///
    /// # Errors
    /// IO errors, TOML parse errors, and validation failures all map to
    /// fatal `BridgeError`s.
    pub fn load_from_path(path: &Path) -> Result<Self, BridgeError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| BridgeError::config(format!("TOML parse error: {e}")))?;
        config
            .validate()
            .map_err(|e| BridgeError::config(e.to_string()))?;
        Ok(config)
    }

    /// Status report interval
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    /// Discovery retry spacing
    pub fn discovery_delay(&self) -> Duration {
        Duration::from_millis(self.discovery_delay_ms)
    }
}
