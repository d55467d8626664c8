//! Operator-tunable policy for gate automation and notifications.
//!
//! Configs are JSON files. Missing fields take their defaults:
//!
//! ```json
//! {
//!   "thresholds": {
//!     "gate_close_occupancy_pct": 80,
//!     "gate_open_occupancy_pct": 40,
//!     "pollution_warning_pct": 70,
//!     "update_interval_seconds": 15
//!   },
//!   "automation": { "auto_notifications": true, "auto_gate_control": true },
//!   "history_capacity": 4
//! }
//! ```

use crate::error::{MonitorError, Result};
use crate::global_variables::{
    CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE, DEFAULT_GATE_CLOSE_PCT, DEFAULT_GATE_OPEN_PCT,
    DEFAULT_HISTORY_CAPACITY, DEFAULT_POLLUTION_WARNING_PCT, DEFAULT_UPDATE_INTERVAL_SECS,
    GATE_CLOSE_RANGE, GATE_OPEN_RANGE, POLLUTION_WARNING_RANGE, UPDATE_INTERVAL_RANGE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Occupancy % at or above which an open gate closes.
    pub gate_close_occupancy_pct: f64,
    /// Occupancy % at or below which a closed gate reopens.
    pub gate_open_occupancy_pct: f64,
    /// Pollution % at or above which a warning is raised.
    pub pollution_warning_pct: f64,
    /// Minimum spacing between two evaluations of the same road.
    pub update_interval_seconds: u64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            gate_close_occupancy_pct: DEFAULT_GATE_CLOSE_PCT,
            gate_open_occupancy_pct: DEFAULT_GATE_OPEN_PCT,
            pollution_warning_pct: DEFAULT_POLLUTION_WARNING_PCT,
            update_interval_seconds: DEFAULT_UPDATE_INTERVAL_SECS,
        }
    }
}

impl ThresholdConfig {
    // Ordering is checked before ranges so an inverted pair reports the ordering problem.
    pub fn validate(&self) -> Result<()> {
        if self.gate_open_occupancy_pct >= self.gate_close_occupancy_pct {
            return Err(MonitorError::InvalidConfig(format!(
                "gate_open_occupancy_pct ({}) must be below gate_close_occupancy_pct ({})",
                self.gate_open_occupancy_pct, self.gate_close_occupancy_pct
            )));
        }
        check_range(
            "gate_close_occupancy_pct",
            self.gate_close_occupancy_pct,
            GATE_CLOSE_RANGE,
        )?;
        check_range(
            "gate_open_occupancy_pct",
            self.gate_open_occupancy_pct,
            GATE_OPEN_RANGE,
        )?;
        check_range(
            "pollution_warning_pct",
            self.pollution_warning_pct,
            POLLUTION_WARNING_RANGE,
        )?;
        let (min_secs, max_secs) = UPDATE_INTERVAL_RANGE;
        if !(min_secs..=max_secs).contains(&self.update_interval_seconds) {
            return Err(MonitorError::InvalidConfig(format!(
                "update_interval_seconds must be in [{}, {}], got {}",
                min_secs, max_secs, self.update_interval_seconds
            )));
        }
        Ok(())
    }
}

fn check_range(field: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(MonitorError::InvalidConfig(format!(
            "{} must be in [{}, {}], got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

/// Switches from the settings panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationSettings {
    /// Raise threshold notifications automatically.
    pub auto_notifications: bool,
    /// Open and close gates automatically.
    pub auto_gate_control: bool,
    /// Passed through to the delivery side; not interpreted here.
    pub notification_sound: bool,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            auto_notifications: true,
            auto_gate_control: true,
            notification_sound: true,
        }
    }
}

/// Everything one deployment of the monitor is configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub thresholds: ThresholdConfig,
    pub automation: AutomationSettings,
    /// Readings kept per road for trend and averages.
    pub history_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            automation: AutomationSettings::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if self.history_capacity == 0 {
            return Err(MonitorError::InvalidConfig(
                "history_capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    // Parses and validates; a config that fails validation is never returned.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MonitorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&contents)?;
        log::info!(
            "Loaded monitor config from {}: {:?}",
            path.as_ref().display(),
            config.thresholds
        );
        Ok(config)
    }

    /// Loads `path`, or returns the defaults when no file exists there yet.
    pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "No config file at {}, using default thresholds",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Config file shared by the monitor, the sensor feed and the admin CLI.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string())
}
