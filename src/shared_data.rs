// src/shared_data.rs

use crate::error::{MonitorError, Result};
use crate::global_variables::{
    CONGESTED_BAND_PCT, HEAVY_BAND_PCT, POLLUTION_ELEVATED_PCT, POLLUTION_HIGH_PCT,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A snapshot of one road at one point in time, as delivered by the sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadMetrics {
    pub road_id: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    /// Vehicles currently on the road. May exceed `capacity` transiently.
    pub vehicle_count: i64,
    /// Maximum number of vehicles the road can hold.
    pub capacity: i64,
    /// VOC index as a percentage of the danger ceiling, in [0, 100].
    pub pollution_level: f64,
}

impl RoadMetrics {
    pub fn new(
        road_id: &str,
        timestamp: u64,
        vehicle_count: i64,
        capacity: i64,
        pollution_level: f64,
    ) -> Self {
        Self {
            road_id: road_id.to_string(),
            timestamp,
            vehicle_count,
            capacity,
            pollution_level,
        }
    }

    // Rejects readings that cannot be evaluated. Occupancy above 100% is allowed.
    pub fn validate(&self) -> Result<()> {
        if self.capacity <= 0 {
            return Err(MonitorError::invalid_input(
                &self.road_id,
                format!("capacity must be positive, got {}", self.capacity),
            ));
        }
        if self.vehicle_count < 0 {
            return Err(MonitorError::invalid_input(
                &self.road_id,
                format!(
                    "vehicle count must be non-negative, got {}",
                    self.vehicle_count
                ),
            ));
        }
        if !(0.0..=100.0).contains(&self.pollution_level) {
            return Err(MonitorError::invalid_input(
                &self.road_id,
                format!(
                    "pollution level must be in [0, 100], got {}",
                    self.pollution_level
                ),
            ));
        }
        Ok(())
    }

    /// Occupancy as a percentage of capacity, unclamped. Callers must validate first.
    pub fn occupancy_pct(&self) -> f64 {
        100.0 * self.vehicle_count as f64 / self.capacity as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateStatus {
    Open,
    Closed,
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateStatus::Open => write!(f, "open"),
            GateStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Per-road gate state carried from one evaluation to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateState {
    pub status: GateStatus,
    pub last_transition_at: u64,
}

impl GateState {
    // A road seen for the first time starts with its gate open.
    pub fn initial(timestamp: u64) -> Self {
        Self {
            status: GateStatus::Open,
            last_transition_at: timestamp,
        }
    }
}

/// Congestion classification derived from occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoadStatus {
    Clear,
    Congested,
    Heavy,
}

impl RoadStatus {
    // <60 Clear, [60,80) Congested, >=80 Heavy.
    pub fn from_occupancy(occupancy_pct: f64) -> Self {
        if occupancy_pct >= HEAVY_BAND_PCT {
            RoadStatus::Heavy
        } else if occupancy_pct >= CONGESTED_BAND_PCT {
            RoadStatus::Congested
        } else {
            RoadStatus::Clear
        }
    }
}

impl fmt::Display for RoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadStatus::Clear => write!(f, "clear"),
            RoadStatus::Congested => write!(f, "congested"),
            RoadStatus::Heavy => write!(f, "heavy"),
        }
    }
}

/// Display bands for the VOC reading. Independent of the warning threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollutionLevel {
    Normal,
    Elevated,
    High,
}

impl PollutionLevel {
    pub fn from_reading(pollution_pct: f64) -> Self {
        if pollution_pct >= POLLUTION_HIGH_PCT {
            PollutionLevel::High
        } else if pollution_pct >= POLLUTION_ELEVATED_PCT {
            PollutionLevel::Elevated
        } else {
            PollutionLevel::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Critical,
}

/// An event for the notification-delivery side. Emitted, never stored by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub road_id: String,
    pub severity: Severity,
    pub reason: String,
    pub timestamp: u64,
}

impl NotificationEvent {
    pub fn new(road_id: &str, severity: Severity, reason: String, timestamp: u64) -> Self {
        Self {
            road_id: road_id.to_string(),
            severity,
            reason,
            timestamp,
        }
    }
}

/// Instruction for the gate-actuation side, published whenever a gate changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCommand {
    pub road_id: String,
    pub status: GateStatus,
    pub issued_at: u64,
}

impl GateCommand {
    pub fn from_state(road_id: &str, state: &GateState) -> Self {
        Self {
            road_id: road_id.to_string(),
            status: state.status,
            issued_at: state.last_transition_at,
        }
    }
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
