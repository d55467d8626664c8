use crate::error::Result;
use crate::shared_data::{PollutionLevel, RoadMetrics, RoadStatus};
use serde::{Deserialize, Serialize};

/// Everything derived from one reading that does not depend on operator thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadReading {
    pub occupancy_pct: f64,
    pub status: RoadStatus,
    pub pollution: PollutionLevel,
}

// The one place occupancy is turned into a status; every view goes through here.
pub fn classify(metrics: &RoadMetrics) -> Result<RoadReading> {
    metrics.validate()?;
    let occupancy_pct = metrics.occupancy_pct();
    Ok(RoadReading {
        occupancy_pct,
        status: RoadStatus::from_occupancy(occupancy_pct),
        pollution: PollutionLevel::from_reading(metrics.pollution_level),
    })
}
