use super::road_monitor::RoadMonitor;
use crate::shared_data::{GateStatus, RoadStatus};
use serde::{Deserialize, Serialize};

/// Fleet-wide figures shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_roads: usize,
    pub open_gates: usize,
    pub closed_gates: usize,
    /// Mean of each road's latest occupancy, rounded to a whole percent.
    pub average_occupancy_pct: u32,
    pub clear_roads: usize,
    pub congested_roads: usize,
    pub heavy_roads: usize,
}

impl DashboardSummary {
    pub fn from_monitor(monitor: &RoadMonitor) -> Self {
        let mut summary = DashboardSummary::default();
        let mut occupancy_sum = 0.0;

        for (_, state) in monitor.roads() {
            summary.total_roads += 1;
            match state.gate.status {
                GateStatus::Open => summary.open_gates += 1,
                GateStatus::Closed => summary.closed_gates += 1,
            }
            match state.last_status {
                RoadStatus::Clear => summary.clear_roads += 1,
                RoadStatus::Congested => summary.congested_roads += 1,
                RoadStatus::Heavy => summary.heavy_roads += 1,
            }
            occupancy_sum += state.last_occupancy_pct;
        }

        if summary.total_roads > 0 {
            summary.average_occupancy_pct =
                (occupancy_sum / summary.total_roads as f64).round() as u32;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::sample_roads::sample_readings;

    #[test]
    fn summary_of_sample_roads() {
        let mut monitor = RoadMonitor::new();
        monitor.process_batch(&sample_readings(0), &MonitorConfig::default());

        let summary = DashboardSummary::from_monitor(&monitor);
        assert_eq!(summary.total_roads, 4);
        assert_eq!(summary.closed_gates, 2);
        assert_eq!(summary.open_gates, 2);
        // (85 + 45 + 80 + 29.17) / 4
        assert_eq!(summary.average_occupancy_pct, 60);
        assert_eq!(summary.heavy_roads, 2);
        assert_eq!(summary.clear_roads, 2);
        assert_eq!(summary.congested_roads, 0);
    }

    #[test]
    fn empty_monitor_is_all_zero() {
        let summary = DashboardSummary::from_monitor(&RoadMonitor::new());
        assert_eq!(summary, DashboardSummary::default());
    }
}
