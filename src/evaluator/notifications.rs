use crate::config::ThresholdConfig;
use crate::shared_data::{NotificationEvent, RoadMetrics, RoadStatus, Severity};

/// Threshold triggers for one reading. Returns at most one event.
///
/// - pollution at/above the warning threshold on a `Heavy` road: critical
/// - pollution at/above the warning threshold otherwise: warning
/// - `Heavy` road with pollution below the threshold: warning
// TODO: the critical rule (heavy + polluted) needs sign-off from operations before it drives paging.
pub fn threshold_event(
    metrics: &RoadMetrics,
    status: RoadStatus,
    occupancy_pct: f64,
    thresholds: &ThresholdConfig,
) -> Option<NotificationEvent> {
    let polluted = metrics.pollution_level >= thresholds.pollution_warning_pct;
    let heavy = status == RoadStatus::Heavy;

    let (severity, reason) = match (polluted, heavy) {
        (true, true) => (
            Severity::Critical,
            format!(
                "Pollution at {:.0}% with heavy congestion ({}/{} vehicles)",
                metrics.pollution_level, metrics.vehicle_count, metrics.capacity
            ),
        ),
        (true, false) => (
            Severity::Warning,
            format!(
                "Pollution reached {:.0}% (warning threshold {}%)",
                metrics.pollution_level, thresholds.pollution_warning_pct
            ),
        ),
        (false, true) => (
            Severity::Warning,
            format!(
                "Heavy congestion: {}/{} vehicles ({:.1}% of capacity)",
                metrics.vehicle_count, metrics.capacity, occupancy_pct
            ),
        ),
        (false, false) => return None,
    };

    Some(NotificationEvent::new(
        &metrics.road_id,
        severity,
        reason,
        metrics.timestamp,
    ))
}
