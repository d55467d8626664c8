//! Road status evaluator: classification, gate hysteresis and notification triggers.

pub mod gate_controller;
pub mod notifications;
pub mod road_status;

pub use gate_controller::{next_gate_state, transition_event, GateTransition};
pub use notifications::threshold_event;
pub use road_status::{classify, RoadReading};

use crate::config::ThresholdConfig;
use crate::error::Result;
use crate::shared_data::{GateState, NotificationEvent, RoadMetrics, RoadStatus};

/// Output of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub reading: RoadReading,
    pub gate: GateState,
    pub gate_changed: bool,
    /// Gate transition first (if any), then the threshold trigger (if any).
    pub events: Vec<NotificationEvent>,
}

impl Evaluation {
    pub fn status(&self) -> RoadStatus {
        self.reading.status
    }
}

/// Evaluates one reading against a validated config and the road's prior gate state.
///
/// Pure: the only state is `prior_gate`, and the new gate state is returned in
/// the `Evaluation`. Fails only on an invalid reading.
pub fn evaluate(
    metrics: &RoadMetrics,
    thresholds: &ThresholdConfig,
    prior_gate: &GateState,
) -> Result<Evaluation> {
    let reading = classify(metrics)?;

    let transition = next_gate_state(
        prior_gate,
        reading.occupancy_pct,
        thresholds,
        metrics.timestamp,
    );

    let mut events = Vec::with_capacity(2);
    if transition.changed {
        events.push(transition_event(
            &metrics.road_id,
            &transition.state,
            reading.occupancy_pct,
            thresholds,
        ));
    }
    if let Some(event) = threshold_event(metrics, reading.status, reading.occupancy_pct, thresholds)
    {
        events.push(event);
    }

    Ok(Evaluation {
        reading,
        gate: transition.state,
        gate_changed: transition.changed,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_data::{GateStatus, Severity};

    #[test]
    fn closing_and_heavy_emits_gate_event_first() {
        let metrics = RoadMetrics::new("nasr", 100, 85, 100, 40.0);
        let result = evaluate(&metrics, &ThresholdConfig::default(), &GateState::initial(0)).unwrap();

        assert_eq!(result.status(), RoadStatus::Heavy);
        assert!(result.gate_changed);
        assert_eq!(result.gate.status, GateStatus::Closed);
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].severity, Severity::Success);
        assert_eq!(result.events[1].severity, Severity::Warning);
    }

    #[test]
    fn invalid_reading_is_an_error() {
        let metrics = RoadMetrics::new("nasr", 100, 5, 0, 40.0);
        assert!(evaluate(&metrics, &ThresholdConfig::default(), &GateState::initial(0)).is_err());
    }

    #[test]
    fn same_inputs_same_output() {
        let metrics = RoadMetrics::new("ring", 50, 120, 150, 85.0);
        let thresholds = ThresholdConfig::default();
        let prior = GateState::initial(0);
        let first = evaluate(&metrics, &thresholds, &prior).unwrap();
        let second = evaluate(&metrics, &thresholds, &prior).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn feeding_back_gate_state_does_not_repeat_transition() {
        let thresholds = ThresholdConfig::default();
        let metrics = RoadMetrics::new("nasr", 100, 85, 100, 30.0);
        let first = evaluate(&metrics, &thresholds, &GateState::initial(0)).unwrap();
        assert!(first.gate_changed);

        let again = RoadMetrics {
            timestamp: 115,
            ..metrics
        };
        let second = evaluate(&again, &thresholds, &first.gate).unwrap();
        assert!(!second.gate_changed);
        assert_eq!(second.gate.last_transition_at, 100);
        assert!(second
            .events
            .iter()
            .all(|e| e.severity != Severity::Success));
    }
}
