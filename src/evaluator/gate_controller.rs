use crate::config::ThresholdConfig;
use crate::shared_data::{GateState, GateStatus, NotificationEvent, Severity};

/// Result of running the gate state machine once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTransition {
    pub state: GateState,
    pub changed: bool,
}

/// Hysteresis state machine for one road's gate.
///
/// An open gate closes at or above `gate_close_occupancy_pct`; a closed gate
/// reopens at or below `gate_open_occupancy_pct`. Anything in between keeps the
/// current state.
pub fn next_gate_state(
    prior: &GateState,
    occupancy_pct: f64,
    thresholds: &ThresholdConfig,
    timestamp: u64,
) -> GateTransition {
    let target = match prior.status {
        GateStatus::Open if occupancy_pct >= thresholds.gate_close_occupancy_pct => {
            GateStatus::Closed
        }
        GateStatus::Closed if occupancy_pct <= thresholds.gate_open_occupancy_pct => {
            GateStatus::Open
        }
        current => current,
    };

    if target == prior.status {
        return GateTransition {
            state: *prior,
            changed: false,
        };
    }

    GateTransition {
        state: GateState {
            status: target,
            last_transition_at: timestamp,
        },
        changed: true,
    }
}

// Describes a gate that just changed state.
pub fn transition_event(
    road_id: &str,
    state: &GateState,
    occupancy_pct: f64,
    thresholds: &ThresholdConfig,
) -> NotificationEvent {
    let reason = match state.status {
        GateStatus::Closed => format!(
            "Gate closed: occupancy {:.1}% reached the close threshold of {}%",
            occupancy_pct, thresholds.gate_close_occupancy_pct
        ),
        GateStatus::Open => format!(
            "Gate opened: occupancy {:.1}% fell to the reopen threshold of {}%",
            occupancy_pct, thresholds.gate_open_occupancy_pct
        ),
    };
    NotificationEvent::new(road_id, Severity::Success, reason, state.last_transition_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_at(ts: u64) -> GateState {
        GateState::initial(ts)
    }

    fn closed_at(ts: u64) -> GateState {
        GateState {
            status: GateStatus::Closed,
            last_transition_at: ts,
        }
    }

    #[test]
    fn closes_at_exact_threshold() {
        let thresholds = ThresholdConfig::default();
        let transition = next_gate_state(&open_at(0), 80.0, &thresholds, 30);
        assert!(transition.changed);
        assert_eq!(transition.state.status, GateStatus::Closed);
        assert_eq!(transition.state.last_transition_at, 30);
    }

    #[test]
    fn reopens_at_exact_threshold_but_not_one_above() {
        let thresholds = ThresholdConfig::default();
        let held = next_gate_state(&closed_at(10), 41.0, &thresholds, 20);
        assert!(!held.changed);
        assert_eq!(held.state, closed_at(10));

        let reopened = next_gate_state(&closed_at(10), 40.0, &thresholds, 20);
        assert!(reopened.changed);
        assert_eq!(reopened.state.status, GateStatus::Open);
        assert_eq!(reopened.state.last_transition_at, 20);
    }

    #[test]
    fn no_chatter_inside_hysteresis_band() {
        let thresholds = ThresholdConfig::default();
        for prior in [open_at(5), closed_at(5)] {
            let mut state = prior;
            for (step, occupancy) in [40.5, 50.0, 79.9, 60.0, 41.0].iter().enumerate() {
                let transition = next_gate_state(&state, *occupancy, &thresholds, 100 + step as u64);
                assert!(!transition.changed);
                state = transition.state;
            }
            assert_eq!(state, prior);
        }
    }

    #[test]
    fn open_gate_stays_open_when_low() {
        let thresholds = ThresholdConfig::default();
        let transition = next_gate_state(&open_at(0), 10.0, &thresholds, 15);
        assert!(!transition.changed);
        assert_eq!(transition.state.last_transition_at, 0);
    }

    #[test]
    fn transition_event_is_success() {
        let thresholds = ThresholdConfig::default();
        let event = transition_event("nasr", &closed_at(42), 85.0, &thresholds);
        assert_eq!(event.severity, Severity::Success);
        assert_eq!(event.timestamp, 42);
        assert!(event.reason.starts_with("Gate closed"));
    }
}
