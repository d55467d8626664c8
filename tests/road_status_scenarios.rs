use road_gate_monitor::config::{MonitorConfig, ThresholdConfig};
use road_gate_monitor::error::MonitorError;
use road_gate_monitor::evaluator::evaluate;
use road_gate_monitor::monitoring::{DashboardSummary, MonitorOutcome, NotificationFeed, RoadMonitor};
use road_gate_monitor::sample_roads::sample_readings;
use road_gate_monitor::shared_data::{
    GateState, GateStatus, RoadMetrics, RoadStatus, Severity,
};

fn closed_gate() -> GateState {
    GateState {
        status: GateStatus::Closed,
        last_transition_at: 0,
    }
}

#[test]
fn status_bands_over_whole_percent_range() {
    let thresholds = ThresholdConfig::default();
    for vehicles in 0..=130 {
        let metrics = RoadMetrics::new("r", 0, vehicles, 100, 0.0);
        let result = evaluate(&metrics, &thresholds, &GateState::initial(0)).unwrap();
        let expected = if vehicles < 60 {
            RoadStatus::Clear
        } else if vehicles < 80 {
            RoadStatus::Congested
        } else {
            RoadStatus::Heavy
        };
        assert_eq!(result.status(), expected, "vehicles = {}", vehicles);
    }
}

#[test]
fn closed_gate_reopens_exactly_at_open_threshold() {
    let thresholds = ThresholdConfig::default();
    let at = RoadMetrics::new("r", 10, 40, 100, 0.0);
    let above = RoadMetrics::new("r", 10, 41, 100, 0.0);

    let reopened = evaluate(&at, &thresholds, &closed_gate()).unwrap();
    assert_eq!(reopened.gate.status, GateStatus::Open);
    assert_eq!(reopened.gate.last_transition_at, 10);

    let held = evaluate(&above, &thresholds, &closed_gate()).unwrap();
    assert_eq!(held.gate, closed_gate());
    assert!(held.events.is_empty());
}

#[test]
fn no_chatter_between_thresholds() {
    let thresholds = ThresholdConfig::default();
    for prior in [GateState::initial(0), closed_gate()] {
        let mut gate = prior;
        for (step, vehicles) in (41..80).enumerate() {
            let metrics = RoadMetrics::new("r", step as u64 * 15, vehicles, 100, 0.0);
            let result = evaluate(&metrics, &thresholds, &gate).unwrap();
            assert!(!result.gate_changed);
            gate = result.gate;
        }
        assert_eq!(gate, prior);
    }
}

#[test]
fn second_call_with_fed_back_state_is_silent() {
    let thresholds = ThresholdConfig::default();
    let crossing = RoadMetrics::new("r", 0, 30, 100, 10.0);
    let first = evaluate(&crossing, &thresholds, &closed_gate()).unwrap();
    assert_eq!(first.events.len(), 1);

    let second = evaluate(&crossing, &thresholds, &first.gate).unwrap();
    assert!(second.events.is_empty());
    assert_eq!(second.gate, first.gate);
}

#[test]
fn inverted_config_is_invalid() {
    let thresholds = ThresholdConfig {
        gate_open_occupancy_pct: 80.0,
        gate_close_occupancy_pct: 70.0,
        ..ThresholdConfig::default()
    };
    assert!(matches!(
        thresholds.validate(),
        Err(MonitorError::InvalidConfig(_))
    ));
}

#[test]
fn heavy_road_closes_open_gate() {
    let metrics = RoadMetrics::new("nasr", 60, 85, 100, 30.0);
    let result = evaluate(&metrics, &ThresholdConfig::default(), &GateState::initial(0)).unwrap();

    assert!((result.reading.occupancy_pct - 85.0).abs() < 1e-9);
    assert_eq!(result.status(), RoadStatus::Heavy);
    assert_eq!(result.gate.status, GateStatus::Closed);
    assert_eq!(result.gate.last_transition_at, 60);
    assert_eq!(result.events[0].severity, Severity::Success);
    assert!(result.events[0].reason.starts_with("Gate closed"));
}

#[test]
fn quiet_road_stays_open_without_notifications() {
    let metrics = RoadMetrics::new("salah-salem", 60, 35, 120, 35.0);
    let result = evaluate(&metrics, &ThresholdConfig::default(), &GateState::initial(0)).unwrap();

    assert!((result.reading.occupancy_pct - 29.17).abs() < 0.01);
    assert_eq!(result.status(), RoadStatus::Clear);
    assert!(!result.gate_changed);
    assert!(result.events.is_empty());
}

#[test]
fn heavy_and_polluted_gives_single_critical() {
    let metrics = RoadMetrics::new("ring", 60, 85, 100, 85.0);
    let already_closed = closed_gate();
    let result = evaluate(&metrics, &ThresholdConfig::default(), &already_closed).unwrap();

    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].severity, Severity::Critical);
}

#[test]
fn sample_roads_through_monitor() {
    let mut monitor = RoadMonitor::new();
    let mut feed = NotificationFeed::new();
    let config = MonitorConfig::default();

    let outcomes = monitor.process_batch(&sample_readings(0), &config);
    for outcome in &outcomes {
        if let MonitorOutcome::Evaluated(report) = outcome {
            feed.extend(report.events.iter().cloned());
        }
    }

    // nasr and ring close their gates; both are heavy and polluted.
    let counts = feed.count_by_severity();
    assert_eq!(counts.success, 2);
    assert_eq!(counts.critical, 2);
    assert_eq!(counts.warning, 0);
    assert_eq!(feed.unread_count(), 4);

    let summary = DashboardSummary::from_monitor(&monitor);
    assert_eq!(summary.closed_gates, 2);

    // Same readings one interval later: gates hold, only threshold notices repeat.
    let repeat = monitor.process_batch(&sample_readings(15), &config);
    let repeated: Vec<Severity> = repeat
        .iter()
        .filter_map(MonitorOutcome::report)
        .flat_map(|r| r.events.iter().map(|e| e.severity))
        .collect();
    assert_eq!(repeated, vec![Severity::Critical, Severity::Critical]);
}
