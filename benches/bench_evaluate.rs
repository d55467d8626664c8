// benches/bench_evaluate.rs
use criterion::{black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration};
use road_gate_monitor::config::ThresholdConfig;
use road_gate_monitor::evaluator::evaluate;
use road_gate_monitor::shared_data::{GateState, GateStatus, RoadMetrics};
use std::time::Duration;

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    let thresholds = ThresholdConfig::default();
    let open = GateState::initial(0);
    let closed = GateState {
        status: GateStatus::Closed,
        last_transition_at: 0,
    };

    // Quiet road, no events.
    let clear = RoadMetrics::new("salah-salem", 15, 35, 120, 35.0);
    group.bench_function("clear_no_events", |b| {
        b.iter(|| evaluate(black_box(&clear), &thresholds, black_box(&open)))
    });

    // Gate closes and a critical notice is raised.
    let critical = RoadMetrics::new("ring", 15, 120, 150, 85.0);
    group.bench_function("close_and_critical", |b| {
        b.iter(|| evaluate(black_box(&critical), &thresholds, black_box(&open)))
    });

    // Inside the hysteresis band with the gate closed.
    let held = RoadMetrics::new("nasr", 15, 65, 100, 40.0);
    group.bench_function("held_in_band", |b| {
        b.iter(|| evaluate(black_box(&held), &thresholds, black_box(&closed)))
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
