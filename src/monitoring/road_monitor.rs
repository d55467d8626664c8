use crate::config::{ConfigStore, MonitorConfig};
use crate::error::MonitorError;
use crate::evaluator::{evaluate, RoadReading};
use crate::shared_data::{
    GateCommand, GateState, NotificationEvent, RoadMetrics, RoadStatus, Severity,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: u64,
    pub vehicle_count: i64,
    pub occupancy_pct: f64,
    pub pollution_level: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Same,
}

/// Bounded window of the most recent readings for one road.
#[derive(Debug, Clone)]
pub struct RoadHistory {
    pub capacity: usize,
    records: VecDeque<HistoryRecord>,
}

impl RoadHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: HistoryRecord) {
        while self.records.len() >= self.capacity.max(1) {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    // Capacity can shrink when the config is edited; drop the oldest records to fit.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.records.len() > capacity.max(1) {
            self.records.pop_front();
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Direction of the vehicle count between the last two readings.
    pub fn trend(&self) -> Trend {
        let n = self.records.len();
        if n < 2 {
            return Trend::Same;
        }
        let latest = self.records[n - 1].vehicle_count;
        let previous = self.records[n - 2].vehicle_count;
        if latest > previous {
            Trend::Up
        } else if latest < previous {
            Trend::Down
        } else {
            Trend::Same
        }
    }

    pub fn average_occupancy(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.records.iter().map(|r| r.occupancy_pct).sum();
        sum / self.records.len() as f64
    }

    pub fn average_pollution(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.records.iter().map(|r| r.pollution_level).sum();
        sum / self.records.len() as f64
    }
}

/// Everything the monitor keeps for one road between evaluations.
#[derive(Debug, Clone)]
pub struct RoadState {
    pub gate: GateState,
    pub last_status: RoadStatus,
    pub last_occupancy_pct: f64,
    pub last_evaluated_at: u64,
    pub history: RoadHistory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadReport {
    pub road_id: String,
    pub reading: RoadReading,
    pub gate: GateState,
    pub gate_changed: bool,
    pub events: Vec<NotificationEvent>,
}

impl RoadReport {
    /// Command for the gate side, only when the gate actually moved.
    pub fn gate_command(&self) -> Option<GateCommand> {
        self.gate_changed
            .then(|| GateCommand::from_state(&self.road_id, &self.gate))
    }
}

#[derive(Debug)]
pub enum MonitorOutcome {
    Evaluated(RoadReport),
    /// Reading arrived before the update interval elapsed; state untouched.
    Throttled { road_id: String, timestamp: u64 },
    /// Reading failed validation; state untouched.
    Rejected { road_id: String, error: MonitorError },
}

impl MonitorOutcome {
    pub fn report(&self) -> Option<&RoadReport> {
        match self {
            MonitorOutcome::Evaluated(report) => Some(report),
            _ => None,
        }
    }
}

/// Per-road state records keyed by road id. One writer at a time per road.
#[derive(Debug, Default)]
pub struct RoadMonitor {
    roads: HashMap<String, RoadState>,
}

pub type SharedMonitor = Arc<Mutex<RoadMonitor>>;

impl RoadMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedMonitor {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn road(&self, road_id: &str) -> Option<&RoadState> {
        self.roads.get(road_id)
    }

    pub fn roads(&self) -> impl Iterator<Item = (&String, &RoadState)> {
        self.roads.iter()
    }

    pub fn tracked_roads(&self) -> usize {
        self.roads.len()
    }

    pub fn process(&mut self, metrics: &RoadMetrics, config: &MonitorConfig) -> MonitorOutcome {
        let thresholds = &config.thresholds;
        let existing = self.roads.get(&metrics.road_id);

        if let Some(state) = existing {
            let next_due = state
                .last_evaluated_at
                .saturating_add(thresholds.update_interval_seconds);
            if metrics.timestamp < next_due {
                log::debug!(
                    "Road {}: reading at {} throttled until {}",
                    metrics.road_id,
                    metrics.timestamp,
                    next_due
                );
                return MonitorOutcome::Throttled {
                    road_id: metrics.road_id.clone(),
                    timestamp: metrics.timestamp,
                };
            }
        }

        let prior_gate = existing
            .map(|s| s.gate)
            .unwrap_or_else(|| GateState::initial(metrics.timestamp));
        let prior_status = existing.map(|s| s.last_status);

        let evaluation = match evaluate(metrics, thresholds, &prior_gate) {
            Ok(evaluation) => evaluation,
            Err(error) => {
                log::warn!("Rejected reading: {}", error);
                return MonitorOutcome::Rejected {
                    road_id: metrics.road_id.clone(),
                    error,
                };
            }
        };

        let mut gate = evaluation.gate;
        let mut gate_changed = evaluation.gate_changed;
        let mut events = evaluation.events;

        if gate_changed && !config.automation.auto_gate_control {
            // Manual mode: keep the gate where it is and drop the transition notice.
            gate = prior_gate;
            gate_changed = false;
            events.remove(0);
        }

        if config.automation.auto_notifications {
            if let Some(event) = recovery_event(metrics, prior_status, evaluation.reading.status) {
                events.push(event);
            }
        } else {
            events.truncate(usize::from(gate_changed));
        }

        if gate_changed {
            log::info!(
                "Road {}: gate {} at {} (occupancy {:.1}%)",
                metrics.road_id,
                gate.status,
                gate.last_transition_at,
                evaluation.reading.occupancy_pct
            );
        }

        let state = self
            .roads
            .entry(metrics.road_id.clone())
            .or_insert_with(|| RoadState {
                gate,
                last_status: evaluation.reading.status,
                last_occupancy_pct: evaluation.reading.occupancy_pct,
                last_evaluated_at: metrics.timestamp,
                history: RoadHistory::new(config.history_capacity),
            });
        state.gate = gate;
        state.last_status = evaluation.reading.status;
        state.last_occupancy_pct = evaluation.reading.occupancy_pct;
        state.last_evaluated_at = metrics.timestamp;
        if state.history.capacity != config.history_capacity {
            state.history.resize(config.history_capacity);
        }
        state.history.push(HistoryRecord {
            timestamp: metrics.timestamp,
            vehicle_count: metrics.vehicle_count,
            occupancy_pct: evaluation.reading.occupancy_pct,
            pollution_level: metrics.pollution_level,
        });

        MonitorOutcome::Evaluated(RoadReport {
            road_id: metrics.road_id.clone(),
            reading: evaluation.reading,
            gate,
            gate_changed,
            events,
        })
    }

    // Roads are independent, so a batch is just each reading in arrival order.
    pub fn process_batch(
        &mut self,
        batch: &[RoadMetrics],
        config: &MonitorConfig,
    ) -> Vec<MonitorOutcome> {
        batch.iter().map(|m| self.process(m, config)).collect()
    }
}

// A road that was congested or heavy last time and is clear now.
fn recovery_event(
    metrics: &RoadMetrics,
    prior_status: Option<RoadStatus>,
    status: RoadStatus,
) -> Option<NotificationEvent> {
    match prior_status {
        Some(prior) if prior != RoadStatus::Clear && status == RoadStatus::Clear => {
            Some(NotificationEvent::new(
                &metrics.road_id,
                Severity::Info,
                format!(
                    "Traffic recovered from {}: {}/{} vehicles",
                    prior, metrics.vehicle_count, metrics.capacity
                ),
                metrics.timestamp,
            ))
        }
        _ => None,
    }
}

/// Evaluates every batch received on `metrics_rx` and forwards the outcomes.
///
/// Each batch reads one config snapshot, and batches are processed one at a
/// time, so config edits only take effect between batches.
pub async fn run_monitor_loop(
    monitor: SharedMonitor,
    store: ConfigStore,
    mut metrics_rx: mpsc::Receiver<Vec<RoadMetrics>>,
    outcome_tx: mpsc::Sender<Vec<MonitorOutcome>>,
) {
    while let Some(batch) = metrics_rx.recv().await {
        let config = store.snapshot();
        let outcomes = {
            let mut monitor = monitor.lock().unwrap_or_else(PoisonError::into_inner);
            monitor.process_batch(&batch, &config)
        };
        if outcome_tx.send(outcomes).await.is_err() {
            log::warn!("Outcome receiver dropped, stopping monitor loop");
            return;
        }
    }
    log::info!("Metrics channel closed, monitor loop stopping");
}
