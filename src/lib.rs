pub mod communication;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod global_variables;
pub mod monitoring;
pub mod sample_roads;
pub mod shared_data;

pub use config::{ConfigStore, MonitorConfig, ThresholdConfig};
pub use error::{MonitorError, Result};
pub use evaluator::{evaluate, Evaluation};
pub use shared_data::{
    GateState, GateStatus, NotificationEvent, RoadMetrics, RoadStatus, Severity,
};
