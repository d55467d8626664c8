//! Error types for road evaluation, configuration and broker I/O.

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Invalid reading for road {road_id}: {reason}")]
    InvalidInput { road_id: String, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Broker error: {0}")]
    Amqp(#[from] amiquip::Error),
}

impl MonitorError {
    pub fn invalid_input(road_id: &str, reason: impl Into<String>) -> Self {
        MonitorError::InvalidInput {
            road_id: road_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
