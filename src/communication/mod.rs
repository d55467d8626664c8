pub mod event_publisher;

pub use event_publisher::{
    decode_metrics_batch, listen_road_metrics, publish_metrics, publish_outcomes,
};
