pub mod config_store;
pub mod threshold_config;

pub use config_store::{watch_config_file, ConfigStore};
pub use threshold_config::{config_path, AutomationSettings, MonitorConfig, ThresholdConfig};
