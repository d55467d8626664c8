use super::MonitorConfig;
use crate::error::Result;
use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::time::{interval, Duration};

/// Shared handle to the active config.
///
/// Each batch of evaluations works from one `snapshot()`. `update` replaces the
/// whole config at once, so a batch never sees half of an edit.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    active: Arc<RwLock<Arc<MonitorConfig>>>,
}

impl ConfigStore {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            active: Arc::new(RwLock::new(Arc::new(config))),
        })
    }

    pub fn snapshot(&self) -> Arc<MonitorConfig> {
        let guard = self.active.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    // A rejected config leaves the active one in place.
    pub fn update(&self, config: MonitorConfig) -> Result<()> {
        config.validate()?;
        let mut guard = self.active.write().unwrap_or_else(PoisonError::into_inner);
        log::info!("Applying new thresholds: {:?}", config.thresholds);
        *guard = Arc::new(config);
        Ok(())
    }

    /// Applies the config file at `path` if it differs from the active one.
    ///
    /// Returns whether the active config changed. A missing file changes nothing.
    pub fn reload_from(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(false);
        }
        let config = MonitorConfig::from_json(&fs::read_to_string(path)?)?;
        if config == *self.snapshot() {
            return Ok(false);
        }
        self.update(config)?;
        Ok(true)
    }
}

/// Re-reads the config file every `period` until `shutdown` resolves.
pub async fn watch_config_file<F>(
    store: ConfigStore,
    path: impl AsRef<Path>,
    period: Duration,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    let path = path.as_ref();
    let mut ticker = interval(period);
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Config watcher for {} stopping", path.display());
                return;
            }
            _ = ticker.tick() => {
                if let Err(e) = store.reload_from(path) {
                    log::warn!("Could not reload config from {}: {}", path.display(), e);
                }
            }
        }
    }
}
