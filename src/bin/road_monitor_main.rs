use road_gate_monitor::communication::{listen_road_metrics, publish_outcomes};
use road_gate_monitor::config::{config_path, watch_config_file, ConfigStore, MonitorConfig};
use road_gate_monitor::global_variables::{CONFIG_RELOAD_SECS, DEFAULT_FEED_CAPACITY};
use road_gate_monitor::monitoring::{
    run_monitor_loop, DashboardSummary, EventLog, MonitorOutcome, NotificationFeed, RoadMonitor,
};
use std::sync::{Arc, PoisonError};
use tokio::join;
use tokio::sync::mpsc;
use tokio::time::Duration;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config_path = config_path();
    let store = match MonitorConfig::load_if_exists(&config_path).and_then(ConfigStore::new) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Monitor config error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Starting road monitor...");
    let monitor = RoadMonitor::shared();
    let (metrics_tx, metrics_rx) = mpsc::channel(32);
    let (outcome_tx, mut outcome_rx) = mpsc::channel(32);

    let metrics_listener = tokio::spawn(async move {
        if let Err(e) = listen_road_metrics(metrics_tx).await {
            eprintln!("Error in road metrics listener: {}", e);
        }
    });

    let monitor_loop = tokio::spawn(run_monitor_loop(
        Arc::clone(&monitor),
        store.clone(),
        metrics_rx,
        outcome_tx,
    ));

    let sink_monitor = Arc::clone(&monitor);
    let outcome_sink = tokio::spawn(async move {
        let event_log = EventLog::new(".");
        let mut feed = NotificationFeed::with_capacity(DEFAULT_FEED_CAPACITY);
        while let Some(outcomes) = outcome_rx.recv().await {
            if let Err(e) = event_log.record_outcomes(&outcomes) {
                eprintln!("Error logging outcomes: {}", e);
            }
            for report in outcomes.iter().filter_map(MonitorOutcome::report) {
                feed.extend(report.events.iter().cloned());
            }

            match tokio::task::spawn_blocking(move || publish_outcomes(&outcomes)).await {
                Ok(Err(e)) => log::warn!("Could not publish outcomes: {}", e),
                Err(e) => log::error!("Publisher task failed: {}", e),
                Ok(Ok(())) => {}
            }

            let summary = {
                let monitor = sink_monitor.lock().unwrap_or_else(PoisonError::into_inner);
                DashboardSummary::from_monitor(&monitor)
            };
            let counts = feed.count_by_severity();
            log::info!(
                "{} roads | {} closed gates | avg occupancy {}% | {} unread ({} critical, {} warning)",
                summary.total_roads,
                summary.closed_gates,
                summary.average_occupancy_pct,
                feed.unread_count(),
                counts.critical,
                counts.warning
            );
        }
    });

    // Edits saved by the admin CLI are picked up until the pipeline shuts down.
    let services = async {
        let _ = join!(metrics_listener, monitor_loop, outcome_sink);
    };
    watch_config_file(
        store,
        &config_path,
        Duration::from_secs(CONFIG_RELOAD_SECS),
        services,
    )
    .await;
}
