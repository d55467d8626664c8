// Publishes drifting sample readings so the monitor can run without hardware.

use road_gate_monitor::communication::publish_metrics;
use road_gate_monitor::config::{config_path, MonitorConfig};
use road_gate_monitor::sample_roads::jittered_readings;
use road_gate_monitor::shared_data::current_timestamp;
use std::{thread, time::Duration};

const MAX_DRIFT: i64 = 10;

fn main() {
    env_logger::init();

    let config = match MonitorConfig::load_if_exists(config_path()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Sensor feed config error: {}", e);
            std::process::exit(1);
        }
    };
    let period = Duration::from_secs(config.thresholds.update_interval_seconds);
    let once = std::env::args().any(|arg| arg == "--once");

    println!("Starting sensor feed (every {:?})...", period);
    let mut rng = rand::rng();
    loop {
        let batch = jittered_readings(&mut rng, current_timestamp(), MAX_DRIFT);
        match publish_metrics(&batch) {
            Ok(()) => log::info!("Published {} readings", batch.len()),
            Err(e) => eprintln!("Sensor feed error: {}", e),
        }
        if once {
            break;
        }
        thread::sleep(period);
    }
}
