use road_gate_monitor::config::{config_path, MonitorConfig};
use road_gate_monitor::monitoring::{EventLog, NotificationFeed};
use std::error::Error;
use std::io::{stdin, stdout, Write};

fn prompt(message: &str) -> String {
    print!("{}", message);
    let _ = stdout().flush();
    let mut input = String::new();
    if stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}

// Empty input keeps the current value.
fn prompt_f64(message: &str, current: f64) -> f64 {
    let input = prompt(&format!("{} [{}]: ", message, current));
    input.parse().unwrap_or(current)
}

fn prompt_u64(message: &str, current: u64) -> u64 {
    let input = prompt(&format!("{} [{}]: ", message, current));
    input.parse().unwrap_or(current)
}

fn prompt_bool(message: &str, current: bool) -> bool {
    let input = prompt(&format!("{} (y/n) [{}]: ", message, if current { "y" } else { "n" }));
    match input.as_str() {
        "y" | "Y" => true,
        "n" | "N" => false,
        _ => current,
    }
}

fn show_notifications(log: &EventLog) -> Result<(), Box<dyn Error>> {
    let mut feed = NotificationFeed::new();
    feed.extend(log.read_notifications()?);
    if feed.is_empty() {
        println!("No notifications recorded.");
        return Ok(());
    }
    println!("Latest notifications:");
    for entry in feed.recent(20) {
        let event = &entry.event;
        println!(
            "#{} [{:?}] {} @ {}: {}",
            entry.id, event.severity, event.road_id, event.timestamp, event.reason
        );
    }
    Ok(())
}

fn show_gate_commands(log: &EventLog) -> Result<(), Box<dyn Error>> {
    let commands = log.read_gate_commands()?;
    println!("Gate Commands:");
    for command in &commands {
        println!("{} -> {} at {}", command.road_id, command.status, command.issued_at);
    }
    println!("Total: {}", commands.len());
    Ok(())
}

fn generate_report_summary(log: &EventLog) -> Result<(), Box<dyn Error>> {
    let events = log.read_notifications()?;
    // Sized to the whole log so the counts cover every record.
    let mut feed = NotificationFeed::with_capacity(events.len());
    feed.extend(events);
    let counts = feed.count_by_severity();
    println!("Report Summary:");
    println!("Notifications: {} records", log.count_notifications()?);
    println!(
        "  critical: {}, warning: {}, success: {}, info: {}",
        counts.critical, counts.warning, counts.success, counts.info
    );
    println!("Gate Commands: {} records", log.count_gate_commands()?);
    Ok(())
}

fn edit_thresholds(path: &str) -> Result<(), Box<dyn Error>> {
    let mut config = MonitorConfig::load_if_exists(path)?;

    let t = &mut config.thresholds;
    t.gate_close_occupancy_pct = prompt_f64("Gate close occupancy % (50-100)", t.gate_close_occupancy_pct);
    t.gate_open_occupancy_pct = prompt_f64("Gate open occupancy % (20-60)", t.gate_open_occupancy_pct);
    t.pollution_warning_pct = prompt_f64("Pollution warning % (50-100)", t.pollution_warning_pct);
    t.update_interval_seconds = prompt_u64("Update interval seconds (5-60)", t.update_interval_seconds);

    let a = &mut config.automation;
    a.auto_notifications = prompt_bool("Automatic notifications", a.auto_notifications);
    a.auto_gate_control = prompt_bool("Automatic gate control", a.auto_gate_control);
    a.notification_sound = prompt_bool("Notification sound", a.notification_sound);

    config.save(path)?;
    println!("Settings saved to {}", path);
    Ok(())
}

fn main() {
    env_logger::init();
    let config_path = config_path();
    let log = EventLog::new(".");

    loop {
        println!("\nRoad Monitor Admin CLI");
        println!("1. Display Notifications");
        println!("2. Display Gate Commands");
        println!("3. Generate Report Summary");
        println!("4. Edit Thresholds and Automation");
        println!("5. Exit");
        let choice = prompt("Enter your choice: ").parse::<u32>().unwrap_or(0);
        match choice {
            1 => {
                if let Err(e) = show_notifications(&log) {
                    eprintln!("Error displaying notifications: {}", e);
                }
            }
            2 => {
                if let Err(e) = show_gate_commands(&log) {
                    eprintln!("Error displaying gate commands: {}", e);
                }
            }
            3 => {
                if let Err(e) = generate_report_summary(&log) {
                    eprintln!("Error generating report summary: {}", e);
                }
            }
            4 => {
                if let Err(e) = edit_thresholds(&config_path) {
                    eprintln!("Settings not saved: {}", e);
                }
            }
            5 => {
                println!("Exiting CLI.");
                break;
            }
            _ => {
                println!("Invalid choice. Try again.");
            }
        }
    }
}
