use super::road_monitor::MonitorOutcome;
use crate::error::Result;
use crate::global_variables::{GATE_COMMANDS_CSV, NOTIFICATIONS_CSV};
use crate::shared_data::{GateCommand, NotificationEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// CSV files holding every emitted notification and gate command.
#[derive(Debug, Clone)]
pub struct EventLog {
    dir: PathBuf,
}

impl EventLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn notifications_path(&self) -> PathBuf {
        self.dir.join(NOTIFICATIONS_CSV)
    }

    pub fn gate_commands_path(&self) -> PathBuf {
        self.dir.join(GATE_COMMANDS_CSV)
    }

    pub fn log_notification(&self, event: &NotificationEvent) -> Result<()> {
        log_to_csv(&self.notifications_path(), event)
    }

    pub fn log_gate_command(&self, command: &GateCommand) -> Result<()> {
        log_to_csv(&self.gate_commands_path(), command)
    }

    // Appends the events and gate commands of every evaluated outcome.
    pub fn record_outcomes(&self, outcomes: &[MonitorOutcome]) -> Result<()> {
        for report in outcomes.iter().filter_map(MonitorOutcome::report) {
            if let Some(command) = report.gate_command() {
                self.log_gate_command(&command)?;
            }
            for event in &report.events {
                self.log_notification(event)?;
            }
        }
        Ok(())
    }

    pub fn read_notifications(&self) -> Result<Vec<NotificationEvent>> {
        read_csv(&self.notifications_path())
    }

    pub fn read_gate_commands(&self) -> Result<Vec<GateCommand>> {
        read_csv(&self.gate_commands_path())
    }

    pub fn count_notifications(&self) -> Result<usize> {
        count_csv_records(&self.notifications_path())
    }

    pub fn count_gate_commands(&self) -> Result<usize> {
        count_csv_records(&self.gate_commands_path())
    }
}

// Appends one record, writing the header only when the file is new.
fn log_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut rdr = csv::Reader::from_reader(File::open(path)?);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

fn count_csv_records(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }
    let mut rdr = csv::Reader::from_reader(File::open(path)?);
    Ok(rdr.records().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::monitoring::road_monitor::RoadMonitor;
    use crate::shared_data::{GateStatus, RoadMetrics, Severity};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "road_gate_monitor_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_files_read_as_empty() {
        let log = EventLog::new(scratch_dir("empty"));
        assert!(log.read_notifications().unwrap().is_empty());
        assert_eq!(log.count_gate_commands().unwrap(), 0);
    }

    #[test]
    fn outcomes_are_appended_and_read_back() {
        let dir = scratch_dir("append");
        let log = EventLog::new(&dir);
        let mut monitor = RoadMonitor::new();
        let config = MonitorConfig::default();

        let outcomes = monitor.process_batch(
            &[
                RoadMetrics::new("ring", 0, 120, 150, 85.0),
                RoadMetrics::new("army", 0, 45, 100, 42.0),
            ],
            &config,
        );
        log.record_outcomes(&outcomes).unwrap();

        let later = monitor.process_batch(&[RoadMetrics::new("ring", 15, 30, 150, 20.0)], &config);
        log.record_outcomes(&later).unwrap();

        let commands = log.read_gate_commands().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].status, GateStatus::Closed);
        assert_eq!(commands[1].status, GateStatus::Open);
        assert_eq!(commands[1].issued_at, 15);

        let events = log.read_notifications().unwrap();
        let severities: Vec<Severity> = events.iter().map(|e| e.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Success,
                Severity::Critical,
                Severity::Success,
                Severity::Info
            ]
        );
        assert_eq!(log.count_notifications().unwrap(), 4);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
