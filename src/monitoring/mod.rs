pub mod dashboard;
pub mod event_log;
pub mod notification_feed;
pub mod road_monitor;

pub use dashboard::DashboardSummary;
pub use event_log::EventLog;
pub use notification_feed::{FeedEntry, NotificationFeed, SeverityCounts};
pub use road_monitor::{
    run_monitor_loop, MonitorOutcome, RoadHistory, RoadMonitor, RoadReport, RoadState,
    SharedMonitor, Trend,
};
