// Alert handling for the simulated monitor.
//
// - classifier.rs: display metadata per alert kind, plus page-level counts
// - alert_log.rs: bounded newest-first log with dismissal by id

pub mod classifier;
pub mod alert_log;

pub use classifier::{classify, has_critical_alerts, AlertIcon, AlertMeta, AlertSummary, Priority, Severity};
pub use alert_log::{AlertLog, DEFAULT_ALERT_LOG_CAPACITY};
