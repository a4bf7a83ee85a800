use serde::{Deserialize, Serialize};

use crate::alerts::AlertLog;
use crate::models::{Alert, VitalsSample};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LoopStatus {
    Stopped,
    Running,
}

impl Default for LoopStatus {
    fn default() -> Self {
        LoopStatus::Stopped
    }
}

/// Values published to every subscriber after each change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    pub current_vitals: Option<VitalsSample>,
    pub active_alerts: Vec<Alert>,
    pub is_connected: bool,
    pub ticks: u64,
}

#[derive(Debug, Clone)]
pub struct SimulationState {
    pub status: LoopStatus,
    pub current_vitals: Option<VitalsSample>,
    pub alerts: AlertLog,
    pub ticks: u64,
}

impl SimulationState {
    pub fn new(alert_log_capacity: usize) -> Self {
        Self {
            status: LoopStatus::Stopped,
            current_vitals: None,
            alerts: AlertLog::with_capacity(alert_log_capacity),
            ticks: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == LoopStatus::Running
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            current_vitals: self.current_vitals.clone(),
            active_alerts: self.alerts.list(),
            is_connected: self.is_connected(),
            ticks: self.ticks,
        }
    }

    /// Makes `sample` current and, if present, prepends `alert` to the log.
    pub fn record_tick(&mut self, sample: VitalsSample, alert: Option<Alert>) {
        if let Some(alert) = alert {
            self.alerts.add(alert);
        }
        self.current_vitals = Some(sample);
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn start(&mut self) {
        self.status = LoopStatus::Running;
    }

    pub fn stop(&mut self) {
        self.status = LoopStatus::Stopped;
    }
}
