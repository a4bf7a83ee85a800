// Display metadata for alert kinds.

use serde::{Deserialize, Serialize};

use crate::models::{Alert, AlertType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Danger,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Danger => "danger",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
        }
    }
}

/// Icon category a renderer maps onto its own icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertIcon {
    WarningTriangle,
    Activity,
    Speaker,
    Bell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMeta {
    pub icon: AlertIcon,
    pub severity: Severity,
    pub title: &'static str,
    pub priority: Priority,
}

const SYSTEM_ALERT: AlertMeta = AlertMeta {
    icon: AlertIcon::Bell,
    severity: Severity::Warning,
    title: "System Alert",
    priority: Priority::Medium,
};

/// Pure lookup. Kinds without a dedicated row get the "System Alert" fallback.
pub fn classify(alert_type: AlertType) -> AlertMeta {
    match alert_type {
        AlertType::Fall => AlertMeta {
            icon: AlertIcon::WarningTriangle,
            severity: Severity::Danger,
            title: "Fall Detected",
            priority: Priority::High,
        },
        AlertType::HeartRate => AlertMeta {
            icon: AlertIcon::Activity,
            severity: Severity::Danger,
            title: "Abnormal Heart Rate",
            priority: Priority::High,
        },
        AlertType::SpO2 => AlertMeta {
            icon: AlertIcon::Activity,
            severity: Severity::Danger,
            title: "Low Blood Oxygen",
            priority: Priority::High,
        },
        AlertType::BloodPressure => AlertMeta {
            icon: AlertIcon::Activity,
            severity: Severity::Warning,
            title: "Blood Pressure Alert",
            priority: Priority::Medium,
        },
        AlertType::Sound => AlertMeta {
            icon: AlertIcon::Speaker,
            severity: Severity::Warning,
            title: "Unusual Sound Detected",
            priority: Priority::Medium,
        },
        AlertType::Ecg | AlertType::AirQuality => SYSTEM_ALERT,
    }
}

/// Counts shown above the alert list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertSummary {
    pub critical: usize,
    pub warning: usize,
    pub total: usize,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        alerts
            .iter()
            .fold(Self::default(), |mut summary, alert| {
                match classify(alert.alert_type).severity {
                    Severity::Danger => summary.critical += 1,
                    Severity::Warning => summary.warning += 1,
                }
                summary.total += 1;
                summary
            })
    }
}

/// Drives the dashboard's critical indicator.
pub fn has_critical_alerts(alerts: &[Alert]) -> bool {
    alerts.iter().any(|alert| {
        matches!(
            alert.alert_type,
            AlertType::Fall | AlertType::HeartRate | AlertType::SpO2
        )
    })
}
