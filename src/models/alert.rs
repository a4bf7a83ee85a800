use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vitals::VitalsSample;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AlertType {
    Fall,
    HeartRate,
    #[serde(rename = "spO2")]
    SpO2,
    BloodPressure,
    Sound,
    /// Reserved; the simulator never emits it.
    Ecg,
    /// Reserved; the simulator never emits it.
    AirQuality,
}

impl AlertType {
    /// Kinds the simulation loop picks from, in selection order.
    pub const SIMULATED: [AlertType; 4] = [
        AlertType::Fall,
        AlertType::HeartRate,
        AlertType::SpO2,
        AlertType::BloodPressure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Fall => "fall",
            AlertType::HeartRate => "heartRate",
            AlertType::SpO2 => "spO2",
            AlertType::BloodPressure => "bloodPressure",
            AlertType::Sound => "sound",
            AlertType::Ecg => "ecg",
            AlertType::AirQuality => "airQuality",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AlertType::Fall => "Fall detected!",
            AlertType::HeartRate => "Abnormal heart rate detected",
            AlertType::SpO2 => "Low blood oxygen level",
            AlertType::BloodPressure => "High blood pressure detected",
            AlertType::Sound => "Unusual sound detected",
            AlertType::Ecg => "Irregular ECG pattern",
            AlertType::AirQuality => "Poor air quality",
        }
    }
}

/// Millisecond timestamp id. Strictly increasing within a process.
pub type AlertId = u64;

static LAST_ALERT_ID: AtomicU64 = AtomicU64::new(0);

pub fn next_alert_id(now: DateTime<Utc>) -> AlertId {
    let candidate = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let mut last = LAST_ALERT_ID.load(Ordering::Relaxed);
    loop {
        let next = candidate.max(last + 1);
        match LAST_ALERT_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(observed) => last = observed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub vitals: VitalsSample,
}

impl Alert {
    pub fn new(alert_type: AlertType, vitals: VitalsSample) -> Self {
        let timestamp = Utc::now();
        Self {
            id: next_alert_id(timestamp),
            alert_type,
            message: alert_type.message().to_string(),
            timestamp,
            vitals,
        }
    }
}
