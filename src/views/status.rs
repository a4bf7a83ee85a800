//! Threshold colouring and trend arrows for the dashboard cards.

use serde::Serialize;

use crate::models::{AirQuality, BloodPressure, VitalsSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VitalStatus {
    Safe,
    Warning,
    Danger,
}

impl VitalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VitalStatus::Safe => "Normal",
            VitalStatus::Warning => "Warning",
            VitalStatus::Danger => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

pub const FALL_BANNER: &str =
    "FALL DETECTED! Immediate attention required. Patient may need assistance.";
pub const SOUND_BANNER: &str = "UNUSUAL SOUND DETECTED. Check on patient.";
pub const LOW_BATTERY_THRESHOLD: u32 = 20;

// A zero reading means "no data yet" and is shown as safe.

pub fn heart_rate_status(bpm: u32) -> VitalStatus {
    match bpm {
        0 => VitalStatus::Safe,
        v if v < 60 || v > 100 => VitalStatus::Danger,
        v if v < 70 || v > 90 => VitalStatus::Warning,
        _ => VitalStatus::Safe,
    }
}

pub fn sp_o2_status(percent: u32) -> VitalStatus {
    match percent {
        0 => VitalStatus::Safe,
        v if v < 90 => VitalStatus::Danger,
        v if v < 95 => VitalStatus::Warning,
        _ => VitalStatus::Safe,
    }
}

pub fn blood_pressure_status(bp: BloodPressure) -> VitalStatus {
    if bp.systolic > 140 || bp.diastolic > 90 {
        VitalStatus::Danger
    } else if bp.systolic > 130 || bp.diastolic > 85 {
        VitalStatus::Warning
    } else {
        VitalStatus::Safe
    }
}

pub fn temperature_status(celsius: f64) -> VitalStatus {
    if celsius > 38.0 {
        VitalStatus::Danger
    } else if celsius > 37.5 {
        VitalStatus::Warning
    } else {
        VitalStatus::Safe
    }
}

pub fn stress_status(level: u32) -> VitalStatus {
    match level {
        v if v > 70 => VitalStatus::Danger,
        v if v > 50 => VitalStatus::Warning,
        _ => VitalStatus::Safe,
    }
}

pub fn air_quality_status(quality: AirQuality) -> VitalStatus {
    match quality {
        AirQuality::Poor => VitalStatus::Danger,
        AirQuality::Moderate => VitalStatus::Warning,
        AirQuality::Good => VitalStatus::Safe,
    }
}

pub fn heart_rate_trend(bpm: u32) -> Trend {
    if bpm > 80 {
        Trend::Up
    } else if bpm < 70 {
        Trend::Down
    } else {
        Trend::Stable
    }
}

pub fn blood_pressure_trend(bp: BloodPressure) -> Trend {
    if bp.systolic > 130 {
        Trend::Up
    } else {
        Trend::Stable
    }
}

pub fn stress_trend(level: u32) -> Trend {
    if level > 60 {
        Trend::Up
    } else {
        Trend::Stable
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalCard {
    pub title: &'static str,
    pub value: String,
    pub unit: Option<&'static str>,
    pub status: VitalStatus,
    pub trend: Trend,
}

/// The six dashboard cards for one sample, in display order.
pub fn vital_cards(sample: &VitalsSample) -> Vec<VitalCard> {
    let bp = sample.blood_pressure().ok();
    let temperature = sample.temperature_celsius().ok();

    vec![
        VitalCard {
            title: "Heart Rate",
            value: sample.heart_rate.to_string(),
            unit: Some("bpm"),
            status: heart_rate_status(sample.heart_rate),
            trend: heart_rate_trend(sample.heart_rate),
        },
        VitalCard {
            title: "SpO₂",
            value: sample.sp_o2.to_string(),
            unit: Some("%"),
            status: sp_o2_status(sample.sp_o2),
            trend: Trend::Stable,
        },
        VitalCard {
            title: "Blood Pressure",
            value: sample.blood_pressure.clone(),
            unit: Some("mmHg"),
            status: bp.map(blood_pressure_status).unwrap_or(VitalStatus::Safe),
            trend: bp.map(blood_pressure_trend).unwrap_or(Trend::Stable),
        },
        VitalCard {
            title: "Temperature",
            value: sample.temperature.clone(),
            unit: Some("°C"),
            status: temperature.map(temperature_status).unwrap_or(VitalStatus::Safe),
            trend: Trend::Stable,
        },
        VitalCard {
            title: "Stress Level",
            value: sample.stress_level.to_string(),
            unit: Some("GSR"),
            status: stress_status(sample.stress_level),
            trend: stress_trend(sample.stress_level),
        },
        VitalCard {
            title: "Air Quality",
            value: sample.air_quality.to_string(),
            unit: None,
            status: air_quality_status(sample.air_quality),
            trend: Trend::Stable,
        },
    ]
}

/// Emergency banners raised directly by the sample's flags.
pub fn banners(sample: &VitalsSample) -> Vec<&'static str> {
    let mut banners = Vec::new();
    if sample.fall_detected {
        banners.push(FALL_BANNER);
    }
    if sample.sound_alert {
        banners.push(SOUND_BANNER);
    }
    banners
}

pub fn is_battery_low(battery: u32) -> bool {
    battery < LOW_BATTERY_THRESHOLD
}
