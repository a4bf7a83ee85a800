//! Device status panel derived from the latest sample.

use serde::Serialize;

use crate::models::VitalsSample;

const NO_READING: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorStatus {
    Online,
    Offline,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReport {
    pub id: &'static str,
    pub name: &'static str,
    pub status: SensorStatus,
    pub last_reading: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

pub fn signal_strength(strength: u8) -> SignalQuality {
    match strength {
        80..=u8::MAX => SignalQuality::Excellent,
        60..=79 => SignalQuality::Good,
        40..=59 => SignalQuality::Fair,
        _ => SignalQuality::Poor,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionLink {
    pub name: &'static str,
    pub strength: u8,
    pub quality: SignalQuality,
}

/// Radio links reported by the wearable. Static until a real device exists.
pub fn connection_links() -> Vec<ConnectionLink> {
    [("wifi", 95), ("cellular", 85), ("bluetooth", 90)]
        .into_iter()
        .map(|(name, strength)| ConnectionLink {
            name,
            strength,
            quality: signal_strength(strength),
        })
        .collect()
}

fn reading_or_placeholder<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
    value.map(render).unwrap_or_else(|| NO_READING.to_string())
}

fn flag_sensor(
    id: &'static str,
    name: &'static str,
    raised: bool,
    alert_text: &str,
) -> SensorReport {
    SensorReport {
        id,
        name,
        status: if raised {
            SensorStatus::Alert
        } else {
            SensorStatus::Online
        },
        last_reading: if raised { alert_text } else { "Normal" }.to_string(),
    }
}

fn online(id: &'static str, name: &'static str, last_reading: String) -> SensorReport {
    SensorReport {
        id,
        name,
        status: SensorStatus::Online,
        last_reading,
    }
}

/// The ten sensor rows. Zero readings render as `--`, like missing ones.
pub fn sensor_reports(sample: Option<&VitalsSample>) -> Vec<SensorReport> {
    let nonzero = |value: u32| (value != 0).then_some(value);

    let heart_rate = sample.and_then(|s| nonzero(s.heart_rate));
    let sp_o2 = sample.and_then(|s| nonzero(s.sp_o2));
    let stress = sample.and_then(|s| nonzero(s.stress_level));
    let blood_pressure = sample.map(|s| s.blood_pressure.clone());
    let temperature = sample.map(|s| s.temperature.clone());
    let air_quality = sample.map(|s| s.air_quality);
    let fall = sample.map(|s| s.fall_detected).unwrap_or(false);
    let sound = sample.map(|s| s.sound_alert).unwrap_or(false);

    vec![
        online(
            "heart-rate",
            "Heart Rate Sensor",
            reading_or_placeholder(heart_rate, |v| format!("{v} bpm")),
        ),
        online(
            "spO2",
            "Blood Oxygen Sensor",
            reading_or_placeholder(sp_o2, |v| format!("{v}%")),
        ),
        online(
            "blood-pressure",
            "Blood Pressure Monitor",
            reading_or_placeholder(blood_pressure, |v| v),
        ),
        online("ecg", "ECG Sensor", "Live waveform".to_string()),
        online(
            "temperature",
            "Temperature Sensor",
            reading_or_placeholder(temperature, |v| format!("{v}°C")),
        ),
        flag_sensor("fall-detection", "Fall Detection", fall, "Fall detected"),
        flag_sensor("sound-sensor", "Sound Detection", sound, "Sound alert"),
        online(
            "air-quality",
            "Air Quality Sensor",
            reading_or_placeholder(air_quality, |v| v.to_string()),
        ),
        online("gps", "GPS Location", "Live tracking".to_string()),
        online(
            "gsr",
            "Stress Level (GSR)",
            reading_or_placeholder(stress, |v| format!("{v} GSR")),
        ),
    ]
}
