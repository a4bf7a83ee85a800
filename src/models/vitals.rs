use std::{fmt, str::FromStr};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of ECG points carried by every sample.
pub const ECG_SAMPLE_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AirQuality {
    Good,
    Moderate,
    Poor,
}

impl AirQuality {
    pub const ALL: [AirQuality; 3] = [AirQuality::Good, AirQuality::Moderate, AirQuality::Poor];

    pub fn as_str(&self) -> &'static str {
        match self {
            AirQuality::Good => "Good",
            AirQuality::Moderate => "Moderate",
            AirQuality::Poor => "Poor",
        }
    }
}

impl fmt::Display for AirQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            lat: 40.7128,
            lng: -74.0060,
        }
    }
}

/// Structured view of the `"systolic/diastolic"` reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u32,
    pub diastolic: u32,
}

impl FromStr for BloodPressure {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (systolic, diastolic) = value
            .split_once('/')
            .ok_or_else(|| anyhow!("blood pressure '{value}' is missing '/'"))?;
        let systolic = systolic
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid systolic value in '{value}'"))?;
        let diastolic = diastolic
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid diastolic value in '{value}'"))?;
        Ok(Self {
            systolic,
            diastolic,
        })
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// One simulated snapshot of patient readings. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VitalsSample {
    pub heart_rate: u32,
    #[serde(rename = "spO2")]
    pub sp_o2: u32,
    pub blood_pressure: String,
    pub temperature: String,
    pub stress_level: u32,
    pub air_quality: AirQuality,
    pub fall_detected: bool,
    pub sound_alert: bool,
    pub ecg: Vec<f64>,
    pub location: Location,
    pub battery: u32,
    pub timestamp: DateTime<Utc>,
}

impl VitalsSample {
    pub fn blood_pressure(&self) -> Result<BloodPressure> {
        self.blood_pressure.parse()
    }

    pub fn temperature_celsius(&self) -> Result<f64> {
        self.temperature
            .parse::<f64>()
            .with_context(|| format!("invalid temperature '{}'", self.temperature))
    }
}
