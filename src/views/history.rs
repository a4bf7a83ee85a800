//! Synthetic 24-hour history and summary statistics for the history charts.

use serde::Serialize;

use crate::simulation::random::{unit, RandomSource};

pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    HeartRate,
    #[serde(rename = "spO2")]
    SpO2,
    BloodPressure,
    Temperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    pub label: &'static str,
    pub unit: &'static str,
    pub color: &'static str,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::HeartRate,
        Metric::SpO2,
        Metric::BloodPressure,
        Metric::Temperature,
    ];

    pub fn descriptor(&self) -> MetricDescriptor {
        match self {
            Metric::HeartRate => MetricDescriptor {
                label: "Heart Rate",
                unit: "bpm",
                color: "rgb(239, 68, 68)",
            },
            Metric::SpO2 => MetricDescriptor {
                label: "SpO₂",
                unit: "%",
                color: "rgb(16, 185, 129)",
            },
            Metric::BloodPressure => MetricDescriptor {
                label: "Blood Pressure",
                unit: "mmHg",
                color: "rgb(59, 130, 246)",
            },
            Metric::Temperature => MetricDescriptor {
                label: "Temperature",
                unit: "°C",
                color: "rgb(245, 158, 11)",
            },
        }
    }

    /// Average above which the trend reads "up".
    fn trend_baseline(&self) -> f64 {
        match self {
            Metric::HeartRate => 75.0,
            Metric::SpO2 => 97.0,
            Metric::BloodPressure => 125.0,
            Metric::Temperature => 36.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub time: String,
    pub heart_rate: f64,
    #[serde(rename = "spO2")]
    pub sp_o2: f64,
    pub systolic: f64,
    pub diastolic: f64,
    pub temperature: f64,
}

impl HistoryPoint {
    /// Blood pressure charts plot the systolic value.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::HeartRate => self.heart_rate,
            Metric::SpO2 => self.sp_o2,
            Metric::BloodPressure => self.systolic,
            Metric::Temperature => self.temperature,
        }
    }
}

fn jitter(rng: &mut dyn RandomSource, base: f64, half_width: f64, min: f64, max: f64) -> f64 {
    (base + unit(rng) * half_width * 2.0 - half_width).clamp(min, max)
}

/// One point per hour, `"0:00"` through `"23:00"`.
pub fn generate_daily(rng: &mut dyn RandomSource) -> Vec<HistoryPoint> {
    (0..HOURS_PER_DAY)
        .map(|hour| HistoryPoint {
            time: format!("{hour}:00"),
            heart_rate: jitter(rng, 72.0, 10.0, 50.0, 120.0),
            sp_o2: jitter(rng, 98.0, 2.0, 85.0, 100.0),
            systolic: jitter(rng, 120.0, 10.0, 90.0, 180.0),
            diastolic: jitter(rng, 80.0, 5.0, 60.0, 100.0),
            temperature: jitter(rng, 36.6, 0.5, 35.0, 39.0),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryTrend {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub trend: HistoryTrend,
}

/// `None` for an empty series.
pub fn stats(points: &[HistoryPoint], metric: Metric) -> Option<MetricStats> {
    if points.is_empty() {
        return None;
    }

    let values: Vec<f64> = points.iter().map(|point| point.value(metric)).collect();
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let trend = if avg > metric.trend_baseline() {
        HistoryTrend::Up
    } else {
        HistoryTrend::Down
    };

    Some(MetricStats {
        avg: (avg * 10.0).round() / 10.0,
        min,
        max,
        trend,
    })
}
