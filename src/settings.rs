use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::alerts::DEFAULT_ALERT_LOG_CAPACITY;
use crate::auth::CredentialPolicy;
use crate::models::Location;
use crate::simulation::controller::{DEFAULT_ALERT_PROBABILITY, DEFAULT_TICK_INTERVAL};
use crate::simulation::SimulationConfig;

const DEBUG_TICK_INTERVAL_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub tick_interval_ms: u64,
    pub alert_probability: f64,
    pub alert_log_capacity: usize,
    pub reference_location: Location,
    pub require_credentials: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            alert_probability: DEFAULT_ALERT_PROBABILITY,
            alert_log_capacity: DEFAULT_ALERT_LOG_CAPACITY,
            reference_location: Location::default(),
            require_credentials: false,
        }
    }
}

impl MonitorSettings {
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            alert_probability: self.alert_probability.clamp(0.0, 1.0),
            alert_log_capacity: self.clamped_alert_log_capacity(),
            reference_location: self.reference_location,
        }
    }

    /// Keeps the log within `1..=DEFAULT_ALERT_LOG_CAPACITY`.
    fn clamped_alert_log_capacity(&self) -> usize {
        let capacity = self
            .alert_log_capacity
            .clamp(1, DEFAULT_ALERT_LOG_CAPACITY);
        if capacity != self.alert_log_capacity {
            warn!(
                "alert_log_capacity {} out of range, using {capacity}",
                self.alert_log_capacity
            );
        }
        capacity
    }

    pub fn credential_policy(&self) -> CredentialPolicy {
        if self.require_credentials {
            CredentialPolicy::RequireNonEmpty
        } else {
            CredentialPolicy::AcceptAny
        }
    }

    /// `VITALWATCH_DEBUG=1|true` shortens the tick for local debugging.
    pub fn apply_env_overrides(mut self) -> Self {
        let debug_mode = std::env::var("VITALWATCH_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            self.tick_interval_ms = DEBUG_TICK_INTERVAL_MS;
        }
        self
    }
}

/// JSON-backed settings. Unreadable or malformed files fall back to defaults.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<MonitorSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring malformed settings at {}: {err}", path.display());
                MonitorSettings::default()
            })
        } else {
            MonitorSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> MonitorSettings {
        self.read_guard().clone()
    }

    pub fn update(&self, settings: MonitorSettings) -> Result<()> {
        let mut guard = self.write_guard();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: MonitorSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings at {}", self.path.display()))?;
        *self.write_guard() = data;
        Ok(())
    }

    fn persist(&self, data: &MonitorSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, MonitorSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, MonitorSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
