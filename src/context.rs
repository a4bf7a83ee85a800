use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::auth::SessionStore;
use crate::db::Database;
use crate::settings::SettingsStore;
use crate::simulation::{RandomSource, SimulationController, StdRandom, Subscription};

const SETTINGS_FILE: &str = "settings.json";
const DATABASE_FILE: &str = "vitalwatch.sqlite3";

/// Everything one running monitor owns: storage, settings, the restored
/// session and the simulation loop.
pub struct MonitorContext {
    data_dir: PathBuf,
    db: Database,
    settings: SettingsStore,
    sessions: SessionStore,
    simulation: SimulationController,
}

impl MonitorContext {
    pub async fn create(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_random(data_dir, Box::new(StdRandom::from_entropy())).await
    }

    pub async fn create_with_random(
        data_dir: impl AsRef<Path>,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
        let current = settings.get().apply_env_overrides();

        let db = Database::new(data_dir.join(DATABASE_FILE))?;
        let sessions = SessionStore::with_policy(db.clone(), current.credential_policy()).await;
        let simulation = SimulationController::with_random(current.simulation_config(), rng);

        info!("Monitor context ready at {}", data_dir.display());

        Ok(Self {
            data_dir,
            db,
            settings,
            sessions,
            simulation,
        })
    }

    /// Starts (or joins) the live feed.
    pub fn subscribe(&self) -> Result<Subscription> {
        self.simulation.subscribe()
    }

    /// Stops the simulation. Outstanding subscriptions stay valid but see no new ticks.
    pub async fn dispose(&self) -> Result<()> {
        self.simulation.shutdown().await
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn simulation(&self) -> &SimulationController {
        &self.simulation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserType;
    use crate::simulation::LoopStatus;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_lays_out_data_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("monitor");
        let ctx = MonitorContext::create(&root).await.unwrap();

        assert!(root.join(DATABASE_FILE).exists());
        assert_eq!(ctx.settings().path(), root.join(SETTINGS_FILE));
        assert!(!ctx.sessions().is_authenticated());
        assert_eq!(ctx.simulation().status(), LoopStatus::Stopped);
    }

    #[tokio::test]
    async fn subscribe_then_dispose_stops_simulation() {
        let dir = tempdir().unwrap();
        let ctx = MonitorContext::create(dir.path()).await.unwrap();

        let subscription = ctx.subscribe().unwrap();
        assert!(ctx.simulation().is_connected());

        ctx.dispose().await.unwrap();
        assert!(!ctx.simulation().is_connected());
        drop(subscription);
        assert_eq!(ctx.simulation().subscriber_count(), 0);

        ctx.dispose().await.unwrap();
    }

    #[tokio::test]
    async fn session_survives_recreate() {
        let dir = tempdir().unwrap();
        {
            let ctx = MonitorContext::create(dir.path()).await.unwrap();
            ctx.sessions()
                .login("nurse@clinic.org", "pw", UserType::Caregiver)
                .await
                .unwrap();
        }

        let ctx = MonitorContext::create(dir.path()).await.unwrap();
        let session = ctx.sessions().current_session().unwrap();
        assert_eq!(session.email, "nurse@clinic.org");
        assert_eq!(session.patient_id.as_deref(), Some("patient123"));
    }
}
