pub mod alerts;
pub mod auth;
pub mod context;
pub mod db;
pub mod models;
pub mod settings;
pub mod simulation;
pub mod utils;
pub mod views;

use std::path::PathBuf;

use anyhow::{Context, Result};

use alerts::classify;
use context::MonitorContext;
use models::{AlertId, UserType};
use simulation::MonitorSnapshot;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

const DEFAULT_DATA_DIR: &str = "./vitalwatch-data";

fn data_dir() -> PathBuf {
    std::env::var_os("VITALWATCH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Signs in from `VITALWATCH_EMAIL` (plus optional `VITALWATCH_PASSWORD` and
/// `VITALWATCH_ROLE`) when set. Otherwise keeps the session restored from storage.
async fn sign_in(ctx: &MonitorContext) {
    let Ok(email) = std::env::var("VITALWATCH_EMAIL") else {
        match ctx.sessions().current_session() {
            Some(session) => log_info!("Monitoring as {} ({})", session.name, session.email),
            None => log_warn!("No active session; set VITALWATCH_EMAIL to sign in"),
        }
        return;
    };

    let user_type = match std::env::var("VITALWATCH_ROLE") {
        Ok(role) => role.parse().unwrap_or_else(|err| {
            log_warn!("{err}; falling back to caregiver");
            UserType::default()
        }),
        Err(_) => UserType::default(),
    };

    let password = std::env::var("VITALWATCH_PASSWORD").unwrap_or_default();
    let response = auth::commands::login(ctx, email, password, user_type).await;
    if response.success {
        log_info!("{}", response.notification);
    } else {
        log_warn!(
            "{} ({})",
            response.notification,
            response.error.unwrap_or_default()
        );
    }
}

fn report(snapshot: &MonitorSnapshot, last_alert: &mut Option<AlertId>) {
    if let Some(vitals) = &snapshot.current_vitals {
        log_info!(
            "tick {}: HR {} bpm, SpO2 {}%, BP {}, temp {}°C, battery {}%",
            snapshot.ticks,
            vitals.heart_rate,
            vitals.sp_o2,
            vitals.blood_pressure,
            vitals.temperature,
            vitals.battery
        );
        for banner in views::banners(vitals) {
            log_warn!("{banner}");
        }
    }

    let newest = snapshot.active_alerts.first();
    if let Some(alert) = newest.filter(|alert| Some(alert.id) != *last_alert) {
        let meta = classify(alert.alert_type);
        log_warn!(
            "[{}] {}: {}",
            meta.priority.as_str(),
            meta.title,
            alert.message
        );
    }
    *last_alert = newest.map(|alert| alert.id);
}

async fn monitor() -> Result<()> {
    let ctx = MonitorContext::create(data_dir()).await?;
    sign_in(&ctx).await;

    let mut subscription = ctx.subscribe()?;
    let mut last_alert = None;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("failed to listen for Ctrl-C")?;
                log_info!("Ctrl-C received, stopping monitor");
                break;
            }
            snapshot = subscription.changed() => {
                report(&snapshot?, &mut last_alert);
            }
        }
    }

    subscription.dispose();
    ctx.dispose().await
}

/// Info unless the filter variable (`RUST_LOG` by default) says otherwise.
fn logger_builder(env: env_logger::Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("info"))
}

pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    logger_builder(env_logger::Env::default()).init();

    log::info!("VitalWatch starting up...");

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")
        .and_then(|runtime| runtime.block_on(monitor()));

    if let Err(err) = result {
        log_error!("VitalWatch exited with error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn log_filter_defaults_to_info() {
        let env = env_logger::Env::new().filter("VITALWATCH_TEST_UNSET_LOG");
        assert_eq!(logger_builder(env).build().filter(), LevelFilter::Info);
    }

    #[test]
    fn log_filter_variable_overrides_default() {
        std::env::set_var("VITALWATCH_TEST_DEBUG_LOG", "debug");
        let env = env_logger::Env::new().filter("VITALWATCH_TEST_DEBUG_LOG");
        assert_eq!(logger_builder(env).build().filter(), LevelFilter::Debug);

        std::env::set_var("VITALWATCH_TEST_WARN_LOG", "warn");
        let env = env_logger::Env::new().filter("VITALWATCH_TEST_WARN_LOG");
        assert_eq!(logger_builder(env).build().filter(), LevelFilter::Warn);
    }
}
