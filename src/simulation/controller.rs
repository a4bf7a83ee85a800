use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::alerts::DEFAULT_ALERT_LOG_CAPACITY;
use crate::models::{Alert, AlertId, AlertType, Location};

use super::generator::VitalsGenerator;
use super::random::{pick_index, unit, RandomSource, StdRandom};
use super::state::{LoopStatus, MonitorSnapshot, SimulationState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_ALERT_PROBABILITY: f64 = 0.10;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub tick_interval: Duration,
    pub alert_probability: f64,
    pub alert_log_capacity: usize,
    pub reference_location: Location,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            alert_probability: DEFAULT_ALERT_PROBABILITY,
            alert_log_capacity: DEFAULT_ALERT_LOG_CAPACITY,
            reference_location: Location::default(),
        }
    }
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

#[derive(Default)]
struct Subscribers {
    count: usize,
    ticker: Option<Ticker>,
}

struct SimulationCore {
    state: SimulationState,
    rng: Box<dyn RandomSource>,
}

struct Shared {
    core: Mutex<SimulationCore>,
    subscribers: Mutex<Subscribers>,
    publisher: watch::Sender<MonitorSnapshot>,
    generator: VitalsGenerator,
    tick_interval: Duration,
    alert_probability: f64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Shared {
    /// One tick: sample, maybe alert, publish. Skipped when `require_running`
    /// is set and the loop has already been stopped.
    fn advance(&self, require_running: bool) -> Option<(MonitorSnapshot, Option<Alert>)> {
        let (snapshot, alert) = {
            let mut guard = lock(&self.core);
            if require_running && guard.state.status != LoopStatus::Running {
                return None;
            }

            let core = &mut *guard;
            let sample = self.generator.generate(core.rng.as_mut());
            let alert = if unit(core.rng.as_mut()) < self.alert_probability {
                let index = pick_index(core.rng.as_mut(), AlertType::SIMULATED.len());
                Some(Alert::new(AlertType::SIMULATED[index], sample.clone()))
            } else {
                None
            };

            core.state.record_tick(sample, alert.clone());
            (core.state.snapshot(), alert)
        };

        if let Some(alert) = &alert {
            log_info!(
                "alert {} ({}) raised on tick {}",
                alert.id,
                alert.alert_type.as_str(),
                snapshot.ticks
            );
        }
        log_debug!(
            "tick {} published ({} active alerts)",
            snapshot.ticks,
            snapshot.active_alerts.len()
        );

        self.publisher.send_replace(snapshot.clone());
        Some((snapshot, alert))
    }

    fn publish_current(&self) {
        let snapshot = lock(&self.core).state.snapshot();
        self.publisher.send_replace(snapshot);
    }

    fn set_status(&self, running: bool) {
        {
            let mut core = lock(&self.core);
            if running {
                core.state.start();
            } else {
                core.state.stop();
            }
        }
        self.publish_current();
    }
}

/// Owns the periodic vitals simulation and fans its output out to subscribers.
///
/// The ticker runs only while at least one [`Subscription`] is alive.
#[derive(Clone)]
pub struct SimulationController {
    shared: Arc<Shared>,
}

impl SimulationController {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_random(config, Box::new(StdRandom::from_entropy()))
    }

    pub fn with_random(config: SimulationConfig, rng: Box<dyn RandomSource>) -> Self {
        let state = SimulationState::new(config.alert_log_capacity);
        let (publisher, _) = watch::channel(state.snapshot());

        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(SimulationCore { state, rng }),
                subscribers: Mutex::new(Subscribers::default()),
                publisher,
                generator: VitalsGenerator::new(config.reference_location),
                tick_interval: config.tick_interval,
                alert_probability: config.alert_probability,
            }),
        }
    }

    /// Registers a consumer. The first one starts the ticker, which needs a tokio runtime.
    pub fn subscribe(&self) -> Result<Subscription> {
        let mut subscribers = lock(&self.shared.subscribers);
        if subscribers.ticker.is_none() {
            let runtime = tokio::runtime::Handle::try_current()
                .map_err(|err| anyhow!("simulation requires a tokio runtime: {err}"))?;
            subscribers.ticker = Some(self.spawn_ticker(&runtime));
        }
        subscribers.count += 1;

        Ok(Subscription {
            receiver: self.shared.publisher.subscribe(),
            shared: self.shared.clone(),
            active: true,
        })
    }

    fn spawn_ticker(&self, runtime: &tokio::runtime::Handle) -> Ticker {
        self.shared.set_status(true);

        let cancel_token = CancellationToken::new();
        let handle = runtime.spawn(ticker_loop(self.shared.clone(), cancel_token.clone()));

        log_info!(
            "simulation started (interval {}ms)",
            self.shared.tick_interval.as_millis()
        );

        Ticker {
            handle,
            cancel_token,
        }
    }

    /// Stops the ticker whatever the subscriber count and waits for it to exit.
    /// Calling it when already stopped does nothing.
    pub async fn shutdown(&self) -> Result<()> {
        let ticker = {
            let mut subscribers = lock(&self.shared.subscribers);
            let ticker = subscribers.ticker.take();
            if let Some(ticker) = &ticker {
                ticker.cancel_token.cancel();
                self.shared.set_status(false);
            }
            ticker
        };

        if let Some(ticker) = ticker {
            ticker
                .handle
                .await
                .context("simulation ticker task failed to join")?;
            log_info!("simulation shut down");
        }
        Ok(())
    }

    /// Runs one tick immediately, regardless of the timer.
    pub fn step(&self) -> MonitorSnapshot {
        match self.shared.advance(false) {
            Some((snapshot, _)) => snapshot,
            None => self.snapshot(),
        }
    }

    /// Removes an alert from the active list. Unknown ids are ignored.
    pub fn dismiss_alert(&self, id: AlertId) -> bool {
        let removed = lock(&self.shared.core).state.alerts.remove(id);
        if removed {
            self.shared.publish_current();
        } else {
            log_debug!("dismiss ignored: alert {} not in log", id);
        }
        removed
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.shared.publisher.borrow().clone()
    }

    pub fn status(&self) -> LoopStatus {
        lock(&self.shared.core).state.status
    }

    pub fn is_connected(&self) -> bool {
        self.status() == LoopStatus::Running
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.subscribers).count
    }
}

async fn ticker_loop(shared: Arc<Shared>, cancel_token: CancellationToken) {
    let period = shared.tick_interval;
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("simulation ticker shutting down");
                break;
            }
            _ = ticker.tick() => {
                if shared.advance(true).is_none() {
                    break;
                }
            }
        }
    }
}

fn release(shared: &Shared) {
    let mut subscribers = lock(&shared.subscribers);
    subscribers.count = subscribers.count.saturating_sub(1);
    if subscribers.count > 0 {
        return;
    }

    if let Some(ticker) = subscribers.ticker.take() {
        ticker.cancel_token.cancel();
        shared.set_status(false);
        log_info!("last subscriber left; simulation stopped");
    }
}

/// A consumer's view of the simulation. Dropping it has the same effect as [`Subscription::dispose`].
pub struct Subscription {
    receiver: watch::Receiver<MonitorSnapshot>,
    shared: Arc<Shared>,
    active: bool,
}

impl Subscription {
    pub fn current(&self) -> MonitorSnapshot {
        self.receiver.borrow().clone()
    }

    /// Waits for the next published snapshot.
    ///
    /// The stop itself is delivered as a final disconnected snapshot. After
    /// that, or once this subscription is disposed, it fails instead of
    /// waiting for ticks that will never come.
    pub async fn changed(&mut self) -> Result<MonitorSnapshot> {
        if !self.active {
            bail!("subscription has been disposed");
        }

        let pending = self
            .receiver
            .has_changed()
            .context("simulation publisher closed")?;
        if !pending && !self.receiver.borrow().is_connected {
            bail!("simulation is stopped");
        }

        self.receiver
            .changed()
            .await
            .context("simulation publisher closed")?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Releases this subscription. Idempotent.
    pub fn dispose(&mut self) {
        if self.active {
            self.active = false;
            release(&self.shared);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{classify, Priority, Severity};
    use crate::simulation::random::testing::SequenceRandom;

    fn quiet_config() -> SimulationConfig {
        SimulationConfig {
            alert_probability: 0.0,
            ..SimulationConfig::default()
        }
    }

    /// Script that stays quiet except for a heart-rate alert on `alert_tick` (1-based).
    fn heart_rate_on_tick(alert_tick: usize) -> SequenceRandom {
        let mut values = Vec::new();
        for tick in 1..=alert_tick {
            values.extend(std::iter::repeat(0.5).take(VitalsGenerator::DRAWS_PER_SAMPLE));
            if tick == alert_tick {
                values.push(0.05);
                values.push(0.3);
            } else {
                values.push(0.9);
            }
        }
        SequenceRandom::new(values, 0.5)
    }

    #[test]
    fn step_generates_without_a_runtime() {
        let controller = SimulationController::with_random(
            quiet_config(),
            Box::new(StdRandom::seeded(1)),
        );
        assert_eq!(controller.status(), LoopStatus::Stopped);

        let snapshot = controller.step();
        assert_eq!(snapshot.ticks, 1);
        assert!(snapshot.current_vitals.is_some());
        assert!(snapshot.active_alerts.is_empty());
        assert!(!snapshot.is_connected);
    }

    #[test]
    fn subscribe_outside_runtime_fails() {
        let controller = SimulationController::new(SimulationConfig::default());
        assert!(controller.subscribe().is_err());
        assert_eq!(controller.subscriber_count(), 0);
    }

    #[test]
    fn scripted_alert_is_classified_critical() {
        let controller = SimulationController::with_random(
            SimulationConfig::default(),
            Box::new(heart_rate_on_tick(3)),
        );

        for _ in 0..10 {
            controller.step();
        }

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.ticks, 10);
        assert_eq!(snapshot.active_alerts.len(), 1);
        let alert = &snapshot.active_alerts[0];
        assert_eq!(alert.alert_type, AlertType::HeartRate);
        assert_eq!(alert.message, "Abnormal heart rate detected");
        let meta = classify(alert.alert_type);
        assert_eq!(meta.severity, Severity::Danger);
        assert_eq!(meta.priority, Priority::High);
    }

    #[test]
    fn alert_log_is_capped() {
        let config = SimulationConfig {
            alert_probability: 1.0,
            ..SimulationConfig::default()
        };
        let controller = SimulationController::with_random(config, Box::new(StdRandom::seeded(9)));

        for _ in 0..25 {
            controller.step();
        }

        let alerts = controller.snapshot().active_alerts;
        assert_eq!(alerts.len(), DEFAULT_ALERT_LOG_CAPACITY);
        assert!(alerts.windows(2).all(|pair| pair[0].id > pair[1].id));
        assert!(alerts
            .iter()
            .all(|alert| AlertType::SIMULATED.contains(&alert.alert_type)));
    }

    #[test]
    fn dismiss_removes_and_ignores_unknown_ids() {
        let config = SimulationConfig {
            alert_probability: 1.0,
            ..SimulationConfig::default()
        };
        let controller = SimulationController::with_random(config, Box::new(StdRandom::seeded(4)));
        controller.step();
        controller.step();

        let alerts = controller.snapshot().active_alerts;
        assert_eq!(alerts.len(), 2);

        assert!(!controller.dismiss_alert(alerts[0].id + 10_000));
        assert_eq!(controller.snapshot().active_alerts.len(), 2);

        assert!(controller.dismiss_alert(alerts[0].id));
        let remaining = controller.snapshot().active_alerts;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, alerts[1].id);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_runs_only_while_subscribed() {
        let controller = SimulationController::with_random(
            quiet_config(),
            Box::new(StdRandom::seeded(8)),
        );

        let mut first = controller.subscribe().unwrap();
        let mut second = controller.subscribe().unwrap();
        assert_eq!(controller.subscriber_count(), 2);
        assert!(controller.is_connected());
        assert!(first.current().is_connected);

        time::sleep(Duration::from_millis(4100)).await;
        assert_eq!(controller.snapshot().ticks, 2);

        first.dispose();
        first.dispose();
        assert_eq!(controller.subscriber_count(), 1);
        assert!(controller.is_connected());

        second.dispose();
        assert_eq!(controller.subscriber_count(), 0);
        assert_eq!(controller.status(), LoopStatus::Stopped);

        time::sleep(Duration::from_secs(10)).await;
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.ticks, 2);
        assert!(!snapshot.is_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn resubscribing_restarts_a_single_ticker() {
        let controller = SimulationController::with_random(
            quiet_config(),
            Box::new(StdRandom::seeded(12)),
        );

        let subscription = controller.subscribe().unwrap();
        drop(subscription);
        let _again = controller.subscribe().unwrap();

        time::sleep(Duration::from_millis(6100)).await;
        assert_eq!(controller.snapshot().ticks, 3);

        controller.shutdown().await.unwrap();
        controller.shutdown().await.unwrap();
        assert!(!controller.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn timed_run_raises_scripted_alert_on_third_tick() {
        let controller = SimulationController::with_random(
            SimulationConfig::default(),
            Box::new(heart_rate_on_tick(3)),
        );
        let _subscription = controller.subscribe().unwrap();

        time::sleep(Duration::from_millis(20_100)).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.ticks, 10);
        assert_eq!(snapshot.active_alerts.len(), 1);
        let alert = &snapshot.active_alerts[0];
        assert_eq!(alert.alert_type, AlertType::HeartRate);
        let meta = classify(alert.alert_type);
        assert_eq!(meta.severity, Severity::Danger);
        assert_eq!(meta.priority, Priority::High);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_ticks_and_dismissals_keep_log_ordered() {
        fn assert_ordered(snapshot: &MonitorSnapshot) {
            let alerts = &snapshot.active_alerts;
            assert!(alerts.len() <= DEFAULT_ALERT_LOG_CAPACITY);
            assert!(alerts.windows(2).all(|pair| pair[0].id > pair[1].id));
        }

        let config = SimulationConfig {
            alert_probability: 1.0,
            ..SimulationConfig::default()
        };
        let controller =
            SimulationController::with_random(config, Box::new(StdRandom::seeded(31)));

        let producers: Vec<_> = (0..2)
            .map(|_| {
                let controller = controller.clone();
                tokio::task::spawn_blocking(move || {
                    for _ in 0..200 {
                        assert_ordered(&controller.step());
                    }
                })
            })
            .collect();

        let dismisser = {
            let controller = controller.clone();
            tokio::task::spawn_blocking(move || loop {
                let snapshot = controller.snapshot();
                assert_ordered(&snapshot);
                let alerts = &snapshot.active_alerts;
                match alerts.get(alerts.len() / 2) {
                    Some(alert) => {
                        controller.dismiss_alert(alert.id);
                    }
                    None if snapshot.ticks >= 400 => break,
                    None => std::thread::yield_now(),
                }
            })
        };

        for producer in producers {
            producer.await.unwrap();
        }
        dismisser.await.unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.ticks, 400);
        assert!(snapshot.active_alerts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn changed_fails_after_shutdown_instead_of_hanging() {
        let controller = SimulationController::with_random(
            quiet_config(),
            Box::new(StdRandom::seeded(5)),
        );
        let mut subscription = controller.subscribe().unwrap();

        controller.shutdown().await.unwrap();
        let last = subscription.changed().await.unwrap();
        assert!(!last.is_connected);
        assert!(subscription.changed().await.is_err());

        subscription.dispose();
        assert!(subscription.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_published_ticks() {
        let controller = SimulationController::with_random(
            quiet_config(),
            Box::new(StdRandom::seeded(21)),
        );
        let mut subscription = controller.subscribe().unwrap();

        let snapshot = subscription.changed().await.unwrap();
        assert_eq!(snapshot.ticks, 1);
        let vitals = snapshot.current_vitals.unwrap();
        assert_eq!(vitals.ecg.len(), 100);
    }
}
