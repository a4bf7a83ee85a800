use serde::Serialize;

use crate::alerts::{has_critical_alerts, AlertSummary};
use crate::context::MonitorContext;
use crate::models::AlertId;
use crate::views::device::ConnectionLink;
use crate::views::history::{MetricDescriptor, MetricStats};
use crate::views::{self, HistoryPoint, Metric, SensorReport, VitalCard};

use super::{MonitorSnapshot, RandomSource, StdRandom};

pub fn get_monitor_snapshot(ctx: &MonitorContext) -> MonitorSnapshot {
    ctx.simulation().snapshot()
}

pub fn get_connection_status(ctx: &MonitorContext) -> bool {
    ctx.simulation().is_connected()
}

/// Returns whether the alert was still in the log.
pub fn dismiss_alert(ctx: &MonitorContext, alert_id: AlertId) -> bool {
    ctx.simulation().dismiss_alert(alert_id)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub cards: Vec<VitalCard>,
    pub banners: Vec<&'static str>,
    pub battery_low: bool,
    pub alert_summary: AlertSummary,
    pub has_critical_alerts: bool,
    pub is_connected: bool,
}

/// `Err` until the first sample has been produced.
pub fn get_dashboard(ctx: &MonitorContext) -> Result<DashboardView, String> {
    let snapshot = ctx.simulation().snapshot();
    let vitals = snapshot
        .current_vitals
        .as_ref()
        .ok_or_else(|| "no vitals received yet".to_string())?;

    Ok(DashboardView {
        cards: views::vital_cards(vitals),
        banners: views::banners(vitals),
        battery_low: views::status::is_battery_low(vitals.battery),
        alert_summary: AlertSummary::from_alerts(&snapshot.active_alerts),
        has_critical_alerts: has_critical_alerts(&snapshot.active_alerts),
        is_connected: snapshot.is_connected,
    })
}

pub fn get_sensor_reports(ctx: &MonitorContext) -> Vec<SensorReport> {
    let snapshot = ctx.simulation().snapshot();
    views::sensor_reports(snapshot.current_vitals.as_ref())
}

pub fn get_connection_links() -> Vec<ConnectionLink> {
    views::connection_links()
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricHistory {
    pub metric: Metric,
    pub descriptor: MetricDescriptor,
    pub stats: Option<MetricStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub points: Vec<HistoryPoint>,
    pub metrics: Vec<MetricHistory>,
}

fn history_view(rng: &mut dyn RandomSource) -> HistoryView {
    let points = views::generate_daily(rng);
    let metrics = Metric::ALL
        .into_iter()
        .map(|metric| MetricHistory {
            metric,
            descriptor: metric.descriptor(),
            stats: views::stats(&points, metric),
        })
        .collect();
    HistoryView { points, metrics }
}

/// A fresh synthetic day on every call.
pub fn get_history() -> HistoryView {
    history_view(&mut StdRandom::from_entropy())
}
