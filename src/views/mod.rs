//! Presentation helpers shared by the dashboard pages.

pub mod device;
pub mod history;
pub mod routes;
pub mod status;

pub use device::{connection_links, sensor_reports, SensorReport, SensorStatus};
pub use history::{generate_daily, stats, HistoryPoint, Metric, MetricStats};
pub use routes::{resolve, Navigation, Route};
pub use status::{banners, vital_cards, VitalCard, VitalStatus};
