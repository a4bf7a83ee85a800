pub mod alert;
pub mod session;
pub mod vitals;

pub use alert::{Alert, AlertId, AlertType};
pub use session::{Session, UserType};
pub use vitals::{AirQuality, BloodPressure, Location, VitalsSample, ECG_SAMPLE_COUNT};
