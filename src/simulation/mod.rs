pub mod commands;
pub mod controller;
pub mod generator;
pub mod random;
pub mod state;

pub use controller::{SimulationConfig, SimulationController, Subscription};
pub use generator::VitalsGenerator;
pub use random::{RandomSource, StdRandom};
pub use state::{LoopStatus, MonitorSnapshot};
