//! Vehicle tracking domain logic.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod model;
pub mod simulator;
pub mod snapshot;
pub mod store;

pub use broadcast::{LocationBroadcast, Publisher};
pub use config::SimulatorConfig;
pub use error::*;
pub use model::*;
pub use simulator::{MovementSimulator, TickOutcome};
pub use snapshot::{DashboardStats, SnapshotService};
pub use store::{UserStore, VehicleStore};
