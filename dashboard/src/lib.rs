#[macro_use]
extern crate log;

pub mod coordinator;
pub mod risk;
pub mod sources;
pub mod state;

pub use coordinator::{RefreshCoordinator, HAZARD_QUERY, QUIET_INTERVAL};
pub use risk::{RiskClassification, StressReadout};
pub use sources::{InsightSource, MetricsSource, RiskNodeSource};
pub use state::DashboardState;
