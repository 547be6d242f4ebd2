use risknodes::RiskNodeSet;
use serde::Serialize;
use strategist::AIInsight;
use telemetry::ClimateMetric;

/// View state published by the refresh coordinator
///
/// Transient and in-memory only. The three data slots are replaced
/// together on a successful refresh and never partially.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub metrics: Vec<ClimateMetric>,
    pub risk_nodes: Option<RiskNodeSet>,
    pub insight: Option<AIInsight>,
    pub loading: bool,
    pub last_updated: Option<String>,
}
