use anyhow::Result;
use async_trait::async_trait;
use risknodes::{RiskNodeAPI, RiskNodeSet};
use strategist::{AIInsight, DashboardModule, StrategistAPI};
use telemetry::{City, ClimateMetric, LiveTelemetryAPI};

/// Live climate metrics feed
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch_live_metrics(&self, city: City) -> Result<Vec<ClimateMetric>>;
}

/// Nearby GIS risk nodes
#[async_trait]
pub trait RiskNodeSource: Send + Sync {
    async fn nearby_nodes(&self, lat: f64, lng: f64, query: &str) -> Result<RiskNodeSet>;
}

/// Insight derivation from a metric sequence
#[async_trait]
pub trait InsightSource: Send + Sync {
    async fn derive_insight(
        &self,
        city: City,
        metrics: &[ClimateMetric],
        module: DashboardModule,
    ) -> Result<AIInsight>;
}

#[async_trait]
impl MetricsSource for LiveTelemetryAPI {
    async fn fetch_live_metrics(&self, city: City) -> Result<Vec<ClimateMetric>> {
        LiveTelemetryAPI::fetch_live_metrics(self, city).await
    }
}

#[async_trait]
impl RiskNodeSource for RiskNodeAPI {
    async fn nearby_nodes(&self, lat: f64, lng: f64, query: &str) -> Result<RiskNodeSet> {
        RiskNodeAPI::nearby_nodes(self, lat, lng, query).await
    }
}

#[async_trait]
impl InsightSource for StrategistAPI {
    async fn derive_insight(
        &self,
        city: City,
        metrics: &[ClimateMetric],
        module: DashboardModule,
    ) -> Result<AIInsight> {
        StrategistAPI::derive_insight(self, city, metrics, module).await
    }
}
