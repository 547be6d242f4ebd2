use crate::sources::{InsightSource, MetricsSource, RiskNodeSource};
use crate::state::DashboardState;
use anyhow::Result;
use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use strategist::DashboardModule;
use telemetry::City;

/// Minimum interval between non-forced refreshes
pub const QUIET_INTERVAL: Duration = Duration::from_millis(2000);

/// Hazard categories passed to the risk-node query
pub const HAZARD_QUERY: &str = "heat, flooding, and grid stability";

/// Orchestrates acquisition of the three dashboard data sets and publishes
/// them as one atomic view-state update
///
/// Each cycle takes a monotonically increasing generation token at
/// initiation. A cycle whose token has been superseded by the time its
/// results arrive drops them instead of overwriting newer state.
pub struct RefreshCoordinator {
    state: Arc<Mutex<DashboardState>>,
    metrics: Arc<dyn MetricsSource>,
    risk_nodes: Arc<dyn RiskNodeSource>,
    insights: Arc<dyn InsightSource>,
    last_initiated: Mutex<Option<Instant>>,
    generation: AtomicU64,
    quiet_interval: Duration,
}

impl RefreshCoordinator {
    /// Create a coordinator over the three data sources
    pub fn new(
        metrics: Arc<dyn MetricsSource>,
        risk_nodes: Arc<dyn RiskNodeSource>,
        insights: Arc<dyn InsightSource>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(DashboardState::default())),
            metrics,
            risk_nodes,
            insights,
            last_initiated: Mutex::new(None),
            generation: AtomicU64::new(0),
            quiet_interval: QUIET_INTERVAL,
        }
    }

    /// Override the quiet interval
    pub fn with_quiet_interval(mut self, quiet_interval: Duration) -> Self {
        self.quiet_interval = quiet_interval;
        self
    }

    /// Clone of the current view state
    pub fn snapshot(&self) -> DashboardState {
        self.state.lock().unwrap().clone()
    }

    /// Refresh the three data sets for a city
    ///
    /// Non-forced calls within the quiet interval of the last initiated
    /// refresh are no-ops. Failures are logged and swallowed; the only
    /// state change on failure is the loading flag clearing.
    pub async fn refresh(&self, city: City, force: bool) {
        let now = Instant::now();
        {
            let mut last = self.last_initiated.lock().unwrap();
            if !force {
                if let Some(prev) = *last {
                    if now.duration_since(prev) < self.quiet_interval {
                        debug!("refresh for {} suppressed by quiet interval", city);
                        return;
                    }
                }
            }
            *last = Some(now);
        }

        // Loading flag is raised before the first suspension point.
        self.state.lock().unwrap().loading = true;
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(e) = self.run_cycle(city, token).await {
            error!("dashboard refresh failed for {}: {:#}", city, e);
        }

        // A superseded cycle leaves the flag to the cycle that owns it.
        if self.generation.load(Ordering::SeqCst) == token {
            self.state.lock().unwrap().loading = false;
        }
    }

    async fn run_cycle(&self, city: City, token: u64) -> Result<()> {
        let coords = city.coordinates();

        let (metrics, nodes) = tokio::try_join!(
            self.metrics.fetch_live_metrics(city),
            self.risk_nodes.nearby_nodes(coords.lat, coords.lng, HAZARD_QUERY),
        )?;

        // The insight depends on this cycle's metrics; never concurrent
        // with the fan-out above.
        let insight = self
            .insights
            .derive_insight(city, &metrics, DashboardModule::Overview)
            .await?;

        let mut state = self.state.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != token {
            debug!("dropping stale refresh results for {}", city);
            return Ok(());
        }
        state.metrics = metrics;
        state.risk_nodes = Some(nodes);
        state.insight = Some(insight);
        state.last_updated = Some(Local::now().format("%H:%M:%S").to_string());
        info!("dashboard refreshed for {}", city);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use risknodes::RiskNodeSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use strategist::AIInsight;
    use telemetry::{ClimateMetric, MetricKind, MetricStatus, MetricValue, Trend};

    fn sample_metrics(temp: f64) -> Vec<ClimateMetric> {
        vec![
            ClimateMetric {
                kind: MetricKind::Temperature,
                label: "Temperature".to_string(),
                value: MetricValue::Number(temp),
                unit: "°C".to_string(),
                trend: Trend::Stable,
                status: MetricStatus::Normal,
            },
            ClimateMetric {
                kind: MetricKind::Rainfall,
                label: "Rainfall".to_string(),
                value: MetricValue::Number(0.12),
                unit: "mm/h".to_string(),
                trend: Trend::Stable,
                status: MetricStatus::Normal,
            },
        ]
    }

    /// Returns metrics with temperature 30.0, 31.0, ... per call, with an
    /// optional per-call delay before responding
    #[derive(Default)]
    struct MockMetrics {
        calls: AtomicUsize,
        fail: AtomicBool,
        delays_ms: Vec<u64>,
    }

    #[async_trait]
    impl MetricsSource for MockMetrics {
        async fn fetch_live_metrics(&self, _city: City) -> anyhow::Result<Vec<ClimateMetric>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ms) = self.delays_ms.get(call) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                bail!("metrics feed offline");
            }
            Ok(sample_metrics(30.0 + call as f64))
        }
    }

    #[derive(Default)]
    struct MockNodes {
        fail: AtomicBool,
        last_query: Mutex<Option<String>>,
    }

    #[async_trait]
    impl RiskNodeSource for MockNodes {
        async fn nearby_nodes(
            &self,
            _lat: f64,
            _lng: f64,
            query: &str,
        ) -> anyhow::Result<RiskNodeSet> {
            *self.last_query.lock().unwrap() = Some(query.to_string());
            if self.fail.load(Ordering::SeqCst) {
                bail!("node lookup offline");
            }
            Ok(RiskNodeSet {
                text: "ok".to_string(),
                chunks: vec![],
            })
        }
    }

    /// Records the temperature of every metric sequence it is handed
    #[derive(Default)]
    struct MockInsights {
        fail: AtomicBool,
        seen_temps: Mutex<Vec<f64>>,
    }

    #[async_trait]
    impl InsightSource for MockInsights {
        async fn derive_insight(
            &self,
            _city: City,
            metrics: &[ClimateMetric],
            _module: DashboardModule,
        ) -> anyhow::Result<AIInsight> {
            if self.fail.load(Ordering::SeqCst) {
                bail!("strategist offline");
            }
            let temp = metrics
                .iter()
                .find(|m| m.kind == MetricKind::Temperature)
                .and_then(|m| m.value.as_f64())
                .unwrap();
            self.seen_temps.lock().unwrap().push(temp);
            Ok(AIInsight {
                summary: format!("temp {}", temp),
                recommendations: vec![],
                confidence: 0.91,
            })
        }
    }

    struct Harness {
        coordinator: RefreshCoordinator,
        metrics: Arc<MockMetrics>,
        nodes: Arc<MockNodes>,
        insights: Arc<MockInsights>,
    }

    fn harness(metrics: MockMetrics) -> Harness {
        let metrics = Arc::new(metrics);
        let nodes = Arc::new(MockNodes::default());
        let insights = Arc::new(MockInsights::default());
        let coordinator = RefreshCoordinator::new(
            metrics.clone(),
            nodes.clone(),
            insights.clone(),
        );
        Harness {
            coordinator,
            metrics,
            nodes,
            insights,
        }
    }

    #[tokio::test]
    async fn test_debounce_suppresses_rapid_refresh() {
        let h = harness(MockMetrics::default());

        h.coordinator.refresh(City::Singapore, false).await;
        let first = h.coordinator.snapshot();
        h.coordinator.refresh(City::Singapore, false).await;
        let second = h.coordinator.snapshot();

        assert_eq!(h.metrics.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.metrics, second.metrics);
        assert_eq!(first.last_updated, second.last_updated);
        assert!(!second.loading);
    }

    #[tokio::test]
    async fn test_forced_refresh_bypasses_quiet_interval() {
        let h = harness(MockMetrics::default());

        h.coordinator.refresh(City::Singapore, true).await;
        h.coordinator.refresh(City::Singapore, true).await;

        assert_eq!(h.metrics.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_successful_refresh_commits_all_slots() {
        let h = harness(MockMetrics::default());

        h.coordinator.refresh(City::Singapore, true).await;
        let state = h.coordinator.snapshot();

        assert_eq!(state.metrics, sample_metrics(30.0));
        assert_eq!(state.risk_nodes.as_ref().unwrap().text, "ok");
        assert_eq!(state.insight.as_ref().unwrap().summary, "temp 30");
        assert!(state.last_updated.is_some());
        assert!(!state.loading);
        assert_eq!(
            h.nodes.last_query.lock().unwrap().as_deref(),
            Some(HAZARD_QUERY)
        );
    }

    #[tokio::test]
    async fn test_fanout_failure_leaves_slots_untouched() {
        let h = harness(MockMetrics::default());

        h.coordinator.refresh(City::Singapore, true).await;
        let before = h.coordinator.snapshot();

        h.nodes.fail.store(true, Ordering::SeqCst);
        h.coordinator.refresh(City::Singapore, true).await;
        let after = h.coordinator.snapshot();

        assert_eq!(before.metrics, after.metrics);
        assert_eq!(before.risk_nodes, after.risk_nodes);
        assert_eq!(before.insight, after.insight);
        assert_eq!(before.last_updated, after.last_updated);
        assert!(!after.loading);
    }

    #[tokio::test]
    async fn test_insight_failure_leaves_slots_untouched() {
        let h = harness(MockMetrics::default());

        h.coordinator.refresh(City::Singapore, true).await;
        let before = h.coordinator.snapshot();

        h.insights.fail.store(true, Ordering::SeqCst);
        h.coordinator.refresh(City::Singapore, true).await;
        let after = h.coordinator.snapshot();

        // The metrics fetch succeeded, but a later failure still aborts
        // the whole commit.
        assert_eq!(before.metrics, after.metrics);
        assert_eq!(before.insight, after.insight);
        assert!(!after.loading);
    }

    #[tokio::test]
    async fn test_failed_cycle_never_populates_empty_state() {
        let h = harness(MockMetrics::default());
        h.metrics.fail.store(true, Ordering::SeqCst);

        h.coordinator.refresh(City::Singapore, true).await;
        let state = h.coordinator.snapshot();

        assert!(state.metrics.is_empty());
        assert!(state.risk_nodes.is_none());
        assert!(state.insight.is_none());
        assert!(state.last_updated.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_insight_sees_its_own_cycles_metrics() {
        let h = harness(MockMetrics::default());

        h.coordinator.refresh(City::Singapore, true).await;
        h.coordinator.refresh(City::Singapore, true).await;

        let seen = h.insights.seen_temps.lock().unwrap().clone();
        assert_eq!(seen, vec![30.0, 31.0]);
    }

    #[tokio::test]
    async fn test_stale_cycle_is_dropped() {
        // First cycle's metrics fetch is slow; a second cycle started
        // while it is in flight finishes first and must win.
        let h = harness(MockMetrics {
            delays_ms: vec![100, 0],
            ..Default::default()
        });
        let coordinator = Arc::new(h.coordinator);

        let slow = coordinator.clone();
        let slow_handle = tokio::spawn(async move {
            slow.refresh(City::Singapore, true).await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fast = coordinator.clone();
        let fast_handle = tokio::spawn(async move {
            fast.refresh(City::Singapore, true).await;
        });

        slow_handle.await.unwrap();
        fast_handle.await.unwrap();

        let state = coordinator.snapshot();
        assert_eq!(h.metrics.calls.load(Ordering::SeqCst), 2);
        // Second call produced temperature 31.0; the late first cycle's
        // 30.0 must not overwrite it.
        assert_eq!(state.metrics, sample_metrics(31.0));
        assert_eq!(state.insight.as_ref().unwrap().summary, "temp 31");
        assert!(!state.loading);
    }
}
