use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fmt;
use telemetry::{ClimateMetric, MetricKind};

/// Compound risk scores above this value trip the threshold state
pub const RISK_THRESHOLD: u32 = 70;

/// Classification of a compound risk score against the fixed threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskClassification {
    Nominal,
    ThresholdReached,
}

/// Stress percentages and compound risk derived from one metric sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StressReadout {
    pub heat_stress: f64,
    pub rain_stress: f64,
    pub compound_risk: u32,
    pub classification: RiskClassification,
}

/// Heat stress percentage for an air temperature in °C
pub fn heat_stress(temp_c: f64) -> f64 {
    ((temp_c - 25.0) * 8.0).clamp(0.0, 100.0)
}

/// Rain stress percentage for a rainfall rate in mm/h
pub fn rain_stress(rain_mm_h: f64) -> f64 {
    (rain_mm_h * 50.0).clamp(0.0, 100.0)
}

/// Weighted compound risk score in 0..=100
pub fn compound_risk(heat: f64, rain: f64) -> u32 {
    (heat * 0.4 + rain * 0.6).floor() as u32
}

impl RiskClassification {
    /// Classify a compound risk score; the threshold itself is nominal
    pub fn from_score(score: u32) -> Self {
        if score > RISK_THRESHOLD {
            RiskClassification::ThresholdReached
        } else {
            RiskClassification::Nominal
        }
    }
}

impl fmt::Display for RiskClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskClassification::Nominal => f.write_str("nominal"),
            RiskClassification::ThresholdReached => f.write_str("threshold reached"),
        }
    }
}

impl StressReadout {
    /// Evaluate the stress formulas against a metric sequence
    ///
    /// Metrics are located by typed kind, never by label text. Errors if
    /// the temperature or rainfall metric is missing or non-numeric.
    pub fn from_metrics(metrics: &[ClimateMetric]) -> Result<Self> {
        let temp = numeric_metric(metrics, MetricKind::Temperature)?;
        let rain = numeric_metric(metrics, MetricKind::Rainfall)?;

        let heat = heat_stress(temp);
        let wet = rain_stress(rain);
        let score = compound_risk(heat, wet);

        Ok(StressReadout {
            heat_stress: heat,
            rain_stress: wet,
            compound_risk: score,
            classification: RiskClassification::from_score(score),
        })
    }
}

fn numeric_metric(metrics: &[ClimateMetric], kind: MetricKind) -> Result<f64> {
    let metric = metrics
        .iter()
        .find(|m| m.kind == kind)
        .ok_or_else(|| anyhow!("no {:?} metric in sequence", kind))?;
    metric
        .value
        .as_f64()
        .ok_or_else(|| anyhow!("{:?} metric value '{}' is not numeric", kind, metric.value))
}
