#[macro_use]
extern crate log;

use anyhow::{anyhow, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Live urban telemetry source for the resilience dashboard
pub struct LiveTelemetryAPI;

/// Cities covered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Singapore")]
    Singapore,
    #[serde(rename = "Hong Kong")]
    HongKong,
}

/// Fixed geographic anchor point for a city
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Metric kinds reported by the live telemetry feed
///
/// Typed keys so consumers never locate a metric by matching on its
/// display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Temperature,
    Humidity,
    Rainfall,
    AirQuality,
}

/// Direction a metric is moving relative to the previous reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Operational status attached to a metric reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Normal,
    Warning,
    Critical,
}

/// Metric reading value, either numeric or pre-formatted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

/// One climate metric reading for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateMetric {
    pub kind: MetricKind,
    pub label: String,
    pub value: MetricValue,
    pub unit: String,
    pub trend: Trend,
    pub status: MetricStatus,
}

/// Sensing modality of a city infrastructure node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Thermal,
    Aqi,
    Water,
    Grid,
}

/// Operational status of a sensor node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Optimal,
    Stable,
    Warning,
}

/// One row of the nodal telemetry table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorNode {
    pub id: String,
    pub sector: String,
    pub modality: Modality,
    pub reading: String,
    pub status: NodeStatus,
}

impl City {
    /// Display name as shown on the dashboard
    pub fn name(&self) -> &'static str {
        match self {
            City::Singapore => "Singapore",
            City::HongKong => "Hong Kong",
        }
    }

    /// Fixed coordinate pair used for nearby risk-node queries
    pub fn coordinates(&self) -> Coordinates {
        match self {
            City::Singapore => Coordinates { lat: 1.3521, lng: 103.8198 },
            City::HongKong => Coordinates { lat: 22.3193, lng: 114.1694 },
        }
    }

    /// All covered cities, in dashboard order
    pub fn all() -> [City; 2] {
        [City::Singapore, City::HongKong]
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Singapore" => Ok(City::Singapore),
            "Hong Kong" => Ok(City::HongKong),
            other => Err(anyhow!(
                "unknown city '{}' (expected 'Singapore' or 'Hong Kong')",
                other
            )),
        }
    }
}

impl MetricValue {
    /// Numeric view of the value, parsing text readings if needed
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl LiveTelemetryAPI {
    /// Create a new live telemetry source
    pub fn new() -> Self {
        Self
    }

    /// Fetch the current metric readings for a city
    ///
    /// Stub feed: fixed baselines per city with a small random shift on the
    /// temperature, formatted to two decimal places.
    pub async fn fetch_live_metrics(&self, city: City) -> Result<Vec<ClimateMetric>> {
        let base = match city {
            City::Singapore => 31.42,
            City::HongKong => 24.85,
        };
        let shift: f64 = rand::rng().random_range(0.0..0.45);
        let temperature = format!("{:.2}", base + shift);
        debug!("live metrics for {}: temperature {}", city, temperature);

        Ok(vec![
            ClimateMetric {
                kind: MetricKind::Temperature,
                label: "Temperature".to_string(),
                value: MetricValue::Text(temperature),
                unit: "°C".to_string(),
                trend: Trend::Stable,
                status: MetricStatus::Normal,
            },
            ClimateMetric {
                kind: MetricKind::Humidity,
                label: "Humidity".to_string(),
                value: MetricValue::Number(81.0),
                unit: "%".to_string(),
                trend: Trend::Up,
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
            ClimateMetric {
                kind: MetricKind::AirQuality,
                label: "AQI Index".to_string(),
                value: MetricValue::Number(48.0),
                unit: String::new(),
                trend: Trend::Down,
                status: MetricStatus::Normal,
            },
        ])
    }

    /// Nodal telemetry table derived from the current metric readings
    ///
    /// The thermal node echoes the live temperature metric; the other rows
    /// are fixed stub readings.
    pub fn sensor_nodes(&self, metrics: &[ClimateMetric]) -> Result<Vec<SensorNode>> {
        let temperature = metrics
            .iter()
            .find(|m| m.kind == MetricKind::Temperature)
            .ok_or_else(|| anyhow!("no temperature metric in feed"))?;

        Ok(vec![
            SensorNode {
                id: "NODE-MAR-01".to_string(),
                sector: "Marina Hub".to_string(),
                modality: Modality::Thermal,
                reading: format!("{}°C", temperature.value),
                status: NodeStatus::Optimal,
            },
            SensorNode {
                id: "NODE-CEN-42".to_string(),
                sector: "Central Corridor".to_string(),
                modality: Modality::Aqi,
                reading: "42 AQI".to_string(),
                status: NodeStatus::Stable,
            },
            SensorNode {
                id: "NODE-JUR-91".to_string(),
                sector: "Logistics Zone".to_string(),
                modality: Modality::Water,
                reading: "+0.12m".to_string(),
                status: NodeStatus::Optimal,
            },
            SensorNode {
                id: "NODE-TUAS-12".to_string(),
                sector: "Port Authority".to_string(),
                modality: Modality::Grid,
                reading: "4.8 GW".to_string(),
                status: NodeStatus::Optimal,
            },
        ])
    }
}

impl Default for LiveTelemetryAPI {
    fn default() -> Self {
        Self::new()
    }
}
