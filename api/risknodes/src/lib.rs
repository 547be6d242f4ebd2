#[macro_use]
extern crate log;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// GIS risk-node source for the resilience map view
pub struct RiskNodeAPI;

/// One interactive node on the GIS view
///
/// Positions are normalized percentages of the map viewport, not
/// geographic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    pub title: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: [f64; 2],
    pub uri: Option<String>,
}

/// Set of grounding chunks returned for one nearby-nodes query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskNodeSet {
    pub text: String,
    pub chunks: Vec<GroundingChunk>,
}

const SINGAPORE_NODES: [(&str, &str, [f64; 2]); 8] = [
    ("Marina Bay District Cooling Hub", "Micro-grid", [35.0, 45.0]),
    ("Raffles Place Transport Exchange", "Transport Hub", [45.0, 42.0]),
    ("Jurong Island Grid Node 04", "Micro-grid", [65.0, 20.0]),
    ("Tuas Mega Logistics Hub", "Logistics", [70.0, 15.0]),
    ("Changi Business Park Micro-grid", "Micro-grid", [40.0, 85.0]),
    ("Punggol Digital District Cooling", "Building", [20.0, 75.0]),
    ("Kallang Basin Flood Control", "Infrastructure", [48.0, 55.0]),
    ("Orchard Urban Resilience Node", "Sensor", [42.0, 38.0]),
];

const HONG_KONG_NODES: [(&str, &str, [f64; 2]); 8] = [
    ("International Commerce Centre", "Building", [55.0, 45.0]),
    ("Victoria Harbour Sensor Cluster", "Sensor", [60.0, 50.0]),
    ("Kowloon Bay District Cooling", "Micro-grid", [45.0, 55.0]),
    ("West Kowloon Terminal Hub", "Transport Hub", [58.0, 43.0]),
    ("Lantau Grid Stabilizer", "Micro-grid", [75.0, 25.0]),
    ("Tsuen Wan Resilience Node", "Building", [35.0, 30.0]),
    ("Kai Tak Smart District Node", "Campus", [42.0, 60.0]),
    ("Central Financial Resilience Hub", "Building", [62.0, 48.0]),
];

impl RiskNodeAPI {
    /// Create a new risk-node source
    pub fn new() -> Self {
        Self
    }

    /// Fetch the risk nodes near a coordinate pair
    ///
    /// Stub source: latitudes below 5° select the Singapore table,
    /// everything else the Hong Kong table. Each node carries a maps
    /// search URI built from its title.
    pub async fn nearby_nodes(&self, lat: f64, lng: f64, query: &str) -> Result<RiskNodeSet> {
        debug!("risk nodes near ({}, {}) for query '{}'", lat, lng, query);

        let table: &[(&str, &str, [f64; 2])] = if lat < 5.0 {
            &SINGAPORE_NODES
        } else {
            &HONG_KONG_NODES
        };

        let chunks = table
            .iter()
            .map(|(title, node_type, position)| GroundingChunk {
                title: title.to_string(),
                node_type: node_type.to_string(),
                position: *position,
                uri: Some(maps_search_uri(title)),
            })
            .collect();

        Ok(RiskNodeSet {
            text: "Fallback nodes synchronized.".to_string(),
            chunks,
        })
    }
}

impl Default for RiskNodeAPI {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps search URI for a node title
fn maps_search_uri(title: &str) -> String {
    format!(
        "https://www.google.com/maps/search/{}",
        urlencoding::encode(title)
    )
}
