//! Airport snapshot
//!
//! Read-only view of the airport handed to persistence layers: identity,
//! balance, game-over status, progression and failure counts, plus a
//! summary of every runway.
//!
//! # Critical Invariants
//!
//! - **Read-only**: building a snapshot never mutates the orchestrator
//! - **Config Matching**: `config_hash` identifies the configuration the
//!   snapshot was produced under (canonical JSON, SHA-256)

use crate::failure::FailureCategory;
use crate::models::{OccupancyReason, Runway, RunwayTier};
use crate::orchestrator::SimulationError;
use crate::weather::WeatherCondition;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Serializable airport state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportSnapshot {
    pub name: String,
    pub identifier: String,

    /// Next tick to be processed
    pub tick: usize,
    pub day: usize,
    pub balance: i64,

    pub game_over: bool,
    pub game_over_category: Option<FailureCategory>,
    pub game_over_reason: Option<String>,

    pub level: u32,
    pub xp: u64,
    /// Unlocked achievement ids, sorted
    pub achievements: Vec<String>,
    pub failure_counts: BTreeMap<FailureCategory, u32>,

    pub runways: Vec<RunwaySummary>,
    pub airborne_flights: usize,
    pub weather: WeatherCondition,

    /// SHA256 hash of the configuration
    pub config_hash: String,
}

/// One runway as seen by a persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwaySummary {
    pub id: String,
    pub tier: RunwayTier,
    pub length: u32,
    pub wear: u32,
    pub landings: u64,
    pub occupied_by: Option<OccupancyReason>,
    pub remaining_ticks: usize,
}

impl From<&Runway> for RunwaySummary {
    fn from(runway: &Runway) -> Self {
        Self {
            id: runway.id().to_string(),
            tier: runway.tier(),
            length: runway.length(),
            wear: runway.wear(),
            landings: runway.landings(),
            occupied_by: runway.occupancy().map(|o| o.reason),
            remaining_ticks: runway.occupancy().map_or(0, |o| o.remaining_ticks),
        }
    }
}

impl AirportSnapshot {
    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot serialization failed: {}", e))
        })
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot parse failed: {}", e))
        })
    }

    /// Failure count for one category (0 if never recorded)
    pub fn failure_count(&self, category: FailureCategory) -> u32 {
        self.failure_counts.get(&category).copied().unwrap_or(0)
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic hash of configuration
///
/// Keys are sorted recursively before hashing, so two configurations that
/// serialize to the same fields in a different order hash identically.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
