//! Airport configuration
//!
//! [`AirportConfig`] is the single configuration root. Every section has
//! defaults, so a JSON file only needs the fields it changes:
//!
//! ```json
//! {
//!   "name": "Harbour Field",
//!   "rng_seed": 7,
//!   "runways": [{ "id": "04", "tier": "Large" }],
//!   "arrivals": { "rate_per_tick": 0.5 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::arrivals::{ArrivalConfig, MIN_LEAD_TIME};
use crate::dispatch::{DispatchConfig, DispatchMode};
use crate::emergency::DEFAULT_EMERGENCY_WINDOW;
use crate::events::{EventSchedule, ScheduledEvent};
use crate::failure::{FailureCategory, FailureThresholds};
use crate::models::{Runway, RunwayTier};
use crate::orchestrator::SimulationError;
use crate::progression::{AchievementReward, ProgressionConfig};
use crate::revenue::{RevenueRates, MIN_DELAY_MULTIPLIER};
use crate::runways::WearConfig;
use crate::weather::WeatherConfig;

// ============================================================================
// Configuration Types
// ============================================================================

/// One runway to register at start-up, purchase, or unlock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwaySpec {
    pub id: String,
    pub tier: RunwayTier,
    /// Overrides the tier's default length
    #[serde(default)]
    pub length: Option<u32>,
}

impl RunwaySpec {
    pub fn new(id: impl Into<String>, tier: RunwayTier) -> Self {
        Self {
            id: id.into(),
            tier,
            length: None,
        }
    }

    pub fn to_runway(&self) -> Runway {
        let runway = Runway::new(self.id.clone(), self.tier);
        match self.length {
            Some(length) => runway.with_length(length),
            None => runway,
        }
    }
}

/// Delay thresholds, in ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayPolicy {
    /// A flight is canceled once its delay exceeds this
    pub auto_cancel_ticks: usize,
    /// A critical-delay failure is recorded once a flight's delay reaches this
    pub critical_delay_ticks: usize,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            auto_cancel_ticks: 30,
            critical_delay_ticks: 20,
        }
    }
}

/// Money flows outside landings
///
/// All monetary values in whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub opening_balance: i64,
    /// Ticks between passive income credits (0 disables)
    pub passive_income_interval: usize,
    pub passive_income_per_interval: i64,
    /// Charged per registered runway at every end of day
    pub upkeep_per_runway: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            opening_balance: 10_000,
            passive_income_interval: 10,
            passive_income_per_interval: 100,
            upkeep_per_runway: 250,
        }
    }
}

/// Complete airport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirportConfig {
    pub name: String,
    /// Short code shown in snapshots (e.g. an IATA-style code)
    pub identifier: String,

    /// RNG seed for deterministic simulation
    pub rng_seed: u64,

    /// Number of ticks per operating day
    pub ticks_per_day: usize,

    pub runways: Vec<RunwaySpec>,
    pub arrivals: ArrivalConfig,
    pub dispatch_mode: DispatchMode,
    pub dispatch: DispatchConfig,
    pub wear: WearConfig,
    pub revenue: RevenueRates,
    pub failure_thresholds: FailureThresholds,
    pub delay_policy: DelayPolicy,
    /// Ticks an emergency flight has to be handled in
    pub emergency_window: usize,
    pub economy: EconomyConfig,
    pub weather: WeatherConfig,
    pub progression: ProgressionConfig,
    pub scenario_events: Vec<ScheduledEvent>,

    /// Ticks a landed or canceled flight stays queryable after its
    /// original scheduled tick
    pub completed_retention_ticks: usize,
}

impl Default for AirportConfig {
    fn default() -> Self {
        Self {
            name: "Simulated International".to_string(),
            identifier: "SIM".to_string(),
            rng_seed: 42,
            ticks_per_day: 100,
            runways: vec![
                RunwaySpec::new("09L", RunwayTier::Medium),
                RunwaySpec::new("27R", RunwayTier::Large),
            ],
            arrivals: ArrivalConfig::default(),
            dispatch_mode: DispatchMode::Automatic,
            dispatch: DispatchConfig::default(),
            wear: WearConfig::default(),
            revenue: RevenueRates::default(),
            failure_thresholds: FailureThresholds::default(),
            delay_policy: DelayPolicy::default(),
            emergency_window: DEFAULT_EMERGENCY_WINDOW,
            economy: EconomyConfig::default(),
            weather: WeatherConfig::default(),
            progression: ProgressionConfig::default(),
            scenario_events: Vec::new(),
            completed_retention_ticks: 200,
        }
    }
}

impl AirportConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| {
            SimulationError::SerializationError(format!("Config parse failed: {}", e))
        })
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SimulationError::SerializationError(format!("Config serialization failed: {}", e))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.ticks_per_day == 0 {
            return Err(invalid("ticks_per_day must be > 0"));
        }

        // Check for duplicate runway IDs
        let mut ids = HashSet::new();
        for runway in &self.runways {
            if runway.id.trim().is_empty() {
                return Err(invalid("runway id must not be empty"));
            }
            if !ids.insert(runway.id.as_str()) {
                return Err(invalid(format!("Duplicate runway ID: {}", runway.id)));
            }
            if runway.length == Some(0) {
                return Err(invalid(format!("Runway {} has zero length", runway.id)));
            }
        }

        let arrivals = &self.arrivals;
        if !(arrivals.rate_per_tick.is_finite() && arrivals.rate_per_tick >= 0.0) {
            return Err(invalid("arrivals.rate_per_tick must be finite and >= 0"));
        }
        if arrivals
            .category_weights
            .as_array()
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(invalid("arrivals.category_weights must be finite and >= 0"));
        }
        if arrivals.lead_time_range.0 < MIN_LEAD_TIME {
            return Err(invalid(format!(
                "arrivals.lead_time_range min must be >= {}",
                MIN_LEAD_TIME
            )));
        }
        if arrivals.lead_time_range.0 > arrivals.lead_time_range.1 {
            return Err(invalid("arrivals.lead_time_range min exceeds max"));
        }

        if self.dispatch.landing_duration == 0 {
            return Err(invalid("dispatch.landing_duration must be > 0"));
        }
        if self.dispatch.retry_delay == 0 || self.dispatch.manual_delay == 0 {
            return Err(invalid("dispatch delays must be > 0"));
        }

        if self.wear.full_degradation_threshold == 0 || self.wear.full_degradation_threshold > 100 {
            return Err(invalid("wear.full_degradation_threshold must be in 1..=100"));
        }
        if self.wear.repair_duration == 0 {
            return Err(invalid("wear.repair_duration must be > 0"));
        }
        if self.wear.repair_base_rate < 0 {
            return Err(invalid("wear.repair_base_rate must be >= 0"));
        }
        if !(self.wear.heavy_wear_multiplier.is_finite() && self.wear.heavy_wear_multiplier > 0.0) {
            return Err(invalid("wear.heavy_wear_multiplier must be positive"));
        }

        let rates = &self.revenue;
        if !(0.0..=1.0).contains(&rates.penalty_per_period) || !(0.0..=1.0).contains(&rates.max_penalty)
        {
            return Err(invalid("revenue penalties must be within [0, 1]"));
        }
        if rates.max_penalty > 1.0 - MIN_DELAY_MULTIPLIER {
            return Err(invalid(format!(
                "revenue.max_penalty must keep the delay multiplier >= {}",
                MIN_DELAY_MULTIPLIER
            )));
        }
        if rates.ticks_per_penalty_period == 0 {
            return Err(invalid("revenue.ticks_per_penalty_period must be > 0"));
        }

        for category in FailureCategory::ALL {
            if self.failure_thresholds.for_category(category) == 0 {
                return Err(invalid(format!("failure threshold for {} must be > 0", category)));
            }
        }

        if self.delay_policy.critical_delay_ticks > self.delay_policy.auto_cancel_ticks {
            return Err(invalid(
                "delay_policy.critical_delay_ticks must not exceed auto_cancel_ticks",
            ));
        }
        if self.emergency_window == 0 {
            return Err(invalid("emergency_window must be > 0"));
        }

        if self.economy.passive_income_per_interval < 0 || self.economy.upkeep_per_runway < 0 {
            return Err(invalid("economy amounts must be >= 0"));
        }

        if self.weather.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("weather.weights must be finite and >= 0"));
        }

        if self.progression.xp_per_level == 0 {
            return Err(invalid("progression.xp_per_level must be > 0"));
        }
        let mut achievement_ids = HashSet::new();
        for achievement in &self.progression.achievements {
            if !achievement_ids.insert(achievement.id.as_str()) {
                return Err(invalid(format!("Duplicate achievement ID: {}", achievement.id)));
            }
            let factor_ok = match &achievement.reward {
                AchievementReward::GlobalRevenueModifier { factor, .. } => *factor > 0.0,
                AchievementReward::XpMultiplier { factor } => *factor > 0.0,
                AchievementReward::WeatherResistance { amount } => *amount >= 0.0,
                _ => true,
            };
            if !factor_ok {
                return Err(invalid(format!(
                    "Achievement {} has an invalid reward",
                    achievement.id
                )));
            }
        }

        for scheduled in &self.scenario_events {
            if let EventSchedule::Repeating { interval: 0, .. } = scheduled.schedule {
                return Err(invalid(format!(
                    "Scenario event {} repeats with interval 0",
                    scheduled.event.event_type()
                )));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> SimulationError {
    SimulationError::InvalidConfig(message.into())
}
