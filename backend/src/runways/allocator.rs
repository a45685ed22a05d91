//! Runway allocation and the wear model
//!
//! # Eligibility
//!
//! A runway can take a landing when all three hold:
//! - `aircraft.required_runway_length() <= runway.length()`
//! - the runway is not occupied
//! - `runway.wear() < full_degradation_threshold`
//!
//! Selection is deterministic: first match in registration order.
//!
//! # Wear
//!
//! ```text
//! effective_traffic = traffic_volume + weather_impact × (1 − weather_resistance)
//! increase          = base_increment + uniform[0, random_max] + ⌊effective_traffic / 10⌋
//! ```
//!
//! The increase is clamped so wear never passes 100.

use serde::{Deserialize, Serialize};

use crate::models::{Aircraft, OccupancyReason, Runway, RunwayError};
use crate::rng::RngManager;
use crate::runways::registry::RunwayRegistry;

/// Wear and repair parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WearConfig {
    /// Fixed wear added by every landing
    pub base_increment: u32,
    /// Upper bound of the random wear term (inclusive)
    pub random_max: u32,
    /// Wear at which the runway stops accepting landings
    pub full_degradation_threshold: u32,
    /// Ticks a blocking repair occupies the runway
    pub repair_duration: usize,
    /// Repair cost per point of wear
    pub repair_base_rate: i64,
    /// Wear at or above which repairs cost extra
    pub heavy_wear_threshold: u32,
    pub heavy_wear_multiplier: f64,
    /// Landings on a runway with wear below this are "perfect"
    pub perfect_landing_max_wear: u32,
}

impl Default for WearConfig {
    fn default() -> Self {
        Self {
            base_increment: 2,
            random_max: 3,
            full_degradation_threshold: 100,
            repair_duration: 5,
            repair_base_rate: 10,
            heavy_wear_threshold: 80,
            heavy_wear_multiplier: 1.3,
            perfect_landing_max_wear: 30,
        }
    }
}

/// Result of applying wear to one runway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WearOutcome {
    /// Wear actually added after clamping
    pub added: u32,
    /// Wear after the update
    pub wear: u32,
    /// This update pushed the runway to the full-degradation threshold
    pub newly_degraded: bool,
}

/// Selects and validates runways; applies wear and repairs
///
/// # Example
/// ```
/// use airport_simulator_core_rs::runways::{RunwayAllocator, RunwayRegistry, WearConfig};
/// use airport_simulator_core_rs::models::{Aircraft, Runway, RunwayTier, SizeClass};
///
/// let mut registry = RunwayRegistry::new();
/// registry.add(Runway::new("S1", RunwayTier::Small)).unwrap();
/// registry.add(Runway::new("L1", RunwayTier::Large)).unwrap();
///
/// let allocator = RunwayAllocator::new(WearConfig::default());
/// let jumbo = Aircraft::new("B744", SizeClass::Large, 300);
/// assert_eq!(allocator.available_runway(&registry, &jumbo).unwrap().id(), "L1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunwayAllocator {
    config: WearConfig,
}

impl RunwayAllocator {
    pub fn new(config: WearConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WearConfig {
        &self.config
    }

    pub fn is_eligible(&self, runway: &Runway, aircraft: &Aircraft) -> bool {
        runway.can_accept(aircraft, self.config.full_degradation_threshold)
    }

    /// True iff some runway can take `aircraft` right now
    pub fn can_land(&self, registry: &RunwayRegistry, aircraft: &Aircraft) -> bool {
        registry.iter().any(|r| self.is_eligible(r, aircraft))
    }

    /// First eligible runway in registration order
    pub fn available_runway<'a>(
        &self,
        registry: &'a RunwayRegistry,
        aircraft: &Aircraft,
    ) -> Option<&'a Runway> {
        registry.iter().find(|r| self.is_eligible(r, aircraft))
    }

    /// Every eligible runway in registration order
    pub fn available_runways<'a>(
        &self,
        registry: &'a RunwayRegistry,
        aircraft: &Aircraft,
    ) -> Vec<&'a Runway> {
        registry
            .iter()
            .filter(|r| self.is_eligible(r, aircraft))
            .collect()
    }

    /// Apply landing wear to `runway_id`
    pub fn apply_wear(
        &self,
        registry: &mut RunwayRegistry,
        runway_id: &str,
        weather_impact: f64,
        traffic_volume: u32,
        weather_resistance: f64,
        rng: &mut RngManager,
    ) -> Result<WearOutcome, RunwayError> {
        let runway = registry.require_mut(runway_id)?;
        let threshold = self.config.full_degradation_threshold;
        let was_degraded = runway.is_degraded(threshold);

        let resistance = weather_resistance.clamp(0.0, 1.0);
        let effective_weather = weather_impact.max(0.0) * (1.0 - resistance);
        let effective_traffic = f64::from(traffic_volume) + effective_weather;

        let random_term = rng.range_inclusive(0, i64::from(self.config.random_max)) as u32;
        let traffic_term = (effective_traffic / 10.0).floor() as u32;
        let increase = self.config.base_increment + random_term + traffic_term;

        let added = runway.add_wear(increase);
        let wear = runway.wear();
        tracing::trace!(runway_id, increase, added, wear, "wear applied");

        Ok(WearOutcome {
            added,
            wear,
            newly_degraded: !was_degraded && runway.is_degraded(threshold),
        })
    }

    /// Reset wear and close the runway for the repair duration
    pub fn repair(&self, registry: &mut RunwayRegistry, runway_id: &str) -> Result<(), RunwayError> {
        let runway = registry.require_mut(runway_id)?;
        if let Some(occupancy) = runway.occupancy() {
            return Err(RunwayError::Occupied {
                runway_id: runway_id.to_string(),
                reason: occupancy.reason,
            });
        }
        runway.reset_wear();
        runway.occupy(OccupancyReason::Repair, self.config.repair_duration.max(1), None)
    }

    /// Reset wear without blocking availability
    pub fn repair_in_place(
        &self,
        registry: &mut RunwayRegistry,
        runway_id: &str,
    ) -> Result<(), RunwayError> {
        registry.require_mut(runway_id)?.reset_wear();
        Ok(())
    }

    /// `wear × base_rate`, × heavy-wear multiplier at or above the heavy threshold
    pub fn repair_cost(&self, wear_level: u32) -> i64 {
        let cost = i64::from(wear_level) * self.config.repair_base_rate;
        if wear_level >= self.config.heavy_wear_threshold {
            (cost as f64 * self.config.heavy_wear_multiplier).round() as i64
        } else {
            cost
        }
    }
}
