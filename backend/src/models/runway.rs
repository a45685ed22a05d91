//! Runway model
//!
//! A runway is a physical resource with a length, a tier, a wear level and
//! an occupancy slot.
//!
//! # Invariants
//!
//! 1. `wear` is always within `[0, MAX_WEAR]`
//! 2. `wear` only decreases through `reset_wear` (repair)
//! 3. Occupancy reason, countdown and holder are set and cleared together
//!
//! Tiers are configuration, not types: one `Runway` struct parameterised by
//! [`RunwayTier`], with [`RunwayTier::defaults`] supplying per-tier values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::aircraft::Aircraft;
use crate::models::ParseError;

/// Upper bound of the wear scale
pub const MAX_WEAR: u32 = 100;

/// Capacity tier of a runway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunwayTier {
    Small,
    Medium,
    Large,
}

/// Per-tier default values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDefaults {
    /// Physical length in metres
    pub length: u32,
    /// Price charged when the runway is purchased
    pub purchase_cost: i64,
}

impl RunwayTier {
    pub fn defaults(self) -> TierDefaults {
        match self {
            RunwayTier::Small => TierDefaults {
                length: 1_500,
                purchase_cost: 5_000,
            },
            RunwayTier::Medium => TierDefaults {
                length: 2_500,
                purchase_cost: 15_000,
            },
            RunwayTier::Large => TierDefaults {
                length: 3_800,
                purchase_cost: 40_000,
            },
        }
    }
}

impl fmt::Display for RunwayTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunwayTier::Small => "small",
            RunwayTier::Medium => "medium",
            RunwayTier::Large => "large",
        };
        f.write_str(name)
    }
}

impl FromStr for RunwayTier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(RunwayTier::Small),
            "medium" => Ok(RunwayTier::Medium),
            "large" => Ok(RunwayTier::Large),
            other => Err(ParseError::UnknownTier(other.to_string())),
        }
    }
}

/// Why a runway is occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupancyReason {
    Landing,
    Repair,
    Maintenance,
    Emergency,
}

impl fmt::Display for OccupancyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OccupancyReason::Landing => "landing",
            OccupancyReason::Repair => "repair",
            OccupancyReason::Maintenance => "maintenance",
            OccupancyReason::Emergency => "emergency",
        };
        f.write_str(name)
    }
}

/// Current occupant of a runway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    pub reason: OccupancyReason,
    /// Ticks left before the runway frees up
    pub remaining_ticks: usize,
    /// Flight holding the runway, if any
    pub flight_number: Option<String>,
}

/// Errors raised by runway operations
#[derive(Debug, Error, PartialEq)]
pub enum RunwayError {
    #[error("Runway not found: {0}")]
    NotFound(String),

    #[error("Runway {0} is already registered")]
    DuplicateId(String),

    #[error("Runway {runway_id} is occupied ({reason})")]
    Occupied {
        runway_id: String,
        reason: OccupancyReason,
    },

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Occupancy duration must be at least one tick")]
    ZeroDuration,
}

/// A runway
///
/// # Example
/// ```
/// use airport_simulator_core_rs::models::{Runway, RunwayTier, OccupancyReason};
///
/// let mut runway = Runway::new("09L", RunwayTier::Medium);
/// assert_eq!(runway.length(), 2_500);
///
/// runway.occupy(OccupancyReason::Landing, 2, Some("AS100".to_string())).unwrap();
/// assert!(runway.is_occupied());
/// runway.update_status();
/// assert!(runway.update_status().is_some()); // freed on the second tick
/// assert!(!runway.is_occupied());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runway {
    id: String,
    tier: RunwayTier,
    length: u32,
    wear: u32,
    occupancy: Option<Occupancy>,
    landings: u64,
}

impl Runway {
    /// Create a runway with its tier's default length
    pub fn new(id: impl Into<String>, tier: RunwayTier) -> Self {
        Self {
            id: id.into(),
            tier,
            length: tier.defaults().length,
            wear: 0,
            occupancy: None,
            landings: 0,
        }
    }

    /// Override the tier's default length
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Start with a given wear level (clamped to the wear scale)
    pub fn with_wear(mut self, wear: u32) -> Self {
        self.wear = wear.min(MAX_WEAR);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tier(&self) -> RunwayTier {
        self.tier
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn wear(&self) -> u32 {
        self.wear
    }

    pub fn landings(&self) -> u64 {
        self.landings
    }

    pub fn occupancy(&self) -> Option<&Occupancy> {
        self.occupancy.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupancy.is_some()
    }

    pub fn is_long_enough(&self, aircraft: &Aircraft) -> bool {
        aircraft.required_runway_length() <= self.length
    }

    /// Wear has reached the point where the runway cannot take landings
    pub fn is_degraded(&self, full_degradation_threshold: u32) -> bool {
        self.wear >= full_degradation_threshold
    }

    /// Length, occupancy and wear all permit `aircraft` to land now
    pub fn can_accept(&self, aircraft: &Aircraft, full_degradation_threshold: u32) -> bool {
        self.is_long_enough(aircraft)
            && !self.is_occupied()
            && !self.is_degraded(full_degradation_threshold)
    }

    /// Occupy the runway for `duration` ticks
    pub fn occupy(
        &mut self,
        reason: OccupancyReason,
        duration: usize,
        flight_number: Option<String>,
    ) -> Result<(), RunwayError> {
        if duration == 0 {
            return Err(RunwayError::ZeroDuration);
        }
        if let Some(current) = &self.occupancy {
            return Err(RunwayError::Occupied {
                runway_id: self.id.clone(),
                reason: current.reason,
            });
        }

        if reason == OccupancyReason::Landing {
            self.landings += 1;
        }
        self.occupancy = Some(Occupancy {
            reason,
            remaining_ticks: duration,
            flight_number,
        });
        Ok(())
    }

    /// Add wear, clamped so the total never exceeds [`MAX_WEAR`].
    ///
    /// Returns the amount actually added.
    pub fn add_wear(&mut self, amount: u32) -> u32 {
        let added = amount.min(MAX_WEAR - self.wear);
        self.wear += added;
        added
    }

    /// Reset wear to zero (repair)
    pub fn reset_wear(&mut self) {
        self.wear = 0;
    }

    /// Count down occupancy by one tick.
    ///
    /// Returns the cleared occupancy when the countdown reaches zero.
    pub fn update_status(&mut self) -> Option<Occupancy> {
        let finished = match self.occupancy.as_mut() {
            Some(occupancy) => {
                occupancy.remaining_ticks = occupancy.remaining_ticks.saturating_sub(1);
                occupancy.remaining_ticks == 0
            }
            None => false,
        };

        if finished {
            self.occupancy.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::aircraft::SizeClass;

    #[test]
    fn test_wear_clamped_at_max() {
        let mut runway = Runway::new("R1", RunwayTier::Small).with_wear(95);
        assert_eq!(runway.add_wear(20), 5);
        assert_eq!(runway.wear(), MAX_WEAR);
        assert_eq!(runway.add_wear(3), 0);
    }

    #[test]
    fn test_occupy_twice_fails() {
        let mut runway = Runway::new("R1", RunwayTier::Small);
        runway.occupy(OccupancyReason::Repair, 3, None).unwrap();
        assert_eq!(
            runway.occupy(OccupancyReason::Landing, 1, None),
            Err(RunwayError::Occupied {
                runway_id: "R1".to_string(),
                reason: OccupancyReason::Repair,
            })
        );
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut runway = Runway::new("R1", RunwayTier::Small);
        assert_eq!(
            runway.occupy(OccupancyReason::Landing, 0, None),
            Err(RunwayError::ZeroDuration)
        );
    }

    #[test]
    fn test_countdown_clears_everything_together() {
        let mut runway = Runway::new("R1", RunwayTier::Large);
        runway
            .occupy(OccupancyReason::Landing, 1, Some("AS1".to_string()))
            .unwrap();
        let cleared = runway.update_status().unwrap();
        assert_eq!(cleared.flight_number.as_deref(), Some("AS1"));
        assert!(runway.occupancy().is_none());
        assert_eq!(runway.landings(), 1);
    }

    #[test]
    fn test_can_accept_checks_all_three_conditions() {
        let heavy = Aircraft::new("B744", SizeClass::Large, 300);
        let short = Runway::new("S", RunwayTier::Small);
        assert!(!short.can_accept(&heavy, 100));

        let long = Runway::new("L", RunwayTier::Large);
        assert!(long.can_accept(&heavy, 100));

        let worn = Runway::new("W", RunwayTier::Large).with_wear(100);
        assert!(!worn.can_accept(&heavy, 100));
    }
}
