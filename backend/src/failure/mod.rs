//! Failure tracking and the game-over condition
//!
//! Operational failures are counted per category. When any category's count
//! reaches its threshold the tracker moves from `Normal` to
//! `GameOver(category)`. The transition is one-way and reported exactly
//! once; later failures are still counted but never re-trigger it.
//!
//! | Category                  | Default threshold |
//! |---------------------------|-------------------|
//! | emergency-response-miss   | 3                 |
//! | runway-closure            | 5                 |
//! | critical-delay            | 10                |
//! | flight-cancellation       | 7                 |
//! | financial-shortfall       | 3                 |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::models::ParseError;

/// Failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailureCategory {
    EmergencyResponseMiss,
    RunwayClosure,
    CriticalDelay,
    FlightCancellation,
    FinancialShortfall,
}

impl FailureCategory {
    pub const ALL: [FailureCategory; 5] = [
        FailureCategory::EmergencyResponseMiss,
        FailureCategory::RunwayClosure,
        FailureCategory::CriticalDelay,
        FailureCategory::FlightCancellation,
        FailureCategory::FinancialShortfall,
    ];

    /// Human-readable reason shown when this category ends the game
    pub fn game_over_reason(self) -> &'static str {
        match self {
            FailureCategory::EmergencyResponseMiss => {
                "Too many emergency flights were not handled in time"
            }
            FailureCategory::RunwayClosure => "Too many runways were worn out and closed",
            FailureCategory::CriticalDelay => "Too many flights suffered critical delays",
            FailureCategory::FlightCancellation => "Too many flights were canceled",
            FailureCategory::FinancialShortfall => "The airport ran out of money too often",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureCategory::EmergencyResponseMiss => "emergency-response-miss",
            FailureCategory::RunwayClosure => "runway-closure",
            FailureCategory::CriticalDelay => "critical-delay",
            FailureCategory::FlightCancellation => "flight-cancellation",
            FailureCategory::FinancialShortfall => "financial-shortfall",
        };
        f.write_str(name)
    }
}

impl FromStr for FailureCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FailureCategory::ALL
            .into_iter()
            .find(|c| c.to_string() == s.trim())
            .ok_or_else(|| ParseError::UnknownFailureCategory(s.to_string()))
    }
}

/// Threshold per failure category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureThresholds {
    pub emergency_response_miss: u32,
    pub runway_closure: u32,
    pub critical_delay: u32,
    pub flight_cancellation: u32,
    pub financial_shortfall: u32,
}

impl Default for FailureThresholds {
    fn default() -> Self {
        Self {
            emergency_response_miss: 3,
            runway_closure: 5,
            critical_delay: 10,
            flight_cancellation: 7,
            financial_shortfall: 3,
        }
    }
}

impl FailureThresholds {
    pub fn for_category(&self, category: FailureCategory) -> u32 {
        match category {
            FailureCategory::EmergencyResponseMiss => self.emergency_response_miss,
            FailureCategory::RunwayClosure => self.runway_closure,
            FailureCategory::CriticalDelay => self.critical_delay,
            FailureCategory::FlightCancellation => self.flight_cancellation,
            FailureCategory::FinancialShortfall => self.financial_shortfall,
        }
    }
}

/// Tracker state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureState {
    Normal,
    GameOver {
        category: FailureCategory,
        tick: usize,
    },
}

/// Result of one `record_failure` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureOutcome {
    pub category: FailureCategory,
    /// Count for the category after this failure
    pub count: u32,
    pub threshold: u32,
    /// True only on the call that moved the tracker into game over
    pub triggered_game_over: bool,
}

/// Receives the one-time game-over notification
pub trait GameOverObserver {
    fn on_game_over(&mut self, category: FailureCategory, reason: &str, tick: usize);
}

/// Per-category failure counter with a terminal game-over state
///
/// # Example
/// ```
/// use airport_simulator_core_rs::failure::{FailureCategory, FailureThresholds, FailureTracker};
///
/// let mut tracker = FailureTracker::new(FailureThresholds::default());
/// for _ in 0..2 {
///     let outcome = tracker.record_failure(FailureCategory::FinancialShortfall, "overdrawn", 5);
///     assert!(!outcome.triggered_game_over);
/// }
/// let third = tracker.record_failure(FailureCategory::FinancialShortfall, "overdrawn", 6);
/// assert!(third.triggered_game_over);
/// assert!(tracker.is_game_over());
/// ```
pub struct FailureTracker {
    thresholds: FailureThresholds,
    counts: BTreeMap<FailureCategory, u32>,
    state: FailureState,
    observers: Vec<Box<dyn GameOverObserver>>,
}

impl FailureTracker {
    pub fn new(thresholds: FailureThresholds) -> Self {
        Self {
            thresholds,
            counts: FailureCategory::ALL.iter().map(|c| (*c, 0)).collect(),
            state: FailureState::Normal,
            observers: Vec::new(),
        }
    }

    /// Register an observer for the game-over notification
    pub fn subscribe(&mut self, observer: Box<dyn GameOverObserver>) {
        self.observers.push(observer);
    }

    /// Count one failure; trigger game over on the threshold-th call
    pub fn record_failure(
        &mut self,
        category: FailureCategory,
        details: &str,
        tick: usize,
    ) -> FailureOutcome {
        let threshold = self.thresholds.for_category(category);
        let count = {
            let entry = self.counts.entry(category).or_insert(0);
            *entry += 1;
            *entry
        };

        let triggered_game_over = self.state == FailureState::Normal && count >= threshold;
        if triggered_game_over {
            self.state = FailureState::GameOver { category, tick };
            tracing::warn!(%category, count, threshold, tick, details, "game over");
            let reason = category.game_over_reason();
            for observer in self.observers.iter_mut() {
                observer.on_game_over(category, reason, tick);
            }
        } else {
            tracing::debug!(%category, count, threshold, tick, details, "failure recorded");
        }

        FailureOutcome {
            category,
            count,
            threshold,
            triggered_game_over,
        }
    }

    pub fn count(&self, category: FailureCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Read-only view of all counts, ordered by category
    pub fn counts(&self) -> &BTreeMap<FailureCategory, u32> {
        &self.counts
    }

    pub fn thresholds(&self) -> &FailureThresholds {
        &self.thresholds
    }

    pub fn state(&self) -> &FailureState {
        &self.state
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.state, FailureState::GameOver { .. })
    }

    /// Category and human-readable reason, once the game is over
    pub fn game_over_reason(&self) -> Option<(FailureCategory, &'static str)> {
        match self.state {
            FailureState::GameOver { category, .. } => Some((category, category.game_over_reason())),
            FailureState::Normal => None,
        }
    }

    /// Restore counts and state from a snapshot (observers are kept)
    pub fn restore(&mut self, counts: BTreeMap<FailureCategory, u32>, state: FailureState) {
        self.counts = FailureCategory::ALL
            .iter()
            .map(|c| (*c, counts.get(c).copied().unwrap_or(0)))
            .collect();
        self.state = state;
    }
}

impl fmt::Debug for FailureTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureTracker")
            .field("thresholds", &self.thresholds)
            .field("counts", &self.counts)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_text() {
        for category in FailureCategory::ALL {
            assert_eq!(category.to_string().parse::<FailureCategory>().unwrap(), category);
        }
        assert!("meteor-strike".parse::<FailureCategory>().is_err());
    }

    #[test]
    fn test_categories_are_independent() {
        let mut tracker = FailureTracker::new(FailureThresholds::default());
        tracker.record_failure(FailureCategory::RunwayClosure, "R1", 1);
        tracker.record_failure(FailureCategory::CriticalDelay, "AS1", 1);
        assert_eq!(tracker.count(FailureCategory::RunwayClosure), 1);
        assert_eq!(tracker.count(FailureCategory::CriticalDelay), 1);
        assert_eq!(tracker.count(FailureCategory::FinancialShortfall), 0);
        assert!(!tracker.is_game_over());
    }
}
