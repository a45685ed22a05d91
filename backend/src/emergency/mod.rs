//! Emergency deadline tracking
//!
//! Emergency flights must be landed (or otherwise handled) within a fixed
//! response window counted in ticks. The tracker is independent of the
//! flight scheduler: it only knows flight numbers and deadlines, and tells
//! the orchestrator which flights expired so they can be canceled and the
//! miss recorded as a failure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Flight;

/// Default response window in ticks
pub const DEFAULT_EMERGENCY_WINDOW: usize = 20;

/// One active emergency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyRecord {
    pub flight_number: String,
    pub detected_tick: usize,
    pub deadline: usize,
}

/// Why a registration was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered { deadline: usize },
    /// Flight is not flagged as an emergency
    NotEmergency,
    /// An active record already exists for this flight
    AlreadyTracked,
}

/// Tracks response deadlines for emergency flights
///
/// # Example
/// ```
/// use airport_simulator_core_rs::emergency::EmergencyTracker;
/// use airport_simulator_core_rs::models::{Aircraft, Flight, FlightCategory, SizeClass};
///
/// let mut tracker = EmergencyTracker::new(20);
/// let flight = Flight::new("MD7", Aircraft::new("B738", SizeClass::Medium, 70),
///     FlightCategory::Emergency, 120, 100);
/// tracker.register(&flight, 100);
///
/// assert!(tracker.process_emergencies(120).is_empty());
/// let expired = tracker.process_emergencies(121);
/// assert_eq!(expired[0].flight_number, "MD7");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmergencyTracker {
    window: usize,
    /// Keyed by flight number; ordered so expiry processing is deterministic
    records: BTreeMap<String, EmergencyRecord>,
}

impl EmergencyTracker {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            records: BTreeMap::new(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Start the response clock for an emergency flight detected at `tick`
    pub fn register(&mut self, flight: &Flight, tick: usize) -> RegisterOutcome {
        if !flight.is_emergency() {
            return RegisterOutcome::NotEmergency;
        }
        if self.records.contains_key(flight.flight_number()) {
            return RegisterOutcome::AlreadyTracked;
        }

        let deadline = tick + self.window;
        self.records.insert(
            flight.flight_number().to_string(),
            EmergencyRecord {
                flight_number: flight.flight_number().to_string(),
                detected_tick: tick,
                deadline,
            },
        );
        RegisterOutcome::Registered { deadline }
    }

    /// Remove and return every record whose deadline is before `tick`.
    ///
    /// Results are ordered by deadline, then flight number.
    pub fn process_emergencies(&mut self, tick: usize) -> Vec<EmergencyRecord> {
        let expired_keys: Vec<String> = self
            .records
            .values()
            .filter(|record| record.deadline < tick)
            .map(|record| record.flight_number.clone())
            .collect();

        let mut expired: Vec<EmergencyRecord> = expired_keys
            .iter()
            .filter_map(|key| self.records.remove(key))
            .collect();
        expired.sort_by(|a, b| {
            a.deadline
                .cmp(&b.deadline)
                .then_with(|| a.flight_number.cmp(&b.flight_number))
        });
        expired
    }

    /// Remove the record for a handled flight. Returns it if one was active.
    pub fn mark_handled(&mut self, flight_number: &str) -> Option<EmergencyRecord> {
        self.records.remove(flight_number)
    }

    pub fn is_tracked(&self, flight_number: &str) -> bool {
        self.records.contains_key(flight_number)
    }

    pub fn get(&self, flight_number: &str) -> Option<&EmergencyRecord> {
        self.records.get(flight_number)
    }

    pub fn active(&self) -> impl Iterator<Item = &EmergencyRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aircraft, FlightCategory, SizeClass};

    fn flight(number: &str, category: FlightCategory) -> Flight {
        Flight::new(number, Aircraft::new("A320", SizeClass::Medium, 70), category, 100, 0)
    }

    #[test]
    fn test_non_emergency_is_refused() {
        let mut tracker = EmergencyTracker::new(20);
        let outcome = tracker.register(&flight("AS1", FlightCategory::Commercial), 0);
        assert_eq!(outcome, RegisterOutcome::NotEmergency);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_duplicate_registration_is_refused() {
        let mut tracker = EmergencyTracker::new(20);
        let md = flight("MD1", FlightCategory::Emergency);
        assert_eq!(tracker.register(&md, 5), RegisterOutcome::Registered { deadline: 25 });
        assert_eq!(tracker.register(&md, 9), RegisterOutcome::AlreadyTracked);
        assert_eq!(tracker.get("MD1").unwrap().deadline, 25);
    }

    #[test]
    fn test_mark_handled_removes_record() {
        let mut tracker = EmergencyTracker::new(20);
        tracker.register(&flight("MD1", FlightCategory::Emergency), 0);
        assert!(tracker.mark_handled("MD1").is_some());
        assert!(tracker.mark_handled("MD1").is_none());
        assert!(tracker.process_emergencies(100).is_empty());
    }
}
