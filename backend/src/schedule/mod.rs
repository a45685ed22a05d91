//! Flight scheduler (time-indexed queue)
//!
//! Flights are stored in buckets keyed by the tick they were scheduled for.
//! Within a bucket, insertion order is preserved. A flight stays in its
//! bucket when it is delayed; its own `scheduled_tick` moves instead, and
//! [`FlightScheduler::due_flight_numbers`] reads that.
//!
//! # Ordering
//!
//! Every query that spans buckets walks them in ascending tick order, then
//! insertion order inside a bucket. Nothing is ever dropped implicitly:
//! terminal flights leave only through [`FlightScheduler::prune_terminal`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::models::Flight;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("Flight {0} is already scheduled")]
    DuplicateFlight(String),

    #[error("Flight {0} is not scheduled")]
    UnknownFlight(String),
}

/// Time-indexed store of all tracked flights
///
/// # Example
/// ```
/// use airport_simulator_core_rs::schedule::FlightScheduler;
/// use airport_simulator_core_rs::models::{Aircraft, Flight, FlightCategory, SizeClass};
///
/// let mut scheduler = FlightScheduler::new();
/// let aircraft = Aircraft::new("A320", SizeClass::Medium, 70);
/// scheduler
///     .schedule_flight(Flight::new("AS1", aircraft.clone(), FlightCategory::Commercial, 120, 5), 5)
///     .unwrap();
/// scheduler
///     .schedule_flight(Flight::new("AS2", aircraft, FlightCategory::Commercial, 90, 5), 5)
///     .unwrap();
///
/// let at_five: Vec<_> = scheduler.flights_at_tick(5).iter().map(|f| f.flight_number()).collect();
/// assert_eq!(at_five, vec!["AS1", "AS2"]);
/// assert!(scheduler.flights_at_tick(6).is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightScheduler {
    /// Scheduled tick → flights in insertion order
    by_tick: BTreeMap<usize, Vec<Flight>>,

    /// Flight number → bucket key
    index: HashMap<String, usize>,
}

impl FlightScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `flight` into the bucket for `tick`
    pub fn schedule_flight(&mut self, flight: Flight, tick: usize) -> Result<(), ScheduleError> {
        if self.index.contains_key(flight.flight_number()) {
            return Err(ScheduleError::DuplicateFlight(flight.flight_number().to_string()));
        }
        self.index.insert(flight.flight_number().to_string(), tick);
        self.by_tick.entry(tick).or_default().push(flight);
        Ok(())
    }

    /// Flights keyed at `tick`, in insertion order; tracking is unchanged
    pub fn flights_at_tick(&self, tick: usize) -> Vec<&Flight> {
        self.by_tick
            .get(&tick)
            .map(|flights| flights.iter().collect())
            .unwrap_or_default()
    }

    /// Every flight that is neither landed nor canceled
    pub fn unlanded_flights(&self) -> Vec<&Flight> {
        self.iter().filter(|f| !f.is_terminal()).collect()
    }

    /// Unlanded flights whose current scheduled tick is at or before `now`.
    ///
    /// Returned as flight numbers so the caller can mutate flights one at a
    /// time while walking the list.
    pub fn due_flight_numbers(&self, now: usize) -> Vec<String> {
        self.iter()
            .filter(|f| f.is_due(now))
            .map(|f| f.flight_number().to_string())
            .collect()
    }

    pub fn get(&self, flight_number: &str) -> Option<&Flight> {
        let tick = self.index.get(flight_number)?;
        self.by_tick
            .get(tick)?
            .iter()
            .find(|f| f.flight_number() == flight_number)
    }

    pub fn get_mut(&mut self, flight_number: &str) -> Option<&mut Flight> {
        let tick = self.index.get(flight_number)?;
        self.by_tick
            .get_mut(tick)?
            .iter_mut()
            .find(|f| f.flight_number() == flight_number)
    }

    pub fn require_mut(&mut self, flight_number: &str) -> Result<&mut Flight, ScheduleError> {
        self.get_mut(flight_number)
            .ok_or_else(|| ScheduleError::UnknownFlight(flight_number.to_string()))
    }

    pub fn contains(&self, flight_number: &str) -> bool {
        self.index.contains_key(flight_number)
    }

    /// All tracked flights, by tick then insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Flight> {
        self.by_tick.values().flatten()
    }

    /// Number of tracked flights, terminal ones included
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of flights still airborne
    pub fn airborne_count(&self) -> usize {
        self.iter().filter(|f| !f.is_terminal()).count()
    }

    /// Drop terminal flights keyed strictly before `before_tick`.
    ///
    /// Returns how many were removed. Airborne flights are never touched.
    pub fn prune_terminal(&mut self, before_tick: usize) -> usize {
        let mut removed = 0;
        let index = &mut self.index;
        self.by_tick.retain(|&tick, flights| {
            if tick >= before_tick {
                return true;
            }
            flights.retain(|flight| {
                if flight.is_terminal() {
                    index.remove(flight.flight_number());
                    removed += 1;
                    false
                } else {
                    true
                }
            });
            !flights.is_empty()
        });
        removed
    }
}
