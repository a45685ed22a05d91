//! Arrival generation module for deterministic flight creation.
//!
//! This module creates new flights according to configured distributions.
//! All generation is deterministic based on the RNG seed.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same flights
//! 2. **Poisson Arrivals**: Flight count per tick follows a Poisson distribution
//! 3. **Weighted Categories**: Commercial/Cargo/VIP/Emergency picked by weight
//! 4. **Unique Numbers**: `<airline prefix><sequence>`, never reused
//!
//! # Example
//!
//! ```
//! use airport_simulator_core_rs::arrivals::{ArrivalConfig, FlightGenerator};
//! use airport_simulator_core_rs::rng::RngManager;
//!
//! let mut rng = RngManager::new(42);
//! let mut generator = FlightGenerator::new(ArrivalConfig {
//!     rate_per_tick: 3.0,
//!     ..ArrivalConfig::default()
//! });
//! let flights = generator.generate(0, &mut rng);
//! for flight in &flights {
//!     assert!(flight.scheduled_tick() >= 5);
//!     assert!(flight.flight_number().starts_with("AS"));
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{Aircraft, Flight, FlightCategory, SizeClass};
use crate::rng::RngManager;

/// Relative weight of each flight category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub commercial: f64,
    pub cargo: f64,
    pub vip: f64,
    pub emergency: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            commercial: 0.60,
            cargo: 0.25,
            vip: 0.10,
            emergency: 0.05,
        }
    }
}

impl CategoryWeights {
    /// Weights in [`FlightCategory::ALL`] order
    pub fn as_array(&self) -> [f64; 4] {
        [self.commercial, self.cargo, self.vip, self.emergency]
    }
}

/// Shortest gap between creating a flight and its scheduled landing.
///
/// Flights are created after the tick's dispatch step has run, so a flight
/// keyed at the creating tick would first be seen one tick late.
pub const MIN_LEAD_TIME: usize = 1;

/// Configuration for flight arrivals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Expected number of new flights per tick (Poisson λ parameter)
    pub rate_per_tick: f64,

    pub category_weights: CategoryWeights,

    /// Ticks between creation and scheduled landing (min, max), inclusive;
    /// the minimum must be at least [`MIN_LEAD_TIME`]
    pub lead_time_range: (usize, usize),

    pub airline_prefix: String,

    /// Passenger (or freight unit) ranges per category, inclusive
    pub commercial_passengers: (u32, u32),
    pub cargo_units: (u32, u32),
    pub vip_passengers: (u32, u32),
    pub emergency_passengers: (u32, u32),
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            rate_per_tick: 0.3,
            category_weights: CategoryWeights::default(),
            lead_time_range: (5, 15),
            airline_prefix: "AS".to_string(),
            commercial_passengers: (50, 200),
            cargo_units: (10, 80),
            vip_passengers: (2, 20),
            emergency_passengers: (1, 150),
        }
    }
}

impl ArrivalConfig {
    pub fn passenger_range(&self, category: FlightCategory) -> (u32, u32) {
        match category {
            FlightCategory::Commercial => self.commercial_passengers,
            FlightCategory::Cargo => self.cargo_units,
            FlightCategory::Vip => self.vip_passengers,
            FlightCategory::Emergency => self.emergency_passengers,
        }
    }
}

/// Aircraft size weights per category, in [`SizeClass::ALL`] order
fn size_weights(category: FlightCategory) -> [f64; 3] {
    match category {
        FlightCategory::Commercial => [0.15, 0.60, 0.25],
        FlightCategory::Cargo => [0.05, 0.35, 0.60],
        FlightCategory::Vip => [0.70, 0.30, 0.0],
        FlightCategory::Emergency => [0.40, 0.40, 0.20],
    }
}

fn type_codes(size: SizeClass) -> &'static [&'static str] {
    match size {
        SizeClass::Small => &["C172", "PC12", "C25A"],
        SizeClass::Medium => &["A320", "B738", "E190"],
        SizeClass::Large => &["B77W", "A359", "B744"],
    }
}

/// Generator for flight arrivals.
#[derive(Debug, Clone)]
pub struct FlightGenerator {
    config: ArrivalConfig,

    /// Next sequence number for flight numbers
    next_sequence: u64,
}

impl FlightGenerator {
    pub fn new(config: ArrivalConfig) -> Self {
        Self {
            config,
            next_sequence: 1,
        }
    }

    pub fn config(&self) -> &ArrivalConfig {
        &self.config
    }

    /// Sequence number the next flight will get
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Generate this tick's arrivals.
    ///
    /// The number of flights is Poisson-distributed; each one gets a
    /// weighted category and lands `lead_time_range` ticks from `tick`.
    pub fn generate(&mut self, tick: usize, rng: &mut RngManager) -> Vec<Flight> {
        let count = rng.poisson(self.config.rate_per_tick);
        (0..count)
            .map(|_| {
                let category = self.sample_category(rng);
                self.create_flight(category, tick, rng)
            })
            .collect()
    }

    /// Create one flight of `category` scheduled from `tick`
    pub fn create_flight(
        &mut self,
        category: FlightCategory,
        tick: usize,
        rng: &mut RngManager,
    ) -> Flight {
        let aircraft = self.sample_aircraft(category, rng);

        let (min_pax, max_pax) = self.config.passenger_range(category);
        let passengers = rng.range_inclusive(i64::from(min_pax), i64::from(max_pax.max(min_pax))) as u32;

        let (min_lead, max_lead) = self.config.lead_time_range;
        let lead = rng.range_inclusive(min_lead as i64, max_lead.max(min_lead) as i64) as usize;

        Flight::new(
            self.next_flight_number(),
            aircraft,
            category,
            passengers,
            tick + lead.max(MIN_LEAD_TIME),
        )
    }

    /// Reserve the next unique flight number
    pub fn next_flight_number(&mut self) -> String {
        let number = format!("{}{}", self.config.airline_prefix, self.next_sequence);
        self.next_sequence += 1;
        number
    }

    fn sample_category(&self, rng: &mut RngManager) -> FlightCategory {
        rng.weighted_index(&self.config.category_weights.as_array())
            .map(|i| FlightCategory::ALL[i])
            .unwrap_or(FlightCategory::Commercial)
    }

    fn sample_aircraft(&self, category: FlightCategory, rng: &mut RngManager) -> Aircraft {
        let size = rng
            .weighted_index(&size_weights(category))
            .map(|i| SizeClass::ALL[i])
            .unwrap_or(SizeClass::Medium);

        let (min_w, max_w) = size.weight_range();
        let weight = rng.range_inclusive(i64::from(min_w), i64::from(max_w)) as u32;

        let codes = type_codes(size);
        let code = codes[rng.range(0, codes.len() as i64) as usize];
        Aircraft::new(code, size, weight)
    }
}
