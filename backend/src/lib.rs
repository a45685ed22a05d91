//! Airport Simulator Core - Rust Engine
//!
//! Tick-driven airport operations simulator with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Tick counter, operating days and the real-time clock
//! - **models**: Domain types (Flight, Aircraft, Runway, Account, Event)
//! - **schedule**: Time-indexed flight queue
//! - **runways**: Runway registry, allocation and wear model
//! - **dispatch**: Landing dispatcher and manual runway selectors
//! - **revenue**: Base fare, delay penalty, bonuses and multipliers
//! - **failure**: Failure ledger and game-over state machine
//! - **emergency**: Emergency response deadlines
//! - **progression**: Experience, levels and achievements
//! - **arrivals**: Deterministic flight generation
//! - **weather**: Weather conditions feeding runway wear
//! - **events**: Scheduled scenario events
//! - **sink**: Outbound event/transaction sinks
//! - **orchestrator**: Main simulation loop
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (whole currency units)
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Landed and canceled flights are never mutated again

// Module declarations
pub mod arrivals;
pub mod core;
pub mod dispatch;
pub mod emergency;
pub mod events;
pub mod failure;
pub mod models;
pub mod orchestrator;
pub mod progression;
pub mod revenue;
pub mod rng;
pub mod runways;
pub mod schedule;
pub mod sink;
pub mod weather;

// Re-exports for convenience
pub use arrivals::{ArrivalConfig, FlightGenerator};
pub use core::{ClockHandle, SimulationClock, TimeManager};
pub use dispatch::{DispatchMode, LandingDispatcher, RunwayChoice, RunwaySelector};
pub use failure::{FailureCategory, FailureTracker};
pub use models::{
    Account, Aircraft, Event, EventLog, Flight, FlightCategory, FlightStatus, Runway, RunwayTier,
    SizeClass,
};
pub use orchestrator::{
    AirportConfig, AirportObserver, AirportSnapshot, Notification, Orchestrator, SimulationError,
    TickResult,
};
pub use rng::RngManager;
pub use runways::{RunwayAllocator, RunwayRegistry};
pub use schedule::FlightScheduler;
pub use sink::{EventSink, MemorySink, TracingSink};
