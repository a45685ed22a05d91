//! Domain models for the airport simulator

pub mod account;
pub mod aircraft;
pub mod event;
pub mod flight;
pub mod runway;

use thiserror::Error;

/// Errors raised when parsing domain identifiers from text
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Unknown flight category: {0}")]
    UnknownCategory(String),

    #[error("Unknown priority tier: {0}")]
    UnknownPriority(String),

    #[error("Unknown runway tier: {0}")]
    UnknownTier(String),

    #[error("Unknown aircraft size class: {0}")]
    UnknownSizeClass(String),

    #[error("Unknown failure category: {0}")]
    UnknownFailureCategory(String),

    #[error("Unknown weather condition: {0}")]
    UnknownWeather(String),
}

// Re-exports
pub use account::{Account, AccountError, TransactionKind, TransactionRecord};
pub use aircraft::{Aircraft, SizeClass};
pub use event::{DelayReason, Event, EventLog};
pub use flight::{CancelReason, Flight, FlightCategory, FlightError, FlightStatus, PriorityTier};
pub use runway::{Occupancy, OccupancyReason, Runway, RunwayError, RunwayTier, TierDefaults, MAX_WEAR};
