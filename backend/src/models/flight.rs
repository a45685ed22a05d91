//! Flight model
//!
//! One aircraft's landing lifecycle and its delay accounting.
//!
//! Lifecycle:
//! - `Scheduled` → `Delayed` (any number of times) → `Landed` | `Canceled`
//! - `Landed` and `Canceled` are terminal: once reached, no further change to
//!   the status, the scheduled tick, or the delay figure is accepted.
//!
//! Delay accounting:
//! - `delay = (scheduled_tick - original_scheduled_tick) + overrun`
//! - `overrun = now - scheduled_tick` while the aircraft is overdue and still airborne
//! - the figure is frozen at the moment the flight reaches a terminal status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::aircraft::Aircraft;
use crate::models::ParseError;

/// Flight category, which fixes the base fare and default priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlightCategory {
    Commercial,
    Cargo,
    Vip,
    Emergency,
}

impl FlightCategory {
    pub const ALL: [FlightCategory; 4] = [
        FlightCategory::Commercial,
        FlightCategory::Cargo,
        FlightCategory::Vip,
        FlightCategory::Emergency,
    ];

    pub fn default_priority(self) -> PriorityTier {
        match self {
            FlightCategory::Cargo => PriorityTier::Low,
            FlightCategory::Commercial => PriorityTier::Normal,
            FlightCategory::Vip => PriorityTier::High,
            FlightCategory::Emergency => PriorityTier::Critical,
        }
    }
}

impl fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightCategory::Commercial => "commercial",
            FlightCategory::Cargo => "cargo",
            FlightCategory::Vip => "vip",
            FlightCategory::Emergency => "emergency",
        };
        f.write_str(name)
    }
}

impl FromStr for FlightCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commercial" => Ok(FlightCategory::Commercial),
            "cargo" => Ok(FlightCategory::Cargo),
            "vip" => Ok(FlightCategory::Vip),
            "emergency" => Ok(FlightCategory::Emergency),
            other => Err(ParseError::UnknownCategory(other.to_string())),
        }
    }
}

/// Priority tier (higher = more urgent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityTier {
    Low,
    Normal,
    High,
    Critical,
}

impl FromStr for PriorityTier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PriorityTier::Low),
            "normal" => Ok(PriorityTier::Normal),
            "high" => Ok(PriorityTier::High),
            "critical" => Ok(PriorityTier::Critical),
            other => Err(ParseError::UnknownPriority(other.to_string())),
        }
    }
}

/// Why a flight was canceled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReason {
    /// Cumulative delay crossed the auto-cancel threshold
    DelayThreshold,
    /// Emergency response window expired before the flight was handled
    EmergencyExpired,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::DelayThreshold => f.write_str("delay threshold exceeded"),
            CancelReason::EmergencyExpired => f.write_str("emergency response window expired"),
        }
    }
}

/// Flight lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightStatus {
    /// On approach, not yet delayed
    Scheduled,

    /// At least one landing attempt was pushed back
    Delayed,

    /// Landed (terminal)
    Landed {
        tick: usize,
        runway_id: String,
    },

    /// Canceled (terminal)
    Canceled {
        tick: usize,
        reason: CancelReason,
    },
}

impl FlightStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlightStatus::Landed { .. } | FlightStatus::Canceled { .. })
    }
}

/// Errors raised by flight state transitions
#[derive(Debug, Error, PartialEq)]
pub enum FlightError {
    #[error("Flight {flight_number} is already {status} and cannot change")]
    AlreadyTerminal {
        flight_number: String,
        status: String,
    },
}

/// A flight on approach to the airport
///
/// # Example
/// ```
/// use airport_simulator_core_rs::models::{Aircraft, Flight, FlightCategory, SizeClass};
///
/// let aircraft = Aircraft::new("A320", SizeClass::Medium, 70);
/// let mut flight = Flight::new("AS100", aircraft, FlightCategory::Commercial, 150, 10);
///
/// flight.delay_by(5, 10).unwrap();
/// assert_eq!(flight.scheduled_tick(), 15);
/// assert_eq!(flight.delay_ticks(15), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    flight_number: String,
    aircraft: Aircraft,
    category: FlightCategory,
    priority: PriorityTier,
    original_scheduled_tick: usize,
    scheduled_tick: usize,
    passengers: u32,
    status: FlightStatus,

    /// Delay figure frozen when the flight reached a terminal status
    final_delay: Option<usize>,

    /// Whether a critical-delay failure has already been raised for this flight
    critical_delay_reported: bool,
}

impl Flight {
    /// Create a flight scheduled to land at `scheduled_tick`.
    ///
    /// Priority defaults to the category's tier.
    pub fn new(
        flight_number: impl Into<String>,
        aircraft: Aircraft,
        category: FlightCategory,
        passengers: u32,
        scheduled_tick: usize,
    ) -> Self {
        Self {
            flight_number: flight_number.into(),
            aircraft,
            category,
            priority: category.default_priority(),
            original_scheduled_tick: scheduled_tick,
            scheduled_tick,
            passengers,
            status: FlightStatus::Scheduled,
            final_delay: None,
            critical_delay_reported: false,
        }
    }

    pub fn with_priority(mut self, priority: PriorityTier) -> Self {
        self.priority = priority;
        self
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    pub fn aircraft(&self) -> &Aircraft {
        &self.aircraft
    }

    pub fn category(&self) -> FlightCategory {
        self.category
    }

    pub fn priority(&self) -> PriorityTier {
        self.priority
    }

    pub fn original_scheduled_tick(&self) -> usize {
        self.original_scheduled_tick
    }

    pub fn scheduled_tick(&self) -> usize {
        self.scheduled_tick
    }

    pub fn passengers(&self) -> u32 {
        self.passengers
    }

    pub fn status(&self) -> &FlightStatus {
        &self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Emergency flights are tracked by the emergency deadline tracker
    pub fn is_emergency(&self) -> bool {
        self.category == FlightCategory::Emergency || self.priority == PriorityTier::Critical
    }

    /// Overdue: still airborne past its scheduled landing tick
    pub fn is_overdue(&self, now: usize) -> bool {
        !self.is_terminal() && now > self.scheduled_tick
    }

    /// Due: still airborne and scheduled at or before `now`
    pub fn is_due(&self, now: usize) -> bool {
        !self.is_terminal() && self.scheduled_tick <= now
    }

    /// Total delay in ticks as seen at `now`
    pub fn delay_ticks(&self, now: usize) -> usize {
        if let Some(frozen) = self.final_delay {
            return frozen;
        }
        let rescheduled = self.scheduled_tick - self.original_scheduled_tick;
        rescheduled + now.saturating_sub(self.scheduled_tick)
    }

    /// True if landing at `now` would count as on time
    pub fn is_on_time(&self, now: usize) -> bool {
        self.delay_ticks(now) == 0
    }

    /// True once the delay at `now` is strictly above `threshold`
    pub fn exceeds_delay(&self, now: usize, threshold: usize) -> bool {
        !self.is_terminal() && self.delay_ticks(now) > threshold
    }

    /// Push the landing back by `ticks` from whichever is later: the current
    /// schedule or `now`.
    pub fn delay_by(&mut self, ticks: usize, now: usize) -> Result<(), FlightError> {
        self.ensure_active()?;
        self.scheduled_tick = self.scheduled_tick.max(now) + ticks;
        self.status = FlightStatus::Delayed;
        Ok(())
    }

    /// Mark the flight landed on `runway_id` at `now`
    pub fn land(&mut self, runway_id: impl Into<String>, now: usize) -> Result<(), FlightError> {
        self.ensure_active()?;
        self.final_delay = Some(self.delay_ticks(now));
        self.status = FlightStatus::Landed {
            tick: now,
            runway_id: runway_id.into(),
        };
        Ok(())
    }

    /// Cancel the flight at `now`
    pub fn cancel(&mut self, reason: CancelReason, now: usize) -> Result<(), FlightError> {
        self.ensure_active()?;
        self.final_delay = Some(self.delay_ticks(now));
        self.status = FlightStatus::Canceled { tick: now, reason };
        Ok(())
    }

    /// Returns true exactly once: the first time the caller reports that this
    /// flight crossed the critical-delay line.
    pub fn take_critical_delay_report(&mut self) -> bool {
        if self.critical_delay_reported {
            return false;
        }
        self.critical_delay_reported = true;
        true
    }

    fn ensure_active(&self) -> Result<(), FlightError> {
        if self.is_terminal() {
            let status = match &self.status {
                FlightStatus::Landed { .. } => "landed",
                _ => "canceled",
            };
            return Err(FlightError::AlreadyTerminal {
                flight_number: self.flight_number.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}
