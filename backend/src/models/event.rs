//! Event logging for replay, auditing and the external log sink.
//!
//! Every significant state change inside a tick is captured as an [`Event`].
//! Events are kept in an in-memory [`EventLog`] and their `Display` form is
//! the human-readable line handed to the host's log sink.
//!
//! # Event Types
//!
//! - **Flight**: scheduled, overdue, delayed, landed, canceled
//! - **Dispatch**: manual selection requested, manual fallback
//! - **Revenue**: each modifier step that changed a landing's revenue
//! - **Runway**: wear, closure, repair, release, registration
//! - **Safety**: emergency registered/expired, failure recorded, game over
//! - **Progression**: level up, achievement unlocked, modifier added
//! - **Environment**: weather changes, scenario events, end of day

use std::fmt;

use crate::failure::FailureCategory;
use crate::models::flight::{CancelReason, FlightCategory};
use crate::models::runway::{OccupancyReason, RunwayTier};
use crate::weather::WeatherCondition;

/// Why a landing attempt was pushed back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelayReason {
    /// No runway in the system could accept the aircraft this tick
    NoRunwayAvailable,
    /// The selected runway was taken before the landing was committed
    RunwayOccupiedAtCommit { runway_id: String },
    /// The manual dispatch collaborator asked for a delay
    ManualDelay,
}

impl fmt::Display for DelayReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayReason::NoRunwayAvailable => f.write_str("no runway available"),
            DelayReason::RunwayOccupiedAtCommit { runway_id } => {
                write!(f, "runway {} occupied at commit", runway_id)
            }
            DelayReason::ManualDelay => f.write_str("held by controller"),
        }
    }
}

/// Simulation event capturing a state change.
///
/// All events carry the tick they happened on; within a tick they are logged
/// in execution order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FlightScheduled {
        tick: usize,
        flight_number: String,
        category: FlightCategory,
        scheduled_tick: usize,
        passengers: u32,
    },

    /// Flight is still airborne past its scheduled tick
    FlightOverdue {
        tick: usize,
        flight_number: String,
        overdue_by: usize,
    },

    FlightDelayed {
        tick: usize,
        flight_number: String,
        added_ticks: usize,
        total_delay: usize,
        reason: DelayReason,
    },

    ManualSelectionRequested {
        tick: usize,
        flight_number: String,
        candidates: Vec<String>,
    },

    /// Manual response was unusable; automatic selection took over
    ManualSelectionFallback {
        tick: usize,
        flight_number: String,
        reason: String,
    },

    FlightLanded {
        tick: usize,
        flight_number: String,
        runway_id: String,
        on_time: bool,
        revenue: i64,
    },

    /// One revenue pipeline step that changed the amount
    RevenueAdjusted {
        tick: usize,
        flight_number: String,
        cause: String,
        delta: i64,
    },

    FlightCanceled {
        tick: usize,
        flight_number: String,
        reason: CancelReason,
    },

    RunwayWear {
        tick: usize,
        runway_id: String,
        added: u32,
        wear: u32,
    },

    /// Wear reached the full-degradation threshold
    RunwayClosed { tick: usize, runway_id: String },

    RunwayRepaired {
        tick: usize,
        runway_id: String,
        cost: i64,
        blocking: bool,
    },

    RunwayReleased {
        tick: usize,
        runway_id: String,
        reason: OccupancyReason,
    },

    RunwayAdded {
        tick: usize,
        runway_id: String,
        tier: RunwayTier,
        length: u32,
    },

    EmergencyRegistered {
        tick: usize,
        flight_number: String,
        deadline: usize,
    },

    EmergencyExpired {
        tick: usize,
        flight_number: String,
        deadline: usize,
    },

    FailureRecorded {
        tick: usize,
        category: FailureCategory,
        count: u32,
        threshold: u32,
        details: String,
    },

    GameOver {
        tick: usize,
        category: FailureCategory,
        reason: String,
    },

    WeatherChanged {
        tick: usize,
        from: WeatherCondition,
        to: WeatherCondition,
    },

    LevelUp { tick: usize, level: u32 },

    AchievementUnlocked {
        tick: usize,
        achievement_id: String,
        name: String,
    },

    ModifierAdded {
        tick: usize,
        name: String,
        factor: f64,
        scope: String,
    },

    ScenarioEventExecuted {
        tick: usize,
        event_type: String,
        details: serde_json::Value,
    },

    EndOfDay {
        tick: usize,
        day: usize,
        landings: usize,
        revenue: i64,
    },
}

impl Event {
    /// Tick on which this event occurred
    pub fn tick(&self) -> usize {
        match self {
            Event::FlightScheduled { tick, .. }
            | Event::FlightOverdue { tick, .. }
            | Event::FlightDelayed { tick, .. }
            | Event::ManualSelectionRequested { tick, .. }
            | Event::ManualSelectionFallback { tick, .. }
            | Event::FlightLanded { tick, .. }
            | Event::RevenueAdjusted { tick, .. }
            | Event::FlightCanceled { tick, .. }
            | Event::RunwayWear { tick, .. }
            | Event::RunwayClosed { tick, .. }
            | Event::RunwayRepaired { tick, .. }
            | Event::RunwayReleased { tick, .. }
            | Event::RunwayAdded { tick, .. }
            | Event::EmergencyRegistered { tick, .. }
            | Event::EmergencyExpired { tick, .. }
            | Event::FailureRecorded { tick, .. }
            | Event::GameOver { tick, .. }
            | Event::WeatherChanged { tick, .. }
            | Event::LevelUp { tick, .. }
            | Event::AchievementUnlocked { tick, .. }
            | Event::ModifierAdded { tick, .. }
            | Event::ScenarioEventExecuted { tick, .. }
            | Event::EndOfDay { tick, .. } => *tick,
        }
    }

    /// Short name of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::FlightScheduled { .. } => "FlightScheduled",
            Event::FlightOverdue { .. } => "FlightOverdue",
            Event::FlightDelayed { .. } => "FlightDelayed",
            Event::ManualSelectionRequested { .. } => "ManualSelectionRequested",
            Event::ManualSelectionFallback { .. } => "ManualSelectionFallback",
            Event::FlightLanded { .. } => "FlightLanded",
            Event::RevenueAdjusted { .. } => "RevenueAdjusted",
            Event::FlightCanceled { .. } => "FlightCanceled",
            Event::RunwayWear { .. } => "RunwayWear",
            Event::RunwayClosed { .. } => "RunwayClosed",
            Event::RunwayRepaired { .. } => "RunwayRepaired",
            Event::RunwayReleased { .. } => "RunwayReleased",
            Event::RunwayAdded { .. } => "RunwayAdded",
            Event::EmergencyRegistered { .. } => "EmergencyRegistered",
            Event::EmergencyExpired { .. } => "EmergencyExpired",
            Event::FailureRecorded { .. } => "FailureRecorded",
            Event::GameOver { .. } => "GameOver",
            Event::WeatherChanged { .. } => "WeatherChanged",
            Event::LevelUp { .. } => "LevelUp",
            Event::AchievementUnlocked { .. } => "AchievementUnlocked",
            Event::ModifierAdded { .. } => "ModifierAdded",
            Event::ScenarioEventExecuted { .. } => "ScenarioEventExecuted",
            Event::EndOfDay { .. } => "EndOfDay",
        }
    }

    /// Flight this event concerns, if any
    pub fn flight_number(&self) -> Option<&str> {
        match self {
            Event::FlightScheduled { flight_number, .. }
            | Event::FlightOverdue { flight_number, .. }
            | Event::FlightDelayed { flight_number, .. }
            | Event::ManualSelectionRequested { flight_number, .. }
            | Event::ManualSelectionFallback { flight_number, .. }
            | Event::FlightLanded { flight_number, .. }
            | Event::RevenueAdjusted { flight_number, .. }
            | Event::FlightCanceled { flight_number, .. }
            | Event::EmergencyRegistered { flight_number, .. }
            | Event::EmergencyExpired { flight_number, .. } => Some(flight_number),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::FlightScheduled {
                tick,
                flight_number,
                category,
                scheduled_tick,
                passengers,
            } => write!(
                f,
                "[t{}] {} flight {} scheduled to land at t{} with {} passengers",
                tick, category, flight_number, scheduled_tick, passengers
            ),
            Event::FlightOverdue {
                tick,
                flight_number,
                overdue_by,
            } => write!(f, "[t{}] {} is overdue by {} tick(s)", tick, flight_number, overdue_by),
            Event::FlightDelayed {
                tick,
                flight_number,
                added_ticks,
                total_delay,
                reason,
            } => write!(
                f,
                "[t{}] {} delayed {} tick(s): {} (total delay {})",
                tick, flight_number, added_ticks, reason, total_delay
            ),
            Event::ManualSelectionRequested {
                tick,
                flight_number,
                candidates,
            } => write!(
                f,
                "[t{}] runway requested for {} (candidates: {})",
                tick,
                flight_number,
                candidates.join(", ")
            ),
            Event::ManualSelectionFallback {
                tick,
                flight_number,
                reason,
            } => write!(
                f,
                "[t{}] manual choice for {} rejected ({}), using automatic dispatch",
                tick, flight_number, reason
            ),
            Event::FlightLanded {
                tick,
                flight_number,
                runway_id,
                on_time,
                revenue,
            } => write!(
                f,
                "[t{}] {} landed on {} ({}) earning {}",
                tick,
                flight_number,
                runway_id,
                if *on_time { "on time" } else { "late" },
                revenue
            ),
            Event::RevenueAdjusted {
                tick,
                flight_number,
                cause,
                delta,
            } => write!(f, "[t{}] {} revenue {:+} from {}", tick, flight_number, delta, cause),
            Event::FlightCanceled {
                tick,
                flight_number,
                reason,
            } => write!(f, "[t{}] {} canceled: {}", tick, flight_number, reason),
            Event::RunwayWear {
                tick,
                runway_id,
                added,
                wear,
            } => write!(f, "[t{}] runway {} wear +{} (now {})", tick, runway_id, added, wear),
            Event::RunwayClosed { tick, runway_id } => {
                write!(f, "[t{}] runway {} fully degraded and closed to landings", tick, runway_id)
            }
            Event::RunwayRepaired {
                tick,
                runway_id,
                cost,
                blocking,
            } => write!(
                f,
                "[t{}] runway {} repaired for {}{}",
                tick,
                runway_id,
                cost,
                if *blocking { "" } else { " (in place)" }
            ),
            Event::RunwayReleased {
                tick,
                runway_id,
                reason,
            } => write!(f, "[t{}] runway {} free after {}", tick, runway_id, reason),
            Event::RunwayAdded {
                tick,
                runway_id,
                tier,
                length,
            } => write!(f, "[t{}] {} runway {} opened ({}m)", tick, tier, runway_id, length),
            Event::EmergencyRegistered {
                tick,
                flight_number,
                deadline,
            } => write!(
                f,
                "[t{}] EMERGENCY {} must be handled by t{}",
                tick, flight_number, deadline
            ),
            Event::EmergencyExpired {
                tick,
                flight_number,
                deadline,
            } => write!(
                f,
                "[t{}] EMERGENCY {} missed its t{} deadline",
                tick, flight_number, deadline
            ),
            Event::FailureRecorded {
                tick,
                category,
                count,
                threshold,
                details,
            } => write!(
                f,
                "[t{}] failure {} {}/{}: {}",
                tick, category, count, threshold, details
            ),
            Event::GameOver {
                tick,
                category,
                reason,
            } => write!(f, "[t{}] GAME OVER ({}): {}", tick, category, reason),
            Event::WeatherChanged { tick, from, to } => {
                write!(f, "[t{}] weather changed from {} to {}", tick, from, to)
            }
            Event::LevelUp { tick, level } => write!(f, "[t{}] reached level {}", tick, level),
            Event::AchievementUnlocked { tick, name, .. } => {
                write!(f, "[t{}] achievement unlocked: {}", tick, name)
            }
            Event::ModifierAdded {
                tick,
                name,
                factor,
                scope,
            } => write!(f, "[t{}] modifier {} x{:.2} added ({})", tick, name, factor, scope),
            Event::ScenarioEventExecuted {
                tick,
                event_type,
                details,
            } => write!(f, "[t{}] scenario {} {}", tick, event_type, details),
            Event::EndOfDay {
                tick,
                day,
                landings,
                revenue,
            } => write!(
                f,
                "[t{}] day {} closed: {} landing(s), revenue {}",
                tick, day, landings, revenue
            ),
        }
    }
}

/// Append-only log of simulation events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events logged at or after position `from` (for per-tick forwarding)
    pub fn since(&self, from: usize) -> &[Event] {
        &self.events[from.min(self.events.len())..]
    }

    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    pub fn events_for_flight(&self, flight_number: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.flight_number() == Some(flight_number))
            .collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
