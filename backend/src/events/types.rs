//! Scenario event types for airport configuration
//!
//! Scenario events modify airport state at specific ticks.
//! Examples: a surprise diversion, a storm front, a runway inspection.
//!
//! # Design Principles
//!
//! 1. **Determinism**: All events are deterministically scheduled and executed
//! 2. **Money is i64**: All monetary values are whole currency units
//! 3. **Self-contained**: Events include all data needed for execution
//! 4. **Logged**: All executions are logged for replay identity

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::arrivals::MIN_LEAD_TIME;
use crate::models::FlightCategory;
use crate::weather::WeatherCondition;

/// A scenario event that modifies airport state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// Schedule an extra flight outside the arrival process
    ///
    /// The aircraft is drawn by the flight generator for `category`;
    /// `passengers` overrides the drawn count when set. A `lead_time` below
    /// one tick is raised to one, since the tick's dispatch has already run.
    ///
    /// # Example
    /// A medical diversion announced 3 ticks out
    InjectFlight {
        category: FlightCategory,
        #[serde(default = "default_lead_time")]
        lead_time: usize,
        #[serde(default)]
        passengers: Option<u32>,
    },

    /// Force the current weather
    ///
    /// The next scheduled re-roll may change it again.
    SetWeather { condition: WeatherCondition },

    /// Close a runway for maintenance
    ///
    /// Fails if the runway is unknown or already occupied.
    CloseRunway { runway_id: String, duration: usize },

    /// Move money in or out of the airport account
    ///
    /// Negative amounts are charges and may overdraw.
    Grant { amount: i64, reason: String },
}

fn default_lead_time() -> usize {
    MIN_LEAD_TIME
}

impl ScenarioEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ScenarioEvent::InjectFlight { .. } => "inject_flight",
            ScenarioEvent::SetWeather { .. } => "set_weather",
            ScenarioEvent::CloseRunway { .. } => "close_runway",
            ScenarioEvent::Grant { .. } => "grant",
        }
    }

    /// Structured payload for the event log
    pub fn details(&self) -> serde_json::Value {
        match self {
            ScenarioEvent::InjectFlight {
                category,
                lead_time,
                passengers,
            } => json!({
                "category": category.to_string(),
                "lead_time": lead_time,
                "passengers": passengers,
            }),
            ScenarioEvent::SetWeather { condition } => json!({
                "condition": condition.to_string(),
            }),
            ScenarioEvent::CloseRunway {
                runway_id,
                duration,
            } => json!({
                "runway_id": runway_id,
                "duration": duration,
            }),
            ScenarioEvent::Grant { amount, reason } => json!({
                "amount": amount,
                "reason": reason,
            }),
        }
    }
}

/// When to execute a scenario event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventSchedule {
    /// Execute once at a specific tick
    OneTime { tick: usize },

    /// Execute at regular intervals starting from start_tick
    Repeating { start_tick: usize, interval: usize },
}

impl EventSchedule {
    /// Check if this schedule triggers at the given tick
    pub fn should_execute(&self, tick: usize) -> bool {
        match self {
            EventSchedule::OneTime { tick: event_tick } => tick == *event_tick,
            EventSchedule::Repeating {
                start_tick,
                interval,
            } => *interval > 0 && tick >= *start_tick && (tick - start_tick) % interval == 0,
        }
    }
}

/// A scenario event paired with its schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub event: ScenarioEvent,
    pub schedule: EventSchedule,
}
