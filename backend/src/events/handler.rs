//! Scenario event execution and scheduling
//!
//! This module handles:
//! - Scheduling events by tick
//! - Executing events to modify state
//! - Logging events for replay
//!
//! Flight injection needs the flight generator, the scheduler and the
//! emergency tracker, so it is handled at orchestrator level.

use thiserror::Error;

use crate::events::types::{ScenarioEvent, ScheduledEvent};
use crate::models::{Account, Event, EventLog, OccupancyReason, RunwayError, TransactionKind};
use crate::runways::RunwayRegistry;
use crate::weather::WeatherState;

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error(transparent)]
    Runway(#[from] RunwayError),

    #[error("Grant amount must be non-zero")]
    ZeroGrant,

    #[error("{0} must be handled at orchestrator level")]
    OrchestratorLevel(&'static str),
}

/// State a scenario event may touch
pub struct ScenarioContext<'a> {
    pub registry: &'a mut RunwayRegistry,
    pub account: &'a mut Account,
    pub weather: &'a mut WeatherState,
    pub events: &'a mut EventLog,
}

/// Handles scenario event scheduling and execution
#[derive(Debug, Clone, Default)]
pub struct ScenarioEventHandler {
    events: Vec<ScheduledEvent>,
}

impl ScenarioEventHandler {
    /// Create a new event handler with the given events
    pub fn new(events: Vec<ScheduledEvent>) -> Self {
        Self { events }
    }

    pub fn scheduled(&self) -> &[ScheduledEvent] {
        &self.events
    }

    /// Get all events scheduled for a specific tick, in configuration order
    pub fn get_events_for_tick(&self, tick: usize) -> Vec<&ScenarioEvent> {
        self.events
            .iter()
            .filter(|scheduled| scheduled.schedule.should_execute(tick))
            .map(|scheduled| &scheduled.event)
            .collect()
    }
}

impl ScenarioEvent {
    /// Execute this event against `ctx` and log it
    pub fn execute(&self, ctx: &mut ScenarioContext<'_>, tick: usize) -> Result<(), ScenarioError> {
        match self {
            ScenarioEvent::InjectFlight { .. } => {
                return Err(ScenarioError::OrchestratorLevel("InjectFlight"))
            }

            ScenarioEvent::SetWeather { condition } => {
                let previous = ctx.weather.set(*condition);
                if previous != *condition {
                    ctx.events.log(Event::WeatherChanged {
                        tick,
                        from: previous,
                        to: *condition,
                    });
                }
            }

            ScenarioEvent::CloseRunway {
                runway_id,
                duration,
            } => {
                ctx.registry
                    .require_mut(runway_id)?
                    .occupy(OccupancyReason::Maintenance, *duration, None)?;
            }

            ScenarioEvent::Grant { amount, reason } => {
                if *amount == 0 {
                    return Err(ScenarioError::ZeroGrant);
                }
                if *amount > 0 {
                    ctx.account.credit(*amount, reason.clone(), TransactionKind::Grant, tick);
                } else {
                    ctx.account
                        .force_debit(-amount, reason.clone(), TransactionKind::Grant, tick);
                }
            }
        }

        log_scenario_event(ctx.events, tick, self);
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

pub(crate) fn log_scenario_event(events: &mut EventLog, tick: usize, event: &ScenarioEvent) {
    events.log(Event::ScenarioEventExecuted {
        tick,
        event_type: event.event_type().to_string(),
        details: event.details(),
    });
}
