//! Scenario events
//!
//! Scripted interventions configured up front and executed at fixed ticks:
//! injected flights, weather overrides, runway closures and cash grants.

pub mod handler;
pub mod types;

pub use handler::{ScenarioContext, ScenarioError, ScenarioEventHandler};
pub use types::{EventSchedule, ScenarioEvent, ScheduledEvent};
