//! Orchestrator - main simulation loop
//!
//! Owns every airport component and runs the per-tick update cycle.
//!
//! See `engine.rs` for full implementation.

pub mod checkpoint;
pub mod config;
pub mod engine;

// Re-export main types for convenience
pub use config::{AirportConfig, DelayPolicy, EconomyConfig, RunwaySpec};
pub use engine::{AirportObserver, Notification, Orchestrator, SimulationError, TickResult};

// Re-export snapshot types
pub use checkpoint::{compute_config_hash, AirportSnapshot, RunwaySummary};
