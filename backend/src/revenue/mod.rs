//! Revenue for landed flights
//!
//! This module provides:
//! - Fare and delay-penalty rates (`RevenueRates`)
//! - The registry of economy modifiers granted by upgrades and achievements (`ModifierSet`)
//! - The pipeline that turns a landing into an amount (`RevenuePipeline`)
//!
//! # Application order
//!
//! ```text
//! base fare × passengers
//!   + additive bonuses (on-time, perfect landing)
//!   × delay multiplier
//!   × flight-type modifiers (registration order)
//!   × global modifiers (registration order)
//! ```

pub mod modifiers;
pub mod pipeline;

// Re-exports
pub use modifiers::{AdditiveBonus, BonusCondition, Modifier, ModifierError, ModifierSet};
pub use pipeline::{
    RevenueBreakdown, RevenueInput, RevenuePipeline, RevenueRates, RevenueStep,
    MIN_DELAY_MULTIPLIER,
};
