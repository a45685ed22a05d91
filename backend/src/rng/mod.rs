//! Deterministic random number generation
//!
//! Every random draw in the airport core (flight arrivals, wear jitter,
//! weather rolls) goes through one injected [`RngManager`]. There is no
//! ambient random source: the orchestrator owns the manager and lends it
//! to the components that need it.

mod xorshift;

pub use xorshift::RngManager;
