//! Simulated time: the tick counter and the real-time clock that drives it

pub mod clock;
pub mod time;

pub use clock::{ClockError, ClockHandle, SimulationClock};
pub use time::TimeManager;
