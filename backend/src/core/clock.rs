//! Real-time clock that drives simulation ticks
//!
//! The clock owns a monotonic tick counter and one callback slot per run.
//! Each advance invokes the callback synchronously with the new tick value
//! and only then schedules the next advance. A slow callback defers the next
//! tick; ticks are never skipped, doubled, or run concurrently.
//!
//! The interval between ticks is `base_interval / speed_multiplier`, so a
//! multiplier of 2.0 runs the airport twice as fast.
//!
//! Pausing is explicit. A [`ClockHandle`] shares the running flag, which lets
//! a blocking collaborator (an interactive runway prompt) pause the clock for
//! the duration of its wait and resume it afterwards.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by clock configuration
#[derive(Debug, Error, PartialEq)]
pub enum ClockError {
    #[error("Speed multiplier must be a positive finite number, got {0}")]
    InvalidSpeedMultiplier(f64),
}

/// Shared pause/resume control for a [`SimulationClock`]
#[derive(Debug, Clone)]
pub struct ClockHandle {
    running: Arc<AtomicBool>,
}

impl ClockHandle {
    pub fn pause(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Tick clock with a configurable real-time interval
///
/// # Example
/// ```
/// use airport_simulator_core_rs::SimulationClock;
/// use std::ops::ControlFlow;
/// use std::time::Duration;
///
/// let mut clock = SimulationClock::new(Duration::from_millis(1));
/// clock.set_speed_multiplier(4.0).unwrap();
/// clock.start();
///
/// let mut seen = Vec::new();
/// clock.run(Some(3), |tick| {
///     seen.push(tick);
///     ControlFlow::Continue(())
/// });
/// assert_eq!(seen, vec![1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct SimulationClock {
    tick: usize,
    base_interval: Duration,
    speed_multiplier: f64,
    running: Arc<AtomicBool>,
}

impl SimulationClock {
    /// Create a paused clock at tick 0
    pub fn new(base_interval: Duration) -> Self {
        Self {
            tick: 0,
            base_interval,
            speed_multiplier: 1.0,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn pause(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Handle sharing this clock's running flag
    pub fn handle(&self) -> ClockHandle {
        ClockHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Change how fast ticks elapse relative to `base_interval`
    pub fn set_speed_multiplier(&mut self, factor: f64) -> Result<(), ClockError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ClockError::InvalidSpeedMultiplier(factor));
        }
        self.speed_multiplier = factor;
        Ok(())
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Wall-clock time between two ticks at the current speed
    pub fn interval(&self) -> Duration {
        self.base_interval.div_f64(self.speed_multiplier)
    }

    /// Last tick value handed to a callback (0 before the first advance)
    pub fn current_tick(&self) -> usize {
        self.tick
    }

    /// Advance one tick immediately and invoke `callback` with the new value
    pub fn advance<F>(&mut self, mut callback: F) -> usize
    where
        F: FnMut(usize),
    {
        self.tick += 1;
        callback(self.tick);
        self.tick
    }

    /// Drive ticks until paused, broken out of, or `limit` ticks have run.
    ///
    /// Sleeps one interval before each advance. The running flag is checked
    /// before every sleep and again before every advance, so a pause issued
    /// from another thread takes effect before the next tick fires.
    ///
    /// Returns the number of ticks executed by this call.
    pub fn run<F>(&mut self, limit: Option<usize>, mut callback: F) -> usize
    where
        F: FnMut(usize) -> ControlFlow<()>,
    {
        let mut executed = 0;

        while self.is_running() {
            if limit.is_some_and(|max| executed >= max) {
                break;
            }

            let interval = self.interval();
            if !interval.is_zero() {
                thread::sleep(interval);
            }
            if !self.is_running() {
                break;
            }

            self.tick += 1;
            executed += 1;
            if callback(self.tick).is_break() {
                break;
            }
        }

        executed
    }
}
