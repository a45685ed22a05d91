//! Time management for the simulation
//!
//! The airport operates in discrete ticks. A fixed number of ticks forms an
//! operating day. Closing a day is when runway upkeep is charged and the
//! daily landing and revenue counters roll over, so advancing time reports
//! which day (if any) was just closed.

use serde::{Deserialize, Serialize};

/// Tracks the current simulation tick and the operating day it falls in
///
/// # Example
/// ```
/// use airport_simulator_core_rs::TimeManager;
///
/// let mut time = TimeManager::new(3); // 3 ticks per operating day
/// assert_eq!(time.current_tick(), 0);
///
/// assert_eq!(time.advance_tick(), None);
/// assert_eq!(time.advance_tick(), None);
/// assert_eq!(time.advance_tick(), Some(0)); // day 0 closed
/// assert_eq!(time.current_day(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeManager {
    /// Ticks elapsed since the airport opened
    current_tick: usize,
    /// Ticks in one operating day
    ticks_per_day: usize,
}

impl TimeManager {
    /// Create a new TimeManager starting at tick 0 of day 0
    ///
    /// # Arguments
    /// * `ticks_per_day` - Number of ticks in one operating day
    ///
    /// # Panics
    /// Panics if `ticks_per_day` is zero
    pub fn new(ticks_per_day: usize) -> Self {
        assert!(ticks_per_day > 0, "ticks_per_day must be positive");
        Self {
            current_tick: 0,
            ticks_per_day,
        }
    }

    /// Advance time by one tick
    ///
    /// Returns the day that was closed when the tick just finished was the
    /// last one of its day, `None` otherwise.
    ///
    /// # Example
    /// ```
    /// use airport_simulator_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new(1);
    /// assert_eq!(time.advance_tick(), Some(0));
    /// assert_eq!(time.advance_tick(), Some(1));
    /// ```
    pub fn advance_tick(&mut self) -> Option<usize> {
        let closing = self.is_end_of_day().then(|| self.current_day());
        self.current_tick += 1;
        closing
    }

    /// Current tick (total ticks since the airport opened)
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Current operating day (0-indexed)
    ///
    /// # Example
    /// ```
    /// use airport_simulator_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new(100);
    /// for _ in 0..100 {
    ///     time.advance_tick();
    /// }
    /// assert_eq!(time.current_day(), 1);
    /// ```
    pub fn current_day(&self) -> usize {
        self.current_tick / self.ticks_per_day
    }

    /// Tick within the current day (0-indexed)
    pub fn tick_within_day(&self) -> usize {
        self.current_tick % self.ticks_per_day
    }

    /// True on the last tick of an operating day
    ///
    /// # Example
    /// ```
    /// use airport_simulator_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new(100);
    /// for _ in 0..99 {
    ///     time.advance_tick();
    /// }
    /// assert!(time.is_end_of_day());
    /// ```
    pub fn is_end_of_day(&self) -> bool {
        self.tick_within_day() == self.ticks_per_day - 1
    }

    /// Ticks left before the current day closes, counting the current one
    ///
    /// # Example
    /// ```
    /// use airport_simulator_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new(10);
    /// assert_eq!(time.ticks_until_day_close(), 10);
    /// for _ in 0..9 {
    ///     time.advance_tick();
    /// }
    /// assert_eq!(time.ticks_until_day_close(), 1);
    /// ```
    pub fn ticks_until_day_close(&self) -> usize {
        self.ticks_per_day - self.tick_within_day()
    }

    pub fn ticks_per_day(&self) -> usize {
        self.ticks_per_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "ticks_per_day must be positive")]
    fn test_zero_ticks_per_day_panics() {
        TimeManager::new(0);
    }

    #[test]
    fn test_closed_day_is_the_one_just_finished() {
        let mut time = TimeManager::new(2);
        let closed: Vec<Option<usize>> = (0..6).map(|_| time.advance_tick()).collect();
        assert_eq!(closed, vec![None, Some(0), None, Some(1), None, Some(2)]);
    }
}
