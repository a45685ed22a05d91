//! xorshift64* random number generator
//!
//! Small, fast, and fully reproducible. The state is a single `u64`, which
//! makes it trivial to include in snapshots.
//!
//! Same seed → same sequence, which is what lets a recorded run (config +
//! seed + manual dispatch responses) replay tick for tick.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use airport_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let passengers = rng.range_inclusive(80, 180);
/// assert!((80..=180).contains(&passengers));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with the given seed.
    ///
    /// A zero seed is replaced with 1 (xorshift cannot leave the zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Next raw 64-bit value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Random value in `[min, max)`
    ///
    /// # Panics
    /// Panics if `min >= max`
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let span = (max - min) as u64;
        min + (self.next() % span) as i64
    }

    /// Random value in `[min, max]`
    ///
    /// # Panics
    /// Panics if `min > max`
    pub fn range_inclusive(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "min must not exceed max");
        if min == max {
            return min;
        }
        self.range(min, max + 1)
    }

    /// Random f64 in `[0.0, 1.0)`
    pub fn next_f64(&mut self) -> f64 {
        (self.next() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Bernoulli trial with success probability `p` (clamped to [0, 1])
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.next_f64() < p
    }

    /// Sample a Poisson-distributed count with mean `lambda`.
    ///
    /// Knuth's multiplication method. Adequate for the small per-tick
    /// arrival rates the simulator uses (λ well under 10).
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        if lambda <= 0.0 {
            return 0;
        }

        let limit = (-lambda).exp();
        let mut product = self.next_f64();
        let mut count = 0u64;
        while product > limit {
            count += 1;
            product *= self.next_f64();
        }
        count
    }

    /// Pick an index from a slice of non-negative weights.
    ///
    /// Returns `None` when the slice is empty or every weight is zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut target = self.next_f64() * total;
        for (index, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            if target < *weight {
                return Some(index);
            }
            target -= weight;
        }

        // Floating point leftovers land on the last positive weight
        weights.iter().rposition(|w| *w > 0.0)
    }

    /// Current internal state (for snapshots and replay)
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
