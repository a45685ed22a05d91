//! Weather model
//!
//! Weather is a single airport-wide condition re-rolled at a fixed interval.
//! Its only effect on operations is the wear impact it adds to every landing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ParseError;
use crate::rng::RngManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rain,
    Fog,
    Storm,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 5] = [
        WeatherCondition::Clear,
        WeatherCondition::Cloudy,
        WeatherCondition::Rain,
        WeatherCondition::Fog,
        WeatherCondition::Storm,
    ];

    /// Wear impact added to landings under this condition
    pub fn impact(self) -> f64 {
        match self {
            WeatherCondition::Clear => 0.0,
            WeatherCondition::Cloudy => 2.0,
            WeatherCondition::Rain => 8.0,
            WeatherCondition::Fog => 5.0,
            WeatherCondition::Storm => 20.0,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Fog => "fog",
            WeatherCondition::Storm => "storm",
        };
        f.write_str(name)
    }
}

impl FromStr for WeatherCondition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeatherCondition::ALL
            .into_iter()
            .find(|c| c.to_string() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| ParseError::UnknownWeather(s.to_string()))
    }
}

/// Weather generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Ticks between re-rolls (0 disables changes)
    pub change_interval: usize,
    /// Relative weights in `WeatherCondition::ALL` order
    pub weights: [f64; 5],
    pub initial: WeatherCondition,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            change_interval: 50,
            weights: [0.45, 0.25, 0.15, 0.10, 0.05],
            initial: WeatherCondition::Clear,
        }
    }
}

/// Current weather plus the roll schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherState {
    config: WeatherConfig,
    current: WeatherCondition,
}

impl WeatherState {
    pub fn new(config: WeatherConfig) -> Self {
        let current = config.initial;
        Self { config, current }
    }

    pub fn current(&self) -> WeatherCondition {
        self.current
    }

    pub fn impact(&self) -> f64 {
        self.current.impact()
    }

    /// Force a condition (scenario events). Returns the previous one.
    pub fn set(&mut self, condition: WeatherCondition) -> WeatherCondition {
        std::mem::replace(&mut self.current, condition)
    }

    /// Re-roll on interval boundaries. Returns `(from, to)` when it changed.
    pub fn update(
        &mut self,
        tick: usize,
        rng: &mut RngManager,
    ) -> Option<(WeatherCondition, WeatherCondition)> {
        if self.config.change_interval == 0 || tick == 0 || tick % self.config.change_interval != 0 {
            return None;
        }

        let next = rng
            .weighted_index(&self.config.weights)
            .map(|i| WeatherCondition::ALL[i])
            .unwrap_or(self.current);
        if next == self.current {
            return None;
        }
        Some((self.set(next), next))
    }
}
