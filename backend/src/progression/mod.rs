//! Experience and achievements
//!
//! Progression is a read-only consumer of landing outcomes: it never
//! changes flights or runways. The orchestrator feeds it every committed
//! landing and applies any achievement rewards it reports.
//!
//! # XP
//!
//! ```text
//! xp = ⌊(base_xp + on_time_xp? + emergency_xp?) × Π xp_multipliers⌋
//! ```
//!
//! # Levels
//!
//! Levels start at 1. Reaching level `L + 1` needs cumulative
//! `xp_per_level × L × (L + 1) / 2` XP: 100, 300, 600, ... by default.

pub mod achievements;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::revenue::ModifierError;

pub use achievements::{default_catalog, AchievementCondition, AchievementDef, AchievementReward};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub base_xp: u64,
    pub on_time_xp: u64,
    pub emergency_xp: u64,
    pub xp_per_level: u64,
    pub achievements: Vec<AchievementDef>,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_xp: 10,
            on_time_xp: 5,
            emergency_xp: 15,
            xp_per_level: 100,
            achievements: default_catalog(),
        }
    }
}

/// Running statistics achievements are checked against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_landings: u64,
    pub on_time_streak: u64,
    pub best_on_time_streak: u64,
    pub emergencies_handled: u64,
}

/// What one landing earned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingProgress {
    pub xp_gained: u64,
    /// Levels reached by this landing, ascending
    pub levels_gained: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct ProgressionTracker {
    config: ProgressionConfig,
    xp: u64,
    level: u32,
    xp_multipliers: Vec<f64>,
    stats: ProgressStats,
    unlocked: BTreeSet<String>,
}

impl ProgressionTracker {
    pub fn new(config: ProgressionConfig) -> Self {
        Self {
            config,
            xp: 0,
            level: 1,
            xp_multipliers: Vec::new(),
            stats: ProgressStats::default(),
            unlocked: BTreeSet::new(),
        }
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn stats(&self) -> &ProgressStats {
        &self.stats
    }

    pub fn unlocked(&self) -> &BTreeSet<String> {
        &self.unlocked
    }

    pub fn is_unlocked(&self, achievement_id: &str) -> bool {
        self.unlocked.contains(achievement_id)
    }

    pub fn xp_multiplier(&self) -> f64 {
        self.xp_multipliers.iter().product()
    }

    pub fn add_xp_multiplier(&mut self, name: &str, factor: f64) -> Result<(), ModifierError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ModifierError::InvalidFactor {
                name: name.to_string(),
                factor,
            });
        }
        self.xp_multipliers.push(factor);
        Ok(())
    }

    /// Cumulative XP needed to stand at `level`
    ///
    /// # Example
    /// ```
    /// use airport_simulator_core_rs::progression::{ProgressionConfig, ProgressionTracker};
    ///
    /// let tracker = ProgressionTracker::new(ProgressionConfig::default());
    /// assert_eq!(tracker.xp_for_level(1), 0);
    /// assert_eq!(tracker.xp_for_level(2), 100);
    /// assert_eq!(tracker.xp_for_level(4), 600);
    /// ```
    pub fn xp_for_level(&self, level: u32) -> u64 {
        let l = u64::from(level.saturating_sub(1));
        self.config.xp_per_level * l * (l + 1) / 2
    }

    pub fn xp_for_landing(&self, on_time: bool, emergency: bool) -> u64 {
        let mut raw = self.config.base_xp;
        if on_time {
            raw += self.config.on_time_xp;
        }
        if emergency {
            raw += self.config.emergency_xp;
        }
        (raw as f64 * self.xp_multiplier()).floor() as u64
    }

    /// Credit a committed landing
    pub fn record_landing(&mut self, on_time: bool, emergency: bool) -> LandingProgress {
        self.stats.total_landings += 1;
        if on_time {
            self.stats.on_time_streak += 1;
            self.stats.best_on_time_streak =
                self.stats.best_on_time_streak.max(self.stats.on_time_streak);
        } else {
            self.stats.on_time_streak = 0;
        }
        if emergency {
            self.stats.emergencies_handled += 1;
        }

        let xp_gained = self.xp_for_landing(on_time, emergency);
        LandingProgress {
            xp_gained,
            levels_gained: self.add_xp(xp_gained),
        }
    }

    /// Add raw XP; returns every level crossed
    pub fn add_xp(&mut self, amount: u64) -> Vec<u32> {
        self.xp += amount;
        let mut gained = Vec::new();
        while self.config.xp_per_level > 0 && self.xp >= self.xp_for_level(self.level + 1) {
            self.level += 1;
            gained.push(self.level);
        }
        gained
    }

    /// Achievements whose condition now holds and that were not yet
    /// unlocked. They are marked unlocked before returning.
    pub fn check_achievements(&mut self, balance: i64) -> Vec<AchievementDef> {
        let newly: Vec<AchievementDef> = self
            .config
            .achievements
            .iter()
            .filter(|a| !self.unlocked.contains(&a.id))
            .filter(|a| a.condition.is_met(&self.stats, balance, self.level))
            .cloned()
            .collect();
        for achievement in &newly {
            self.unlocked.insert(achievement.id.clone());
        }
        newly
    }
}
