//! Achievement definitions
//!
//! Achievements are plain data: a condition over the airport's running
//! statistics and a reward granted once, through the same registration
//! calls any content collaborator would use.

use serde::{Deserialize, Serialize};

use crate::progression::ProgressStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AchievementCondition {
    TotalLandings(u64),
    OnTimeStreak(u64),
    EmergenciesHandled(u64),
    BalanceAtLeast(i64),
    LevelReached(u32),
}

impl AchievementCondition {
    pub fn is_met(&self, stats: &ProgressStats, balance: i64, level: u32) -> bool {
        match *self {
            AchievementCondition::TotalLandings(n) => stats.total_landings >= n,
            AchievementCondition::OnTimeStreak(n) => stats.on_time_streak >= n,
            AchievementCondition::EmergenciesHandled(n) => stats.emergencies_handled >= n,
            AchievementCondition::BalanceAtLeast(x) => balance >= x,
            AchievementCondition::LevelReached(n) => level >= n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementReward {
    GlobalRevenueModifier { name: String, factor: f64 },
    XpMultiplier { factor: f64 },
    WeatherResistance { amount: f64 },
    LandingDurationReduction { ticks: usize },
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub name: String,
    pub condition: AchievementCondition,
    pub reward: AchievementReward,
}

impl AchievementDef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        condition: AchievementCondition,
        reward: AchievementReward,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            condition,
            reward,
        }
    }
}

/// Catalog used when the configuration does not provide one
pub fn default_catalog() -> Vec<AchievementDef> {
    vec![
        AchievementDef::new(
            "first_landing",
            "Wheels Down",
            AchievementCondition::TotalLandings(1),
            AchievementReward::None,
        ),
        AchievementDef::new(
            "punctual",
            "Like Clockwork",
            AchievementCondition::OnTimeStreak(10),
            AchievementReward::GlobalRevenueModifier {
                name: "punctuality".to_string(),
                factor: 1.05,
            },
        ),
        AchievementDef::new(
            "first_responder",
            "First Responder",
            AchievementCondition::EmergenciesHandled(3),
            AchievementReward::XpMultiplier { factor: 1.1 },
        ),
        AchievementDef::new(
            "busy_skies",
            "Busy Skies",
            AchievementCondition::TotalLandings(50),
            AchievementReward::LandingDurationReduction { ticks: 1 },
        ),
        AchievementDef::new(
            "all_weather",
            "All-Weather Operator",
            AchievementCondition::LevelReached(5),
            AchievementReward::WeatherResistance { amount: 0.25 },
        ),
        AchievementDef::new(
            "deep_pockets",
            "Deep Pockets",
            AchievementCondition::BalanceAtLeast(100_000),
            AchievementReward::None,
        ),
    ]
}
