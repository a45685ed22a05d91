//! Revenue pipeline
//!
//! Computes the amount credited for one landing and records every step that
//! changed it, so logging and tests can see exactly which cause moved the
//! figure by how much.

use serde::{Deserialize, Serialize};

use crate::models::FlightCategory;
use crate::revenue::modifiers::{BonusCondition, ModifierSet};

/// Lowest multiplier a delay can bring a fare down to
pub const MIN_DELAY_MULTIPLIER: f64 = 0.6;

/// Fares and delay-penalty rates
///
/// All monetary values in whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueRates {
    /// Fare per passenger, commercial flights
    pub commercial_fare: i64,
    /// Fare per unit carried, cargo flights
    pub cargo_fare: i64,
    /// Fare per passenger, VIP flights
    pub vip_fare: i64,
    /// Fare per passenger, emergency flights
    pub emergency_fare: i64,

    /// Delay ticks per penalty period (default 10)
    pub ticks_per_penalty_period: usize,
    /// Fraction lost per full period of delay (default 0.05)
    pub penalty_per_period: f64,
    /// Largest fraction the delay penalty can remove (default 0.40, at most
    /// `1 - MIN_DELAY_MULTIPLIER`)
    pub max_penalty: f64,
}

impl Default for RevenueRates {
    fn default() -> Self {
        Self {
            commercial_fare: 10,
            cargo_fare: 8,
            vip_fare: 50,
            emergency_fare: 5,
            ticks_per_penalty_period: 10,
            penalty_per_period: 0.05,
            max_penalty: 0.40,
        }
    }
}

impl RevenueRates {
    pub fn base_fare(&self, category: FlightCategory) -> i64 {
        match category {
            FlightCategory::Commercial => self.commercial_fare,
            FlightCategory::Cargo => self.cargo_fare,
            FlightCategory::Vip => self.vip_fare,
            FlightCategory::Emergency => self.emergency_fare,
        }
    }

    /// `1 − min(max_penalty, ⌊delay / period⌋ × penalty_per_period)`, never
    /// below [`MIN_DELAY_MULTIPLIER`]
    ///
    /// # Example
    /// ```
    /// use airport_simulator_core_rs::revenue::RevenueRates;
    ///
    /// let rates = RevenueRates::default();
    /// assert!((rates.delay_multiplier(25) - 0.90).abs() < 1e-9);
    /// assert!((rates.delay_multiplier(500) - 0.60).abs() < 1e-9);
    /// ```
    pub fn delay_multiplier(&self, delay_ticks: usize) -> f64 {
        if self.ticks_per_penalty_period == 0 {
            return 1.0;
        }
        let periods = (delay_ticks / self.ticks_per_penalty_period) as f64;
        let penalty = (periods * self.penalty_per_period).min(self.max_penalty);
        (1.0 - penalty).max(MIN_DELAY_MULTIPLIER)
    }
}

/// Facts about a landing that the pipeline prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueInput {
    pub category: FlightCategory,
    pub passengers: u32,
    pub delay_ticks: usize,
    pub on_time: bool,
    pub perfect_landing: bool,
}

/// One step that changed the amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueStep {
    pub cause: String,
    /// Multiplicative factor, `None` for additive bonuses
    pub factor: Option<f64>,
    pub delta: i64,
    pub amount_after: i64,
}

/// Full account of how a landing's revenue was computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub base: i64,
    pub steps: Vec<RevenueStep>,
    pub total: i64,
}

/// Stateless revenue calculator
///
/// # Example
/// ```
/// use airport_simulator_core_rs::revenue::{ModifierSet, RevenueInput, RevenuePipeline, RevenueRates};
/// use airport_simulator_core_rs::models::FlightCategory;
///
/// let pipeline = RevenuePipeline::new(RevenueRates::default());
/// let breakdown = pipeline.compute(
///     &RevenueInput {
///         category: FlightCategory::Commercial,
///         passengers: 100,
///         delay_ticks: 0,
///         on_time: true,
///         perfect_landing: false,
///     },
///     &ModifierSet::new(),
/// );
/// assert_eq!(breakdown.total, 1_000);
/// assert!(breakdown.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RevenuePipeline {
    rates: RevenueRates,
}

impl RevenuePipeline {
    pub fn new(rates: RevenueRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RevenueRates {
        &self.rates
    }

    pub fn compute(&self, input: &RevenueInput, modifiers: &ModifierSet) -> RevenueBreakdown {
        let base = self.rates.base_fare(input.category) * i64::from(input.passengers);
        let mut amount = base;
        let mut steps = Vec::new();

        for bonus in modifiers.bonuses() {
            let applies = match bonus.condition {
                BonusCondition::OnTime => input.on_time,
                BonusCondition::PerfectLanding => input.on_time && input.perfect_landing,
            };
            if applies && bonus.amount != 0 {
                amount += bonus.amount;
                steps.push(RevenueStep {
                    cause: format!("bonus:{}", bonus.name),
                    factor: None,
                    delta: bonus.amount,
                    amount_after: amount,
                });
            }
        }

        let delay_factor = self.rates.delay_multiplier(input.delay_ticks);
        apply_factor(
            &mut amount,
            &mut steps,
            format!("delay penalty ({} ticks)", input.delay_ticks),
            delay_factor,
        );

        for modifier in modifiers.for_category(input.category) {
            apply_factor(
                &mut amount,
                &mut steps,
                format!("{}:{}", input.category, modifier.name),
                modifier.factor,
            );
        }

        for modifier in modifiers.global() {
            apply_factor(
                &mut amount,
                &mut steps,
                format!("global:{}", modifier.name),
                modifier.factor,
            );
        }

        RevenueBreakdown {
            base,
            steps,
            total: amount,
        }
    }
}

/// Multiply `amount` by `factor`; record the step only if the amount moved
fn apply_factor(amount: &mut i64, steps: &mut Vec<RevenueStep>, cause: String, factor: f64) {
    let next = (*amount as f64 * factor).round() as i64;
    let delta = next - *amount;
    if delta == 0 {
        return;
    }
    *amount = next;
    steps.push(RevenueStep {
        cause,
        factor: Some(factor),
        delta,
        amount_after: next,
    });
}
