//! Economy modifiers
//!
//! Multiplicative factors compose by multiplication, never by addition.
//! Additive bonuses are the one exception and are applied to the base fare
//! before any factor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::FlightCategory;

#[derive(Debug, Error, PartialEq)]
pub enum ModifierError {
    #[error("Modifier {name} has invalid factor {factor}: must be positive and finite")]
    InvalidFactor { name: String, factor: f64 },

    #[error("Bonus {name} has negative amount {amount}")]
    NegativeBonus { name: String, amount: i64 },
}

/// Named multiplicative factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub factor: f64,
}

impl Modifier {
    pub fn new(name: impl Into<String>, factor: f64) -> Result<Self, ModifierError> {
        let name = name.into();
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ModifierError::InvalidFactor { name, factor });
        }
        Ok(Self { name, factor })
    }
}

/// When an additive bonus applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusCondition {
    /// Landed with zero delay
    OnTime,
    /// On time and on a runway in near-perfect condition
    PerfectLanding,
}

/// Flat amount added to the base fare when its condition holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditiveBonus {
    pub name: String,
    pub amount: i64,
    pub condition: BonusCondition,
}

/// All registered economy modifiers
///
/// # Example
/// ```
/// use airport_simulator_core_rs::revenue::ModifierSet;
/// use airport_simulator_core_rs::models::FlightCategory;
///
/// let mut modifiers = ModifierSet::new();
/// modifiers.add_global("marketing", 1.1).unwrap();
/// modifiers.add_for_category(FlightCategory::Cargo, "freight hub", 1.25).unwrap();
/// assert!((modifiers.global_product() - 1.1).abs() < 1e-9);
/// assert_eq!(modifiers.for_category(FlightCategory::Cargo).len(), 1);
/// assert!(modifiers.for_category(FlightCategory::Vip).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierSet {
    global: Vec<Modifier>,
    by_category: BTreeMap<FlightCategory, Vec<Modifier>>,
    bonuses: Vec<AdditiveBonus>,
}

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_global(&mut self, name: impl Into<String>, factor: f64) -> Result<(), ModifierError> {
        self.global.push(Modifier::new(name, factor)?);
        Ok(())
    }

    pub fn add_for_category(
        &mut self,
        category: FlightCategory,
        name: impl Into<String>,
        factor: f64,
    ) -> Result<(), ModifierError> {
        let modifier = Modifier::new(name, factor)?;
        self.by_category.entry(category).or_default().push(modifier);
        Ok(())
    }

    pub fn add_bonus(
        &mut self,
        name: impl Into<String>,
        amount: i64,
        condition: BonusCondition,
    ) -> Result<(), ModifierError> {
        let name = name.into();
        if amount < 0 {
            return Err(ModifierError::NegativeBonus { name, amount });
        }
        self.bonuses.push(AdditiveBonus {
            name,
            amount,
            condition,
        });
        Ok(())
    }

    pub fn global(&self) -> &[Modifier] {
        &self.global
    }

    pub fn for_category(&self, category: FlightCategory) -> &[Modifier] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn bonuses(&self) -> &[AdditiveBonus] {
        &self.bonuses
    }

    /// Product of all global factors
    pub fn global_product(&self) -> f64 {
        self.global.iter().map(|m| m.factor).product()
    }
}
