//! Airport account
//!
//! Holds the airport's balance and the record of every movement.
//!
//! CRITICAL: All money values are i64 (whole currency units)
//!
//! The balance may go negative (upkeep is charged whether or not the
//! airport can afford it). Every movement that leaves the balance negative
//! carries an overdraft flag; the orchestrator turns overdrawing debits
//! into financial-shortfall failures.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Category of a money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    LandingRevenue,
    PassiveIncome,
    RunwayRepair,
    RunwayUpkeep,
    RunwayPurchase,
    Grant,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::LandingRevenue => "landing_revenue",
            TransactionKind::PassiveIncome => "passive_income",
            TransactionKind::RunwayRepair => "runway_repair",
            TransactionKind::RunwayUpkeep => "runway_upkeep",
            TransactionKind::RunwayPurchase => "runway_purchase",
            TransactionKind::Grant => "grant",
        };
        f.write_str(name)
    }
}

/// One recorded money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub tick: usize,
    /// Signed amount (positive = credit)
    pub amount: i64,
    pub reason: String,
    pub kind: TransactionKind,
    pub resulting_balance: i64,
    /// Balance was negative after this movement
    pub overdraft: bool,
}

/// Errors that can occur during account operations
#[derive(Debug, Error, PartialEq)]
pub enum AccountError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Amount must be positive")]
    NonPositive,
}

/// The airport's account
///
/// # Example
/// ```
/// use airport_simulator_core_rs::models::{Account, TransactionKind};
///
/// let mut account = Account::new(1_000);
/// account.credit(500, "AS100 landed", TransactionKind::LandingRevenue, 3);
/// assert_eq!(account.balance(), 1_500);
///
/// assert!(account.try_debit(2_000, "repair 09L", TransactionKind::RunwayRepair, 4).is_err());
/// assert_eq!(account.balance(), 1_500);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    balance: i64,
    records: Vec<TransactionRecord>,
}

impl Account {
    pub fn new(opening_balance: i64) -> Self {
        Self {
            balance: opening_balance,
            records: Vec::new(),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// Credit the account
    pub fn credit(
        &mut self,
        amount: i64,
        reason: impl Into<String>,
        kind: TransactionKind,
        tick: usize,
    ) -> TransactionRecord {
        self.apply(amount, reason.into(), kind, tick)
    }

    /// Debit the account only if the balance covers it
    pub fn try_debit(
        &mut self,
        amount: i64,
        reason: impl Into<String>,
        kind: TransactionKind,
        tick: usize,
    ) -> Result<TransactionRecord, AccountError> {
        if amount <= 0 {
            return Err(AccountError::NonPositive);
        }
        if !self.can_afford(amount) {
            return Err(AccountError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        Ok(self.apply(-amount, reason.into(), kind, tick))
    }

    /// Debit the account even if it overdraws
    pub fn force_debit(
        &mut self,
        amount: i64,
        reason: impl Into<String>,
        kind: TransactionKind,
        tick: usize,
    ) -> TransactionRecord {
        self.apply(-amount, reason.into(), kind, tick)
    }

    fn apply(&mut self, amount: i64, reason: String, kind: TransactionKind, tick: usize) -> TransactionRecord {
        self.balance += amount;
        let record = TransactionRecord {
            id: Uuid::new_v4().to_string(),
            tick,
            amount,
            reason,
            kind,
            resulting_balance: self.balance,
            overdraft: self.balance < 0,
        };
        self.records.push(record.clone());
        record
    }
}
