//! Recurring and one-time expense definitions
//!
//! Both are positioned with a 1-based (year, month) pair relative to the start
//! of the simulation. [`month_index`] converts that pair to the 0-based month
//! index used by every series in the engine.

use serde::{Deserialize, Serialize};

use crate::volatility::ExpenseVolatility;

/// Convert a 1-based (year, month) pair to a 0-based month index.
///
/// Year 1, month 1 is index 0. Out-of-range input saturates at zero rather
/// than wrapping; validated configurations never produce it.
#[must_use]
#[inline]
pub fn month_index(year: u32, month: u32) -> usize {
    (year.saturating_sub(1) as usize) * 12 + month.saturating_sub(1) as usize
}

/// A recurring expense that lasts until the next period starts or the
/// simulation ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePeriod {
    /// 1..=12
    pub start_month: u32,
    /// 1-based simulation year
    pub start_year: u32,
    pub amount_min: f64,
    pub amount_max: f64,
    pub amount_avg: f64,
    #[serde(default)]
    pub volatility: ExpenseVolatility,
}

impl ExpensePeriod {
    /// A fixed monthly amount starting at the given (year, month)
    #[must_use]
    pub fn constant(start_year: u32, start_month: u32, amount: f64) -> Self {
        Self {
            start_month,
            start_year,
            amount_min: amount,
            amount_max: amount,
            amount_avg: amount,
            volatility: ExpenseVolatility::Constant,
        }
    }

    #[must_use]
    pub fn start_index(&self) -> usize {
        month_index(self.start_year, self.start_month)
    }
}

/// An expense applied exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneTimeExpense {
    /// 1..=12
    pub month: u32,
    /// 1-based simulation year
    pub year: u32,
    pub amount: f64,
}

impl OneTimeExpense {
    #[must_use]
    pub fn new(year: u32, month: u32, amount: f64) -> Self {
        Self {
            month,
            year,
            amount,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        month_index(self.year, self.month)
    }
}
