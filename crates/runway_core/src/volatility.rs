//! Named volatility profiles and their monthly sigma mappings
//!
//! Three profile families exist, one per kind of random series:
//! - [`VolatilityProfile`] drives bucket prices and FX rates
//! - [`ExpenseVolatility`] drives the month-to-month noise of recurring expenses
//! - [`InflationVolatility`] drives the inflation random walk
//!
//! Each family resolves to a [`VolatilityParams`] describing the monthly
//! standard deviation and the distribution used to draw from it.

use serde::{Deserialize, Serialize};

/// Distribution used by a generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionType {
    /// Deterministic series, no randomness consumed
    Constant,
    LogNormal,
    Normal,
}

/// Resolved volatility: monthly sigma plus distribution kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityParams {
    pub monthly_sigma: f64,
    pub distribution: DistributionType,
}

impl VolatilityParams {
    pub const CONSTANT: VolatilityParams = VolatilityParams::new(0.0, DistributionType::Constant);

    #[must_use]
    pub const fn new(monthly_sigma: f64, distribution: DistributionType) -> Self {
        Self {
            monthly_sigma,
            distribution,
        }
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.distribution == DistributionType::Constant
    }
}

/// Investment and FX volatility profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityProfile {
    Constant,
    GovBonds,
    #[default]
    Sp500,
    Gold,
    Bitcoin,
}

impl VolatilityProfile {
    pub const ALL: [VolatilityProfile; 5] = [
        VolatilityProfile::Constant,
        VolatilityProfile::GovBonds,
        VolatilityProfile::Sp500,
        VolatilityProfile::Gold,
        VolatilityProfile::Bitcoin,
    ];

    #[must_use]
    pub fn params(self) -> VolatilityParams {
        match self {
            VolatilityProfile::Constant => VolatilityParams::CONSTANT,
            VolatilityProfile::GovBonds => VolatilityParams::new(0.005, DistributionType::LogNormal),
            VolatilityProfile::Sp500 => VolatilityParams::new(0.04, DistributionType::LogNormal),
            VolatilityProfile::Gold => VolatilityParams::new(0.025, DistributionType::LogNormal),
            VolatilityProfile::Bitcoin => VolatilityParams::new(0.15, DistributionType::LogNormal),
        }
    }
}

/// Expense volatility profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseVolatility {
    #[default]
    Constant,
    Moderate,
    Crazy,
}

impl ExpenseVolatility {
    #[must_use]
    pub fn params(self) -> VolatilityParams {
        match self {
            ExpenseVolatility::Constant => VolatilityParams::CONSTANT,
            ExpenseVolatility::Moderate => VolatilityParams::new(0.03, DistributionType::Normal),
            ExpenseVolatility::Crazy => VolatilityParams::new(0.08, DistributionType::Normal),
        }
    }
}

/// Inflation volatility profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InflationVolatility {
    Constant,
    #[default]
    Mild,
    Crazy,
}

impl InflationVolatility {
    #[must_use]
    pub fn params(self) -> VolatilityParams {
        match self {
            InflationVolatility::Constant => VolatilityParams::CONSTANT,
            InflationVolatility::Mild => VolatilityParams::new(0.002, DistributionType::Normal),
            InflationVolatility::Crazy => VolatilityParams::new(0.01, DistributionType::Normal),
        }
    }
}
