//! Exchange-rate settings for a non-expenses currency

use serde::{Deserialize, Serialize};

use crate::volatility::VolatilityProfile;

/// FX settings for one currency, priced in the expenses currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// ISO code, e.g. "EUR"
    pub code: String,
    /// Price of one unit in the expenses currency at month zero
    pub initial_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Long-run level the rate reverts toward
    pub avg_price: f64,
    #[serde(default)]
    pub volatility: VolatilityProfile,
    /// Carried for persistence; conversions in the engine are fee-free
    #[serde(default)]
    pub conversion_fee_pct: f64,
}

impl CurrencySettings {
    /// A pinned rate that never moves
    #[must_use]
    pub fn fixed(code: impl Into<String>, price: f64) -> Self {
        Self {
            code: code.into(),
            initial_price: price,
            min_price: price,
            max_price: price,
            avg_price: price,
            volatility: VolatilityProfile::Constant,
            conversion_fee_pct: 0.0,
        }
    }
}
