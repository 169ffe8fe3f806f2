use serde::{Deserialize, Serialize};

use crate::volatility::InflationVolatility;

/// Annual inflation bounds in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflationSettings {
    pub min_pct: f64,
    pub max_pct: f64,
    pub avg_pct: f64,
    #[serde(default)]
    pub volatility: InflationVolatility,
}

impl InflationSettings {
    /// Zero inflation, no randomness
    pub const NONE: InflationSettings = InflationSettings::fixed(0.0);

    #[must_use]
    pub const fn fixed(pct: f64) -> Self {
        Self {
            min_pct: pct,
            max_pct: pct,
            avg_pct: pct,
            volatility: InflationVolatility::Constant,
        }
    }
}

impl Default for InflationSettings {
    fn default() -> Self {
        Self {
            min_pct: 1.0,
            max_pct: 5.0,
            avg_pct: 2.5,
            volatility: InflationVolatility::Mild,
        }
    }
}
