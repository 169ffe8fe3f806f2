//! Investment bucket and its rebalancing policy

use serde::{Deserialize, Serialize};

use crate::volatility::VolatilityProfile;

fn default_currency() -> String {
    "USD".to_string()
}

fn default_target_growth_pct() -> f64 {
    7.0
}

fn default_sell_trigger() -> f64 {
    1.5
}

fn default_buy_trigger() -> f64 {
    5.0
}

fn default_required_runaway_months() -> f64 {
    6.0
}

/// How often the target-trajectory skim is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceFrequency {
    #[default]
    Monthly,
    /// Only on months whose index is a multiple of 12
    Yearly,
}

impl RebalanceFrequency {
    #[must_use]
    pub fn is_due(self, month_idx: usize) -> bool {
        match self {
            RebalanceFrequency::Monthly => true,
            RebalanceFrequency::Yearly => month_idx % 12 == 0,
        }
    }
}

/// Target-trajectory rebalancing configuration for a bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancingParams {
    #[serde(default)]
    pub frequency: RebalanceFrequency,
    /// Sell when actual growth / target growth exceeds this ratio
    #[serde(default = "default_sell_trigger")]
    pub sell_trigger: f64,
    /// Name of the bucket that absorbs skimmed proceeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standby_bucket: Option<String>,
    /// Buy when `100 * target_price / price - 100` exceeds this percentage
    #[serde(default = "default_buy_trigger")]
    pub buy_trigger: f64,
    /// Lower buys first
    #[serde(default)]
    pub buying_priority: i32,
    /// Portfolio runway, in months of expenses, required before skimming
    #[serde(default = "default_required_runaway_months")]
    pub required_runaway_months: f64,
    /// Lower is sold first to cover expenses
    #[serde(default)]
    pub spending_priority: i32,
    /// Months of expenses this bucket keeps when covering expenses
    #[serde(default)]
    pub cash_floor_months: f64,
}

impl Default for RebalancingParams {
    fn default() -> Self {
        Self {
            frequency: RebalanceFrequency::Monthly,
            sell_trigger: default_sell_trigger(),
            standby_bucket: None,
            buy_trigger: default_buy_trigger(),
            buying_priority: 0,
            required_runaway_months: default_required_runaway_months(),
            spending_priority: 0,
            cash_floor_months: 0.0,
        }
    }
}

/// A named asset class with its own price process, currency and policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentBucket {
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Price per unit in the bucket currency at month zero
    pub initial_price: f64,
    /// Holding in the bucket currency at month zero
    pub initial_amount: f64,
    pub growth_min_pct: f64,
    pub growth_max_pct: f64,
    pub growth_avg_pct: f64,
    #[serde(default)]
    pub volatility: VolatilityProfile,
    #[serde(default)]
    pub buy_sell_fee_pct: f64,
    #[serde(default = "default_target_growth_pct")]
    pub target_growth_pct: f64,
    #[serde(default)]
    pub rebalancing: RebalancingParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebalancing_defaults() {
        let params = RebalancingParams::default();
        assert_eq!(params.frequency, RebalanceFrequency::Monthly);
        assert_eq!(params.sell_trigger, 1.5);
        assert_eq!(params.buy_trigger, 5.0);
        assert_eq!(params.required_runaway_months, 6.0);
        assert!(params.standby_bucket.is_none());
    }

    #[test]
    fn test_bucket_defaults_when_deserialized() {
        let json = r#"{
            "name": "SP500",
            "initial_price": 100,
            "initial_amount": 10000,
            "growth_min_pct": -10,
            "growth_max_pct": 30,
            "growth_avg_pct": 10
        }"#;
        let bucket: InvestmentBucket = serde_json::from_str(json).unwrap();
        assert_eq!(bucket.currency, "USD");
        assert_eq!(bucket.target_growth_pct, 7.0);
        assert_eq!(bucket.volatility, VolatilityProfile::Sp500);
        assert_eq!(bucket.rebalancing, RebalancingParams::default());
    }

    #[test]
    fn test_yearly_frequency_due_only_on_year_start() {
        assert!(RebalanceFrequency::Yearly.is_due(0));
        assert!(!RebalanceFrequency::Yearly.is_due(5));
        assert!(RebalanceFrequency::Yearly.is_due(24));
        assert!(RebalanceFrequency::Monthly.is_due(5));
    }
}
