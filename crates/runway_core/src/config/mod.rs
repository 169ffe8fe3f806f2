//! Simulation configuration
//!
//! The main configuration type is [`SimConfig`], which contains everything
//! needed to run a trial or a Monte Carlo batch. It mirrors the persisted
//! configuration one-to-one; every optional field has a serde default.
//!
//! The engine assumes a configuration that satisfies [`SimConfig::validate`].
//! Callers validate once, before any trial, and the engine never re-checks.
//!
//! # Builder DSL
//!
//! ```ignore
//! use runway_core::config::{BucketBuilder, SimConfigBuilder};
//!
//! let config = SimConfigBuilder::new()
//!     .years(30)
//!     .expenses_currency("USD")
//!     .monthly_expense(1, 1, 4_000.0)
//!     .bucket(BucketBuilder::cash("Cash").amount(60_000.0).spending_priority(0))
//!     .bucket(BucketBuilder::sp500("Stocks").amount(900_000.0).standby("Cash"))
//!     .build();
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{
    CurrencySettings, ExpensePeriod, InflationSettings, InvestmentBucket, OneTimeExpense,
};

pub mod builder;

pub use builder::{BucketBuilder, SimConfigBuilder};

fn default_period_years() -> u32 {
    10
}

fn default_expenses_currency() -> String {
    "USD".to_string()
}

fn default_capital_gain_tax_pct() -> f64 {
    25.0
}

/// Complete simulation configuration
///
/// **World assumptions**: `inflation`, `currencies`, each bucket's growth and
/// volatility.
///
/// **Household**: `expense_periods`, `one_time_expenses`, `expenses_currency`.
///
/// **Policy**: each bucket's `rebalancing` parameters and the
/// `capital_gain_tax_pct` applied to realized gains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_period_years")]
    pub period_years: u32,

    /// Currency expenses are denominated in; FX rates are priced in it
    #[serde(default = "default_expenses_currency")]
    pub expenses_currency: String,

    /// Reserved; not consumed by the engine
    #[serde(default)]
    pub hedge_amount: f64,

    #[serde(default = "default_capital_gain_tax_pct")]
    pub capital_gain_tax_pct: f64,

    #[serde(default)]
    pub inflation: InflationSettings,

    #[serde(default)]
    pub expense_periods: Vec<ExpensePeriod>,

    #[serde(default)]
    pub one_time_expenses: Vec<OneTimeExpense>,

    /// Simulated in this order; the order is part of the RNG draw sequence
    #[serde(default)]
    pub buckets: Vec<InvestmentBucket>,

    /// Simulated in this order; the order is part of the RNG draw sequence
    #[serde(default)]
    pub currencies: Vec<CurrencySettings>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            period_years: default_period_years(),
            expenses_currency: default_expenses_currency(),
            hedge_amount: 0.0,
            capital_gain_tax_pct: default_capital_gain_tax_pct(),
            inflation: InflationSettings::default(),
            expense_periods: Vec::new(),
            one_time_expenses: Vec::new(),
            buckets: Vec::new(),
            currencies: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Simulation horizon in months
    #[must_use]
    pub fn n_months(&self) -> usize {
        self.period_years as usize * 12
    }

    #[must_use]
    pub fn bucket(&self, name: &str) -> Option<&InvestmentBucket> {
        self.buckets.iter().find(|b| b.name == name)
    }

    #[must_use]
    pub fn currency(&self, code: &str) -> Option<&CurrencySettings> {
        self.currencies.iter().find(|c| c.code == code)
    }

    /// (bucket, standby name) pairs whose standby does not name a configured bucket.
    ///
    /// These are legal: skimmed proceeds from such a bucket leave the ledger.
    #[must_use]
    pub fn unresolved_standby_links(&self) -> Vec<(&str, &str)> {
        self.buckets
            .iter()
            .filter_map(|b| {
                let standby = b.rebalancing.standby_bucket.as_deref()?;
                self.bucket(standby)
                    .is_none()
                    .then_some((b.name.as_str(), standby))
            })
            .collect()
    }

    /// Bucket currencies other than the expenses currency that have no FX settings.
    ///
    /// The engine converts these at a rate of 1.
    #[must_use]
    pub fn unpriced_currencies(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = Vec::new();
        for bucket in &self.buckets {
            let code = bucket.currency.as_str();
            if code != self.expenses_currency
                && self.currency(code).is_none()
                && !missing.contains(&code)
            {
                missing.push(code);
            }
        }
        missing
    }

    /// Check every bound the engine relies on.
    ///
    /// Returns the first violation found, in configuration order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_years == 0 {
            return Err(ConfigError::EmptyHorizon);
        }
        non_negative("config", "capital_gain_tax_pct", self.capital_gain_tax_pct)?;

        let inflation = &self.inflation;
        ordered_bounds(
            "inflation",
            inflation.min_pct,
            inflation.avg_pct,
            inflation.max_pct,
        )?;

        for (idx, period) in self.expense_periods.iter().enumerate() {
            let entity = format!("expense period #{}", idx + 1);
            ordered_bounds(&entity, period.amount_min, period.amount_avg, period.amount_max)?;
            valid_month(&entity, period.start_month)?;
            valid_year(&entity, period.start_year)?;
        }

        for (idx, expense) in self.one_time_expenses.iter().enumerate() {
            let entity = format!("one-time expense #{}", idx + 1);
            valid_month(&entity, expense.month)?;
            valid_year(&entity, expense.year)?;
            non_negative(&entity, "amount", expense.amount)?;
        }

        for currency in &self.currencies {
            let entity = format!("currency {}", currency.code);
            ordered_bounds(
                &entity,
                currency.min_price,
                currency.avg_price,
                currency.max_price,
            )?;
            positive(&entity, "initial_price", currency.initial_price)?;
            non_negative(&entity, "conversion_fee_pct", currency.conversion_fee_pct)?;
        }

        let mut seen = FxHashSet::default();
        for bucket in &self.buckets {
            if !seen.insert(bucket.name.as_str()) {
                return Err(ConfigError::DuplicateBucketName(bucket.name.clone()));
            }
            let entity = format!("bucket {}", bucket.name);
            ordered_bounds(
                &entity,
                bucket.growth_min_pct,
                bucket.growth_avg_pct,
                bucket.growth_max_pct,
            )?;
            positive(&entity, "initial_price", bucket.initial_price)?;
            non_negative(&entity, "initial_amount", bucket.initial_amount)?;
            non_negative(&entity, "buy_sell_fee_pct", bucket.buy_sell_fee_pct)?;

            let params = &bucket.rebalancing;
            positive(&entity, "sell_trigger", params.sell_trigger)?;
            non_negative(
                &entity,
                "required_runaway_months",
                params.required_runaway_months,
            )?;
            non_negative(&entity, "cash_floor_months", params.cash_floor_months)?;
        }

        Ok(())
    }
}

fn ordered_bounds(entity: &str, min: f64, avg: f64, max: f64) -> Result<(), ConfigError> {
    if min <= avg && avg <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidBounds {
            entity: entity.to_string(),
            min,
            avg,
            max,
        })
    }
}

fn positive(entity: &str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            entity: entity.to_string(),
            field,
            value,
        })
    }
}

fn non_negative(entity: &str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative {
            entity: entity.to_string(),
            field,
            value,
        })
    }
}

fn valid_month(entity: &str, month: u32) -> Result<(), ConfigError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(ConfigError::InvalidMonth {
            entity: entity.to_string(),
            month,
        })
    }
}

fn valid_year(entity: &str, year: u32) -> Result<(), ConfigError> {
    if year >= 1 {
        Ok(())
    } else {
        Err(ConfigError::InvalidYear {
            entity: entity.to_string(),
            year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RebalancingParams;
    use crate::volatility::VolatilityProfile;

    fn bucket(name: &str) -> InvestmentBucket {
        InvestmentBucket {
            name: name.to_string(),
            currency: "USD".to_string(),
            initial_price: 100.0,
            initial_amount: 10_000.0,
            growth_min_pct: -10.0,
            growth_max_pct: 30.0,
            growth_avg_pct: 10.0,
            volatility: VolatilityProfile::Sp500,
            buy_sell_fee_pct: 0.0,
            target_growth_pct: 7.0,
            rebalancing: RebalancingParams::default(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.period_years, 10);
        assert_eq!(config.expenses_currency, "USD");
        assert_eq!(config.capital_gain_tax_pct, 25.0);
        assert!(config.buckets.is_empty());
        assert_eq!(config.n_months(), 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_takes_defaults() {
        let config: SimConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_inflation_bounds() {
        let mut config = SimConfig::default();
        config.inflation.min_pct = 5.0;
        config.inflation.max_pct = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds { .. })
        ));

        config.inflation = InflationSettings {
            min_pct: 1.0,
            max_pct: 5.0,
            avg_pct: 6.0,
            ..InflationSettings::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expense_period_checks() {
        let mut config = SimConfig::default();
        config.expense_periods.push(ExpensePeriod {
            start_month: 13,
            start_year: 1,
            amount_min: 1_000.0,
            amount_max: 2_000.0,
            amount_avg: 1_500.0,
            volatility: Default::default(),
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMonth { month: 13, .. })
        ));

        config.expense_periods[0].start_month = 1;
        config.expense_periods[0].start_year = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidYear { year: 0, .. })
        ));

        config.expense_periods[0].start_year = 1;
        config.expense_periods[0].amount_min = 3_000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_one_time_expense_checks() {
        let mut config = SimConfig::default();
        config.one_time_expenses.push(OneTimeExpense::new(2, 6, -100.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "amount", .. })
        ));

        config.one_time_expenses[0] = OneTimeExpense::new(1, 0, 100.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMonth { .. })
        ));
    }

    #[test]
    fn test_currency_checks() {
        let mut config = SimConfig::default();
        let mut eur = CurrencySettings::fixed("EUR", 1.1);
        eur.initial_price = -1.0;
        config.currencies.push(eur);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "initial_price",
                ..
            })
        ));

        config.currencies[0] = CurrencySettings {
            conversion_fee_pct: -1.0,
            ..CurrencySettings::fixed("EUR", 1.0)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bucket_checks() {
        let mut config = SimConfig::default();
        config.buckets.push(bucket("SP500"));
        assert!(config.validate().is_ok());

        config.buckets[0].growth_min_pct = 40.0;
        assert!(config.validate().is_err());

        config.buckets[0] = bucket("SP500");
        config.buckets[0].initial_price = 0.0;
        assert!(config.validate().is_err());

        config.buckets[0] = bucket("SP500");
        config.buckets[0].rebalancing.sell_trigger = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "sell_trigger",
                ..
            })
        ));

        config.buckets[0] = bucket("SP500");
        config.buckets[0].rebalancing.cash_floor_months = -2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_bucket_names() {
        let mut config = SimConfig::default();
        config.buckets.push(bucket("SP500"));
        config.buckets.push(bucket("SP500"));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateBucketName("SP500".to_string()))
        );
    }

    #[test]
    fn test_unresolved_standby_is_reported_not_rejected() {
        let mut config = SimConfig::default();
        let mut stocks = bucket("Stocks");
        stocks.rebalancing.standby_bucket = Some("Bonds".to_string());
        config.buckets.push(stocks);
        assert!(config.validate().is_ok());
        assert_eq!(config.unresolved_standby_links(), vec![("Stocks", "Bonds")]);
    }

    #[test]
    fn test_unpriced_currencies() {
        let mut config = SimConfig::default();
        let mut eur_bucket = bucket("Euro stocks");
        eur_bucket.currency = "EUR".to_string();
        config.buckets.push(eur_bucket.clone());
        eur_bucket.name = "Euro bonds".to_string();
        config.buckets.push(eur_bucket);
        assert_eq!(config.unpriced_currencies(), vec!["EUR"]);

        config.currencies.push(CurrencySettings::fixed("EUR", 1.1));
        assert!(config.unpriced_currencies().is_empty());
    }
}
