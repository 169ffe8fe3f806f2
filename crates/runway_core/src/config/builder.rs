//! Configuration Builder DSL
//!
//! Fluent API for assembling a [`SimConfig`]. Buckets are described with
//! [`BucketBuilder`] presets and wired to each other by name.
//!
//! # Example
//!
//! ```ignore
//! use runway_core::config::{BucketBuilder, SimConfigBuilder};
//! use runway_core::model::InflationSettings;
//!
//! let config = SimConfigBuilder::new()
//!     .years(25)
//!     .inflation(InflationSettings::default())
//!     .monthly_expense(1, 1, 3_500.0)
//!     .one_time_expense(5, 6, 20_000.0)
//!     .bucket(BucketBuilder::cash("Cash").amount(40_000.0).cash_floor_months(0.0))
//!     .bucket(BucketBuilder::gov_bonds("Bonds").amount(150_000.0).spending_priority(1))
//!     .bucket(BucketBuilder::sp500("Stocks")
//!         .amount(600_000.0)
//!         .standby("Bonds")
//!         .spending_priority(2))
//!     .build();
//! ```

use super::SimConfig;
use crate::model::{
    CurrencySettings, ExpensePeriod, InflationSettings, InvestmentBucket, OneTimeExpense,
    RebalanceFrequency, RebalancingParams,
};
use crate::volatility::{ExpenseVolatility, VolatilityProfile};

/// Builder for creating configurations
#[derive(Debug, Clone, Default)]
pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    /// Start from [`SimConfig::default`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Basic Configuration
    // =========================================================================

    /// Set the simulation horizon in years
    #[must_use]
    pub fn years(mut self, years: u32) -> Self {
        self.config.period_years = years;
        self
    }

    #[must_use]
    pub fn expenses_currency(mut self, code: impl Into<String>) -> Self {
        self.config.expenses_currency = code.into();
        self
    }

    /// Capital-gains tax percentage applied to realized gains
    #[must_use]
    pub fn capital_gain_tax(mut self, pct: f64) -> Self {
        self.config.capital_gain_tax_pct = pct;
        self
    }

    #[must_use]
    pub fn hedge_amount(mut self, amount: f64) -> Self {
        self.config.hedge_amount = amount;
        self
    }

    #[must_use]
    pub fn inflation(mut self, settings: InflationSettings) -> Self {
        self.config.inflation = settings;
        self
    }

    /// Pin inflation to a fixed annual percentage
    #[must_use]
    pub fn fixed_inflation(self, pct: f64) -> Self {
        self.inflation(InflationSettings::fixed(pct))
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    #[must_use]
    pub fn expense_period(mut self, period: ExpensePeriod) -> Self {
        self.config.expense_periods.push(period);
        self
    }

    /// Fixed monthly expense starting at the given 1-based (year, month)
    #[must_use]
    pub fn monthly_expense(self, start_year: u32, start_month: u32, amount: f64) -> Self {
        self.expense_period(ExpensePeriod::constant(start_year, start_month, amount))
    }

    /// Noisy monthly expense drawn around `avg` and clamped to `[min, max]`
    #[must_use]
    pub fn variable_expense(
        self,
        start_year: u32,
        start_month: u32,
        (min, avg, max): (f64, f64, f64),
        volatility: ExpenseVolatility,
    ) -> Self {
        self.expense_period(ExpensePeriod {
            start_month,
            start_year,
            amount_min: min,
            amount_max: max,
            amount_avg: avg,
            volatility,
        })
    }

    #[must_use]
    pub fn one_time_expense(mut self, year: u32, month: u32, amount: f64) -> Self {
        self.config
            .one_time_expenses
            .push(OneTimeExpense::new(year, month, amount));
        self
    }

    // =========================================================================
    // Buckets and currencies
    // =========================================================================

    #[must_use]
    pub fn bucket(mut self, builder: BucketBuilder) -> Self {
        self.config.buckets.push(builder.build());
        self
    }

    #[must_use]
    pub fn currency(mut self, settings: CurrencySettings) -> Self {
        self.config.currencies.push(settings);
        self
    }

    /// Build the configuration. No validation is performed.
    #[must_use]
    pub fn build(self) -> SimConfig {
        self.config
    }
}

/// Builder for an investment bucket
#[derive(Debug, Clone)]
pub struct BucketBuilder {
    bucket: InvestmentBucket,
}

impl BucketBuilder {
    /// A bucket priced at 1.0 with zero growth and S&P 500 volatility
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            bucket: InvestmentBucket {
                name: name.into(),
                currency: "USD".to_string(),
                initial_price: 1.0,
                initial_amount: 0.0,
                growth_min_pct: 0.0,
                growth_max_pct: 0.0,
                growth_avg_pct: 0.0,
                volatility: VolatilityProfile::default(),
                buy_sell_fee_pct: 0.0,
                target_growth_pct: 7.0,
                rebalancing: RebalancingParams::default(),
            },
        }
    }

    // =========================================================================
    // Common Bucket Presets
    // =========================================================================

    /// Cash at a constant price; never skims
    #[must_use]
    pub fn cash(name: impl Into<String>) -> Self {
        Self::new(name)
            .volatility(VolatilityProfile::Constant)
            .target_growth(0.0)
            .runway_months(0.0)
    }

    /// Broad US equity index
    #[must_use]
    pub fn sp500(name: impl Into<String>) -> Self {
        Self::new(name)
            .price(100.0)
            .growth(-10.0, 10.0, 30.0)
            .volatility(VolatilityProfile::Sp500)
            .target_growth(7.0)
    }

    /// Government bonds
    #[must_use]
    pub fn gov_bonds(name: impl Into<String>) -> Self {
        Self::new(name)
            .price(100.0)
            .growth(0.0, 3.0, 6.0)
            .volatility(VolatilityProfile::GovBonds)
            .target_growth(3.0)
    }

    #[must_use]
    pub fn gold(name: impl Into<String>) -> Self {
        Self::new(name)
            .price(100.0)
            .growth(-5.0, 5.0, 20.0)
            .volatility(VolatilityProfile::Gold)
            .target_growth(5.0)
    }

    #[must_use]
    pub fn bitcoin(name: impl Into<String>) -> Self {
        Self::new(name)
            .price(50_000.0)
            .growth(-50.0, 20.0, 200.0)
            .volatility(VolatilityProfile::Bitcoin)
            .target_growth(20.0)
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    #[must_use]
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.bucket.currency = code.into();
        self
    }

    /// Set the initial price per unit
    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.bucket.initial_price = price;
        self
    }

    /// Set the initial holding, in the bucket currency
    #[must_use]
    pub fn amount(mut self, amount: f64) -> Self {
        self.bucket.initial_amount = amount;
        self
    }

    /// Annual growth bounds in percent
    #[must_use]
    pub fn growth(mut self, min: f64, avg: f64, max: f64) -> Self {
        self.bucket.growth_min_pct = min;
        self.bucket.growth_avg_pct = avg;
        self.bucket.growth_max_pct = max;
        self
    }

    /// Deterministic growth at a fixed annual percentage
    #[must_use]
    pub fn fixed_growth(self, pct: f64) -> Self {
        self.growth(pct, pct, pct)
            .volatility(VolatilityProfile::Constant)
    }

    #[must_use]
    pub fn volatility(mut self, profile: VolatilityProfile) -> Self {
        self.bucket.volatility = profile;
        self
    }

    #[must_use]
    pub fn fee(mut self, pct: f64) -> Self {
        self.bucket.buy_sell_fee_pct = pct;
        self
    }

    #[must_use]
    pub fn target_growth(mut self, pct: f64) -> Self {
        self.bucket.target_growth_pct = pct;
        self
    }

    #[must_use]
    pub fn yearly(mut self) -> Self {
        self.bucket.rebalancing.frequency = RebalanceFrequency::Yearly;
        self
    }

    #[must_use]
    pub fn sell_trigger(mut self, ratio: f64) -> Self {
        self.bucket.rebalancing.sell_trigger = ratio;
        self
    }

    /// Name of the bucket that receives skimmed proceeds
    #[must_use]
    pub fn standby(mut self, name: impl Into<String>) -> Self {
        self.bucket.rebalancing.standby_bucket = Some(name.into());
        self
    }

    #[must_use]
    pub fn buy_trigger(mut self, pct: f64) -> Self {
        self.bucket.rebalancing.buy_trigger = pct;
        self
    }

    #[must_use]
    pub fn buying_priority(mut self, priority: i32) -> Self {
        self.bucket.rebalancing.buying_priority = priority;
        self
    }

    /// Months of portfolio runway required before skimming
    #[must_use]
    pub fn runway_months(mut self, months: f64) -> Self {
        self.bucket.rebalancing.required_runaway_months = months;
        self
    }

    #[must_use]
    pub fn spending_priority(mut self, priority: i32) -> Self {
        self.bucket.rebalancing.spending_priority = priority;
        self
    }

    #[must_use]
    pub fn cash_floor_months(mut self, months: f64) -> Self {
        self.bucket.rebalancing.cash_floor_months = months;
        self
    }

    #[must_use]
    pub fn build(self) -> InvestmentBucket {
        self.bucket
    }
}
