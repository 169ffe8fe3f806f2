//! Command-line front end for the runway simulator
//!
//! Loads YAML plans, validates them, runs single trials or Monte Carlo
//! batches through `runway_core`, and prints or exports the results.

pub mod logging;
pub mod report;
pub mod storage;

pub use logging::init_logging;

use runway_core::config::{BucketBuilder, SimConfig, SimConfigBuilder};
use runway_core::model::CurrencySettings;
use runway_core::volatility::{ExpenseVolatility, VolatilityProfile};

/// Starter plan written by `runway init`
pub fn example_config() -> SimConfig {
    SimConfigBuilder::new()
        .years(30)
        .expenses_currency("USD")
        .capital_gain_tax(15.0)
        .variable_expense(1, 1, (3_200.0, 3_800.0, 4_800.0), ExpenseVolatility::Moderate)
        .monthly_expense(20, 1, 3_000.0)
        .one_time_expense(4, 9, 25_000.0)
        .currency(CurrencySettings {
            code: "EUR".to_string(),
            initial_price: 1.08,
            min_price: 0.9,
            max_price: 1.35,
            avg_price: 1.1,
            volatility: VolatilityProfile::GovBonds,
            conversion_fee_pct: 0.0,
        })
        .bucket(BucketBuilder::cash("Cash").amount(45_000.0))
        .bucket(
            BucketBuilder::gov_bonds("Bonds")
                .amount(300_000.0)
                .fee(0.1)
                .spending_priority(1)
                .cash_floor_months(3.0),
        )
        .bucket(
            BucketBuilder::sp500("Stocks")
                .amount(650_000.0)
                .fee(0.1)
                .standby("Bonds")
                .runway_months(36.0)
                .spending_priority(2),
        )
        .bucket(
            BucketBuilder::sp500("EU Stocks")
                .currency("EUR")
                .price(80.0)
                .amount(120_000.0)
                .standby("Bonds")
                .yearly()
                .runway_months(36.0)
                .spending_priority(3),
        )
        .bucket(
            BucketBuilder::gold("Gold")
                .amount(40_000.0)
                .spending_priority(4),
        )
        .build()
}
