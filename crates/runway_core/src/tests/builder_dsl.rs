//! Tests for the Builder DSL
//!
//! These tests demonstrate and verify the fluent builder API for creating
//! configurations.

use crate::config::{BucketBuilder, SimConfig, SimConfigBuilder};
use crate::model::{CurrencySettings, RebalanceFrequency};
use crate::simulation::simulate;
use crate::volatility::VolatilityProfile;

/// Test SimConfigBuilder defaults match SimConfig defaults
#[test]
fn test_builder_starts_from_defaults() {
    let config = SimConfigBuilder::new().build();
    assert_eq!(config, SimConfig::default());
}

/// Test BucketBuilder presets
#[test]
fn test_bucket_presets() {
    let config = SimConfigBuilder::new()
        .bucket(BucketBuilder::cash("Cash"))
        .bucket(BucketBuilder::gov_bonds("Bonds"))
        .bucket(BucketBuilder::sp500("Stocks"))
        .bucket(BucketBuilder::gold("Gold"))
        .bucket(BucketBuilder::bitcoin("BTC"))
        .build();

    let profiles: Vec<VolatilityProfile> = config.buckets.iter().map(|b| b.volatility).collect();
    assert_eq!(
        profiles,
        vec![
            VolatilityProfile::Constant,
            VolatilityProfile::GovBonds,
            VolatilityProfile::Sp500,
            VolatilityProfile::Gold,
            VolatilityProfile::Bitcoin,
        ]
    );
    assert!(config.validate().is_ok(), "{:?}", config.validate());
}

/// Test a complete household plan built with the DSL
#[test]
fn test_complete_plan() {
    let config = SimConfigBuilder::new()
        .years(20)
        .expenses_currency("USD")
        .capital_gain_tax(15.0)
        .monthly_expense(1, 1, 4_000.0)
        .monthly_expense(11, 1, 3_000.0)
        .one_time_expense(3, 9, 40_000.0)
        .currency(CurrencySettings::fixed("EUR", 1.08))
        .bucket(BucketBuilder::cash("Cash").amount(48_000.0))
        .bucket(
            BucketBuilder::gov_bonds("Bonds")
                .amount(200_000.0)
                .fee(0.1)
                .spending_priority(1)
                .cash_floor_months(3.0),
        )
        .bucket(
            BucketBuilder::sp500("Stocks")
                .currency("EUR")
                .amount(700_000.0)
                .fee(0.2)
                .standby("Bonds")
                .yearly()
                .sell_trigger(2.0)
                .buy_trigger(3.0)
                .runway_months(24.0)
                .spending_priority(2),
        )
        .build();

    assert!(config.validate().is_ok());
    assert!(config.unresolved_standby_links().is_empty());
    assert!(config.unpriced_currencies().is_empty());

    let stocks = config.bucket("Stocks").unwrap();
    assert_eq!(stocks.rebalancing.frequency, RebalanceFrequency::Yearly);
    assert_eq!(stocks.rebalancing.sell_trigger, 2.0);
    assert_eq!(stocks.rebalancing.buy_trigger, 3.0);
    assert_eq!(stocks.rebalancing.required_runaway_months, 24.0);

    let table = simulate(&config, 99);
    assert_eq!(table.len(), 240);
    assert_eq!(table.bucket_names, vec!["Cash", "Bonds", "Stocks"]);
}

/// Test that the builder output round-trips through serde
#[test]
fn test_builder_config_serializes() {
    let config = SimConfigBuilder::new()
        .years(5)
        .monthly_expense(1, 1, 1_000.0)
        .bucket(BucketBuilder::sp500("Stocks").amount(100_000.0).standby("Cash"))
        .bucket(BucketBuilder::cash("Cash").amount(10_000.0))
        .build();

    let json = serde_json::to_string(&config).unwrap();
    let parsed: SimConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
