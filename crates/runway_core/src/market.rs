//! Stochastic path generators
//!
//! Each generator turns its parameters plus an RNG stream into a monthly
//! series of length `n_months`. A constant volatility profile short-circuits
//! to a deterministic series and consumes no randomness.
//!
//! [`MarketPaths::generate`] runs every generator a trial needs in a fixed
//! order (inflation, FX in configured order, bucket prices in configured
//! order) so that a given seed always reproduces the same paths.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::config::SimConfig;
use crate::model::{CurrencySettings, InflationSettings, InvestmentBucket};

/// Monthly mean-reversion speed of inflation toward its average
const INFLATION_REVERSION: f64 = 0.1;

/// Monthly mean-reversion speed of log FX toward log of its average
const FX_REVERSION: f64 = 0.05;

/// Slack added to the monthly log-return bounds of bucket prices
const LOG_RETURN_SLACK: f64 = 0.01;

/// Lowest price a bucket can reach
const PRICE_FLOOR: f64 = 0.001;

/// Draw from N(mean, sd).
#[inline]
pub(crate) fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    mean + sd * z
}

/// Bound `value` to `[lo, hi]` without the ordering assertion of `f64::clamp`.
#[inline]
pub(crate) fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Simulate monthly inflation as a mean-reverting random walk.
///
/// Values are monthly fractions (0.002 is 0.2% for the month), clamped to the
/// annual bounds divided by 12.
pub fn simulate_monthly_inflation<R: Rng + ?Sized>(
    settings: &InflationSettings,
    n_months: usize,
    rng: &mut R,
) -> Vec<f64> {
    let params = settings.volatility.params();
    let avg = settings.avg_pct / 100.0 / 12.0;
    let min = settings.min_pct / 100.0 / 12.0;
    let max = settings.max_pct / 100.0 / 12.0;

    if params.is_constant() {
        return vec![avg; n_months];
    }

    let shock_sd = params.monthly_sigma / 12.0;
    let mut current = avg;
    (0..n_months)
        .map(|_| {
            let drift = INFLATION_REVERSION * (avg - current);
            let shock = sample_normal(rng, 0.0, shock_sd);
            current = clip(current + drift + shock, min, max);
            current
        })
        .collect()
}

/// Simulate the monthly price of one unit of `settings.code` in the expenses
/// currency.
///
/// The walk is mean-reverting in log space and clamped to
/// `[min_price, max_price]`. A constant profile pins the series at
/// `avg_price`.
pub fn simulate_fx_rates<R: Rng + ?Sized>(
    settings: &CurrencySettings,
    n_months: usize,
    rng: &mut R,
) -> Vec<f64> {
    let params = settings.volatility.params();
    if params.is_constant() {
        return vec![settings.avg_price; n_months];
    }

    let log_avg = settings.avg_price.ln();
    let mut current = settings.initial_price;
    (0..n_months)
        .map(|_| {
            let log_current = current.ln();
            let drift = FX_REVERSION * (log_avg - log_current);
            let shock = sample_normal(rng, 0.0, params.monthly_sigma);
            current = clip(
                (log_current + drift + shock).exp(),
                settings.min_price,
                settings.max_price,
            );
            current
        })
        .collect()
}

/// Simulate monthly prices of a bucket in its own currency.
///
/// Constant buckets compound the average annual growth monthly, so the first
/// entry is already one month of growth past the initial price. Otherwise each
/// month draws a log-return around `ln(1 + avg) / 12`, clipped to the monthly
/// log bounds widened by [`LOG_RETURN_SLACK`], and floors the price at
/// [`PRICE_FLOOR`].
pub fn simulate_bucket_prices<R: Rng + ?Sized>(
    bucket: &InvestmentBucket,
    n_months: usize,
    rng: &mut R,
) -> Vec<f64> {
    let params = bucket.volatility.params();
    let mut current = bucket.initial_price;

    if params.is_constant() {
        let monthly_growth = (1.0 + bucket.growth_avg_pct / 100.0).powf(1.0 / 12.0) - 1.0;
        return (0..n_months)
            .map(|_| {
                current *= 1.0 + monthly_growth;
                current
            })
            .collect();
    }

    let drift = (1.0 + bucket.growth_avg_pct / 100.0).ln() / 12.0;
    let min_log = (1.0 + bucket.growth_min_pct / 100.0).ln() / 12.0 - LOG_RETURN_SLACK;
    let max_log = (1.0 + bucket.growth_max_pct / 100.0).ln() / 12.0 + LOG_RETURN_SLACK;

    (0..n_months)
        .map(|_| {
            let log_return = clip(sample_normal(rng, drift, params.monthly_sigma), min_log, max_log);
            current = (current * log_return.exp()).max(PRICE_FLOOR);
            current
        })
        .collect()
}

/// Every random path of one trial except expenses
#[derive(Debug, Clone, PartialEq)]
pub struct MarketPaths {
    /// Monthly inflation fractions
    pub inflation: Vec<f64>,
    /// One series per entry of `config.currencies`, same order
    pub fx: Vec<Vec<f64>>,
    /// One series per entry of `config.buckets`, same order
    pub prices: Vec<Vec<f64>>,
}

impl MarketPaths {
    /// Draw all market paths for a trial in the reproducible order.
    pub fn generate<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Self {
        let n_months = config.n_months();
        let inflation = simulate_monthly_inflation(&config.inflation, n_months, rng);
        let fx = config
            .currencies
            .iter()
            .map(|c| simulate_fx_rates(c, n_months, rng))
            .collect();
        let prices = config
            .buckets
            .iter()
            .map(|b| simulate_bucket_prices(b, n_months, rng))
            .collect();
        Self {
            inflation,
            fx,
            prices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BucketBuilder;
    use crate::volatility::{InflationVolatility, VolatilityProfile};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_constant_inflation_is_pinned() {
        let settings = InflationSettings::fixed(3.0);
        for seed in [0, 7, 99] {
            let mut rng = SmallRng::seed_from_u64(seed);
            let rates = simulate_monthly_inflation(&settings, 36, &mut rng);
            assert_eq!(rates.len(), 36);
            assert!(rates.iter().all(|r| *r == 3.0 / 100.0 / 12.0));
        }
    }

    #[test]
    fn test_inflation_stays_in_bounds() {
        let settings = InflationSettings {
            min_pct: 1.0,
            max_pct: 5.0,
            avg_pct: 2.5,
            volatility: InflationVolatility::Crazy,
        };
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let rates = simulate_monthly_inflation(&settings, 1_200, &mut rng);
            for r in rates {
                assert!(
                    (0.01 / 12.0..=0.05 / 12.0).contains(&r),
                    "inflation {r} out of bounds (seed {seed})"
                );
            }
        }
    }

    #[test]
    fn test_constant_fx_uses_average() {
        let mut eur = CurrencySettings::fixed("EUR", 1.1);
        eur.initial_price = 1.3;
        eur.max_price = 1.3;
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let rates = simulate_fx_rates(&eur, 12, &mut rng);
            assert_eq!(rates.len(), 12);
            assert!(rates.iter().all(|r| *r == 1.1), "seed {seed}");
        }
    }

    #[test]
    fn test_fx_stays_in_bounds() {
        let settings = CurrencySettings {
            code: "EUR".to_string(),
            initial_price: 1.1,
            min_price: 0.9,
            max_price: 1.4,
            avg_price: 1.1,
            volatility: VolatilityProfile::Bitcoin,
            conversion_fee_pct: 0.0,
        };
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            for r in simulate_fx_rates(&settings, 1_200, &mut rng) {
                assert!((0.9..=1.4).contains(&r), "fx {r} out of bounds (seed {seed})");
            }
        }
    }

    #[test]
    fn test_constant_bucket_compounds_from_first_month() {
        let bucket = BucketBuilder::new("Bonds")
            .price(100.0)
            .fixed_growth(12.0)
            .build();
        let g = 1.12_f64.powf(1.0 / 12.0) - 1.0;

        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let prices = simulate_bucket_prices(&bucket, 24, &mut rng);
            assert!((prices[0] - 100.0 * (1.0 + g)).abs() < 1e-9, "seed {seed}");
            assert!(
                (prices[11] - 112.0).abs() < 1e-6,
                "one year of growth should give 112, got {} (seed {seed})",
                prices[11]
            );
            assert!((prices[23] - 125.44).abs() < 1e-6, "seed {seed}");
        }
    }

    #[test]
    fn test_bucket_prices_stay_positive() {
        let bucket = BucketBuilder::bitcoin("BTC")
            .growth(-90.0, -50.0, 10.0)
            .build();
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let prices = simulate_bucket_prices(&bucket, 1_200, &mut rng);
            assert!(prices.iter().all(|p| *p > 0.0));
            assert!(prices.iter().all(|p| *p >= PRICE_FLOOR));
        }
    }

    #[test]
    fn test_generators_are_seed_reproducible() {
        let bucket = BucketBuilder::sp500("Stocks").build();
        let a = simulate_bucket_prices(&bucket, 120, &mut SmallRng::seed_from_u64(42));
        let b = simulate_bucket_prices(&bucket, 120, &mut SmallRng::seed_from_u64(42));
        let c = simulate_bucket_prices(&bucket, 120, &mut SmallRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_constant_series_consume_no_randomness() {
        use rand::RngCore;

        let mut config = SimConfig::default();
        config.inflation = InflationSettings::NONE;
        config.buckets.push(BucketBuilder::cash("Cash").build());
        config.currencies.push(CurrencySettings::fixed("EUR", 1.1));

        let mut rng = SmallRng::seed_from_u64(5);
        let _ = MarketPaths::generate(&config, &mut rng);
        let mut fresh = SmallRng::seed_from_u64(5);
        assert_eq!(rng.next_u64(), fresh.next_u64());
    }
}
