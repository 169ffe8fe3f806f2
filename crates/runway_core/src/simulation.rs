use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::analysis::{REPORTED_PERCENTILES, TrialSeries, percentile_tables};
use crate::config::SimConfig;
use crate::error::{Result, SimulationError};
use crate::expenses::compute_monthly_expenses;
use crate::market::MarketPaths;
use crate::model::{BucketMonth, MonteCarloResult, MonthlyRow, MonthlyTable};
use crate::rebalancer::{BucketState, FxTable, Rebalancer, get_fx_rate};

/// Run a single trial.
///
/// Market paths are drawn first (inflation, FX, bucket prices), then
/// expenses, all from `rng`. The configuration is assumed valid.
pub fn run_simulation<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> MonthlyTable {
    let n_months = config.n_months();
    let paths = MarketPaths::generate(config, rng);
    let expenses = compute_monthly_expenses(
        &config.expense_periods,
        &config.one_time_expenses,
        &paths.inflation,
        n_months,
        rng,
    );

    let mut states: Vec<BucketState> = config.buckets.iter().map(BucketState::from_bucket).collect();
    let rebalancer = Rebalancer::from_config(config, &states);
    let mut fx_rates = FxTable::default();
    let mut table = MonthlyTable::new(
        config.buckets.iter().map(|b| b.name.clone()).collect(),
        n_months,
    );

    for m in 0..n_months {
        for (state, prices) in states.iter_mut().zip(&paths.prices) {
            state.price = prices[m];
        }
        for (currency, series) in config.currencies.iter().zip(&paths.fx) {
            fx_rates.insert(currency.code.clone(), series[m]);
        }

        rebalancer.execute(&mut states, expenses[m], &fx_rates, m);

        let buckets = states
            .iter()
            .map(|b| {
                let fx = get_fx_rate(&b.currency, &config.expenses_currency, &fx_rates);
                BucketMonth {
                    price: b.price,
                    price_exp: b.price * fx,
                    amount: b.amount,
                    amount_exp: b.amount * fx,
                    sold: b.amount_sold,
                    sold_exp: b.amount_sold * fx,
                    bought: b.amount_bought,
                    fees: b.fees_paid,
                    tax: b.tax_paid,
                    net_spent: b.net_spent,
                }
            })
            .collect();

        table.rows.push(MonthlyRow {
            year: (m / 12 + 1) as u32,
            month: (m % 12 + 1) as u32,
            inflation: paths.inflation[m],
            expenses: expenses[m],
            total_net_spent: states.iter().map(|b| b.net_spent).sum(),
            buckets,
        });
    }

    table
}

/// Run a single trial from a fresh RNG seeded with `seed`.
pub fn simulate(config: &SimConfig, seed: u64) -> MonthlyTable {
    let mut rng = SmallRng::seed_from_u64(seed);
    run_simulation(config, &mut rng)
}

/// Progress tracking and cancellation for a Monte Carlo batch
#[derive(Debug, Clone, Default)]
pub struct MonteCarloProgress {
    /// Completed trials counter
    completed: Arc<AtomicUsize>,
    /// Cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl MonteCarloProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of completed trials
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Request cancellation; trials not yet started are skipped
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Reset for a new batch
    pub fn reset(&self) {
        self.completed.store(0, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }
}

/// Callback invoked after each finished trial with `(completed, total)`
pub type ProgressCallback<'a> = &'a (dyn Fn(usize, usize) + Sync);

/// Run `n_simulations` independent trials and aggregate them.
///
/// Each trial gets its own child seed drawn from a base RNG seeded with
/// `seed` (or OS entropy when `None`), so a fixed seed reproduces the whole
/// batch bit for bit regardless of trial scheduling.
pub fn run_monte_carlo(
    config: &SimConfig,
    n_simulations: usize,
    seed: Option<u64>,
    progress_callback: Option<ProgressCallback<'_>>,
) -> Result<MonteCarloResult> {
    monte_carlo(config, n_simulations, seed, progress_callback, &MonteCarloProgress::new())
}

/// [`run_monte_carlo`] reporting through a shared [`MonteCarloProgress`].
///
/// The completed count restarts at zero for every batch; the cancellation
/// flag is left as the caller set it. Returns [`SimulationError::Cancelled`]
/// if cancellation was requested before every trial had started.
pub fn run_monte_carlo_with_progress(
    config: &SimConfig,
    n_simulations: usize,
    seed: Option<u64>,
    progress: &MonteCarloProgress,
    progress_callback: Option<ProgressCallback<'_>>,
) -> Result<MonteCarloResult> {
    monte_carlo(config, n_simulations, seed, progress_callback, progress)
}

fn monte_carlo(
    config: &SimConfig,
    n_simulations: usize,
    seed: Option<u64>,
    progress_callback: Option<ProgressCallback<'_>>,
    progress: &MonteCarloProgress,
) -> Result<MonteCarloResult> {
    if n_simulations == 0 {
        return Err(SimulationError::EmptyBatch);
    }

    let mut base_rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let child_seeds: Vec<u64> = (0..n_simulations).map(|_| base_rng.next_u64()).collect();
    progress.completed.store(0, Ordering::Relaxed);
    debug!(n_simulations, ?seed, months = config.n_months(), "starting monte carlo batch");

    let run_trial = |child_seed: &u64| -> Option<TrialSeries> {
        if progress.is_cancelled() {
            return None;
        }
        let series = TrialSeries::from_table(&simulate(config, *child_seed));
        let done = progress.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(callback) = progress_callback {
            callback(done, n_simulations);
        }
        Some(series)
    };

    #[cfg(feature = "parallel")]
    let trials: Vec<Option<TrialSeries>> = child_seeds.par_iter().map(run_trial).collect();
    #[cfg(not(feature = "parallel"))]
    let trials: Vec<Option<TrialSeries>> = child_seeds.iter().map(run_trial).collect();

    let trials: Vec<TrialSeries> = trials
        .into_iter()
        .collect::<Option<_>>()
        .ok_or(SimulationError::Cancelled)?;

    let success_count = trials.iter().filter(|t| t.success).count();
    let bucket_names: Vec<String> = config.buckets.iter().map(|b| b.name.clone()).collect();
    let [percentile_10, percentile_50, percentile_90] =
        percentile_tables(&trials, &bucket_names, &REPORTED_PERCENTILES);

    let success_rate = success_count as f64 / n_simulations as f64;
    debug!(success_count, success_rate, "monte carlo batch finished");

    Ok(MonteCarloResult {
        n_simulations,
        success_count,
        success_rate,
        percentile_10,
        percentile_50,
        percentile_90,
    })
}
