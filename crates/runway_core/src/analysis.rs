//! Monte Carlo statistics
//!
//! Percentiles are computed independently per column and per month
//! (marginal envelopes), using linear interpolation between closest ranks.

use crate::model::{MonthlyTable, PercentileRow, PercentileTable};

/// Absolute tolerance below which a month's shortfall still counts as covered
pub const SUCCESS_TOLERANCE: f64 = 0.01;

/// Percentiles reported by a Monte Carlo batch
pub const REPORTED_PERCENTILES: [f64; 3] = [10.0, 50.0, 90.0];

/// Percentile `p` (0..=100) of already sorted values.
///
/// Returns `NaN` for an empty slice.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let weight = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * weight
        }
    }
}

/// Percentile `p` (0..=100) of unsorted values.
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, p)
}

/// True when every month's net spending covers its expenses within
/// [`SUCCESS_TOLERANCE`].
#[must_use]
pub fn is_success(table: &MonthlyTable) -> bool {
    table.is_fully_funded(SUCCESS_TOLERANCE)
}

/// The columns of one trial that a Monte Carlo batch aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSeries {
    pub success: bool,
    pub expenses: Vec<f64>,
    pub total_net_spent: Vec<f64>,
    /// Holding in the expenses currency, indexed `[bucket][month]`
    pub amount_exp: Vec<Vec<f64>>,
}

impl TrialSeries {
    #[must_use]
    pub fn from_table(table: &MonthlyTable) -> Self {
        let amount_exp = (0..table.bucket_names.len())
            .map(|b| table.rows.iter().map(|r| r.buckets[b].amount_exp).collect())
            .collect();
        Self {
            success: is_success(table),
            expenses: table.rows.iter().map(|r| r.expenses).collect(),
            total_net_spent: table.rows.iter().map(|r| r.total_net_spent).collect(),
            amount_exp,
        }
    }

    #[must_use]
    pub fn n_months(&self) -> usize {
        self.expenses.len()
    }
}

/// Evaluate each requested percentile of a column gathered across trials.
fn column_percentiles(mut values: Vec<f64>, percentiles: &[f64]) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    percentiles
        .iter()
        .map(|p| percentile_sorted(&values, *p))
        .collect()
}

/// Build one [`PercentileTable`] per requested percentile.
///
/// All trials must share the same month count and bucket layout, which
/// `bucket_names` describes. No trials yields empty envelopes.
#[must_use]
pub fn percentile_tables<const N: usize>(
    trials: &[TrialSeries],
    bucket_names: &[String],
    percentiles: &[f64; N],
) -> [PercentileTable; N] {
    let n_months = trials.first().map_or(0, TrialSeries::n_months);
    let mut out: [PercentileTable; N] = std::array::from_fn(|k| PercentileTable {
        percentile: percentiles[k],
        bucket_names: bucket_names.to_vec(),
        rows: Vec::with_capacity(n_months),
    });

    for m in 0..n_months {
        let expenses = column_percentiles(trials.iter().map(|t| t.expenses[m]).collect(), percentiles);
        let net_spent = column_percentiles(
            trials.iter().map(|t| t.total_net_spent[m]).collect(),
            percentiles,
        );
        let amounts: Vec<Vec<f64>> = (0..bucket_names.len())
            .map(|b| {
                column_percentiles(trials.iter().map(|t| t.amount_exp[b][m]).collect(), percentiles)
            })
            .collect();

        for (k, table) in out.iter_mut().enumerate() {
            table.rows.push(PercentileRow {
                year: (m / 12 + 1) as u32,
                month: (m % 12 + 1) as u32,
                expenses: expenses[k],
                total_net_spent: net_spent[k],
                amount_exp: amounts.iter().map(|a| a[k]).collect(),
            });
        }
    }

    out
}
