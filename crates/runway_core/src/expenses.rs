//! Monthly expense schedule
//!
//! Recurring [`ExpensePeriod`]s each cover the months from their own start to
//! the next period's start (or the end of the horizon). Every amount is
//! scaled by the cumulative inflation factor of its month.

use rand::Rng;

use crate::market::{clip, sample_normal};
use crate::model::{ExpensePeriod, OneTimeExpense};

/// Cumulative inflation factor per month: `F[m] = prod_{k <= m} (1 + inflation[k])`.
#[must_use]
pub fn cumulative_inflation(inflation: &[f64]) -> Vec<f64> {
    inflation
        .iter()
        .scan(1.0, |factor, rate| {
            *factor *= 1.0 + rate;
            Some(*factor)
        })
        .collect()
}

/// Index of the active period for each month, into `periods` sorted by start.
fn active_periods(sorted: &[&ExpensePeriod], n_months: usize) -> Vec<Option<usize>> {
    let mut active = vec![None; n_months];
    for (idx, period) in sorted.iter().enumerate() {
        let start = period.start_index().min(n_months);
        let end = sorted
            .get(idx + 1)
            .map_or(n_months, |next| next.start_index())
            .min(n_months);
        for slot in active.iter_mut().take(end).skip(start) {
            *slot = Some(idx);
        }
    }
    active
}

/// Build the inflation-adjusted monthly expense series.
///
/// `inflation` must hold at least `n_months` monthly fractions. Noisy periods
/// draw one value per active month, in month order. One-time expenses outside
/// the horizon are ignored; those sharing a month accumulate.
pub fn compute_monthly_expenses<R: Rng + ?Sized>(
    periods: &[ExpensePeriod],
    one_time: &[OneTimeExpense],
    inflation: &[f64],
    n_months: usize,
    rng: &mut R,
) -> Vec<f64> {
    let mut sorted: Vec<&ExpensePeriod> = periods.iter().collect();
    sorted.sort_by_key(|p| p.start_index());

    let factors = cumulative_inflation(&inflation[..n_months.min(inflation.len())]);
    let active = active_periods(&sorted, n_months);

    let mut expenses = vec![0.0; n_months];
    for (m, slot) in active.iter().enumerate() {
        let Some(idx) = *slot else {
            continue;
        };
        let period = sorted[idx];
        let params = period.volatility.params();
        let base = if params.is_constant() {
            period.amount_avg
        } else {
            clip(
                sample_normal(rng, period.amount_avg, params.monthly_sigma * period.amount_avg),
                period.amount_min,
                period.amount_max,
            )
        };
        expenses[m] = base * factors.get(m).copied().unwrap_or(1.0);
    }

    for expense in one_time {
        let m = expense.index();
        if m < n_months {
            expenses[m] += expense.amount * factors.get(m).copied().unwrap_or(1.0);
        }
    }

    expenses
}
