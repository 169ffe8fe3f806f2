//! Plain-text summaries and JSON export of simulation results

use std::fmt::Write as _;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use runway_core::model::{MonteCarloResult, MonthlyTable, PercentileTable};
use serde::Serialize;

use crate::storage::atomic_write;

/// One line per simulated year
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub year: u32,
    /// Expenses due over the year, in expenses currency
    pub expenses: f64,
    /// Unfunded expenses from the start of the trial through this year
    pub cumulative_shortfall: f64,
    /// Year-end holdings per bucket, in expenses currency
    pub holdings: Vec<f64>,
    /// Sum of `holdings`
    pub portfolio_value: f64,
}

pub fn yearly_summary(table: &MonthlyTable) -> Vec<YearSummary> {
    let mut years: Vec<YearSummary> = Vec::new();
    let mut shortfall = 0.0;

    for row in &table.rows {
        shortfall += row.shortfall();
        let holdings = row.buckets.iter().map(|b| b.amount_exp).collect();
        let portfolio_value = row.portfolio_value();
        match years.last_mut() {
            Some(summary) if summary.year == row.year => {
                summary.expenses += row.expenses;
                summary.cumulative_shortfall = shortfall;
                summary.holdings = holdings;
                summary.portfolio_value = portfolio_value;
            }
            _ => years.push(YearSummary {
                year: row.year,
                expenses: row.expenses,
                cumulative_shortfall: shortfall,
                holdings,
                portfolio_value,
            }),
        }
    }
    years
}

pub fn render_yearly_summary(table: &MonthlyTable) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:>4}  {:>12}  {:>12}", "year", "expenses", "shortfall");
    for name in &table.bucket_names {
        let _ = write!(out, "  {name:>12}");
    }
    let _ = writeln!(out, "  {:>14}", "portfolio");

    for summary in yearly_summary(table) {
        let _ = write!(
            out,
            "{:>4}  {:>12.0}  {:>12.0}",
            summary.year, summary.expenses, summary.cumulative_shortfall
        );
        for value in &summary.holdings {
            let _ = write!(out, "  {value:>12.0}");
        }
        let _ = writeln!(out, "  {:>14.0}", summary.portfolio_value);
    }
    out
}

fn final_total(table: &PercentileTable) -> f64 {
    table.last().map_or(0.0, |row| row.amount_exp.iter().sum())
}

pub fn render_monte_carlo_summary(result: &MonteCarloResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "success rate: {:.1}% ({} of {} trials fully funded)",
        result.success_rate * 100.0,
        result.success_count,
        result.n_simulations
    );

    let tables = [
        &result.percentile_10,
        &result.percentile_50,
        &result.percentile_90,
    ];
    let Some(last) = result.percentile_50.last() else {
        return out;
    };
    let _ = writeln!(out, "final month {}/{}:", last.year, last.month);
    let _ = writeln!(out, "{:>16}  {:>12}  {:>12}  {:>12}", "", "p10", "p50", "p90");

    // Percentiles are taken per column, so the rows need not sum to the total
    for (idx, name) in result.percentile_50.bucket_names.iter().enumerate() {
        let _ = write!(out, "{name:>16}");
        for table in tables {
            let value = table.last().map_or(0.0, |row| row.amount_exp[idx]);
            let _ = write!(out, "  {value:>12.0}");
        }
        let _ = writeln!(out);
    }
    let _ = write!(out, "{:>16}", "sum of buckets");
    for table in tables {
        let _ = write!(out, "  {:>12.0}", final_total(table));
    }
    let _ = writeln!(out);
    out
}

/// Pretty-printed JSON written atomically to `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> color_eyre::Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("Failed to serialize results")?;
    atomic_write(path, json.as_bytes())
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "results written");
    Ok(())
}
