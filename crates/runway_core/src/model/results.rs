//! Simulation results
//!
//! A single trial produces a [`MonthlyTable`]: one [`MonthlyRow`] per simulated
//! month with a [`BucketMonth`] per configured bucket. A Monte Carlo batch
//! produces three [`PercentileTable`]s with the same month layout.
//!
//! Both table types expose a flat columnar view (`column_names` / `column`)
//! whose names are `year`, `month`, `inflation`, `expenses`,
//! `total_net_spent` and `<bucket>_<field>` for per-bucket fields.

use serde::{Deserialize, Serialize};

/// End-of-month snapshot of one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketMonth {
    /// Price per unit in the bucket currency
    pub price: f64,
    /// Price per unit in the expenses currency
    pub price_exp: f64,
    /// Holding in the bucket currency
    pub amount: f64,
    /// Holding in the expenses currency
    pub amount_exp: f64,
    /// Sold this month, bucket currency
    pub sold: f64,
    /// Sold this month, expenses currency
    pub sold_exp: f64,
    /// Bought this month, bucket currency
    pub bought: f64,
    /// Fees this month, expenses currency
    pub fees: f64,
    /// Capital-gains tax this month, expenses currency
    pub tax: f64,
    /// Contribution to the month's expenses, expenses currency
    pub net_spent: f64,
}

type BucketField = (&'static str, fn(&BucketMonth) -> f64);

static BUCKET_FIELDS: [BucketField; 10] = [
    ("price", |b| b.price),
    ("price_exp", |b| b.price_exp),
    ("amount", |b| b.amount),
    ("amount_exp", |b| b.amount_exp),
    ("sold", |b| b.sold),
    ("sold_exp", |b| b.sold_exp),
    ("bought", |b| b.bought),
    ("fees", |b| b.fees),
    ("tax", |b| b.tax),
    ("net_spent", |b| b.net_spent),
];

/// Split `<bucket>_<field>` into (bucket index, field suffix).
///
/// Bucket names may themselves contain underscores, so a prefix only matches
/// when the remainder is a known field.
fn split_bucket_column<'a>(
    bucket_names: &[String],
    column: &'a str,
    is_field: impl Fn(&str) -> bool,
) -> Option<(usize, &'a str)> {
    bucket_names.iter().enumerate().find_map(|(idx, name)| {
        column
            .strip_prefix(name.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|suffix| is_field(*suffix))
            .map(|suffix| (idx, suffix))
    })
}

/// One simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    /// 1-based simulation year
    pub year: u32,
    /// 1..=12
    pub month: u32,
    /// Monthly inflation as a fraction
    pub inflation: f64,
    pub expenses: f64,
    pub total_net_spent: f64,
    /// One entry per bucket, in configuration order
    pub buckets: Vec<BucketMonth>,
}

impl MonthlyRow {
    /// Uncovered part of the month's expenses (zero when fully covered)
    #[must_use]
    pub fn shortfall(&self) -> f64 {
        (self.expenses - self.total_net_spent).max(0.0)
    }

    /// Total holdings in the expenses currency
    #[must_use]
    pub fn portfolio_value(&self) -> f64 {
        self.buckets.iter().map(|b| b.amount_exp).sum()
    }
}

/// Ordered output of a single trial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTable {
    pub bucket_names: Vec<String>,
    pub rows: Vec<MonthlyRow>,
}

impl MonthlyTable {
    #[must_use]
    pub fn new(bucket_names: Vec<String>, capacity: usize) -> Self {
        Self {
            bucket_names,
            rows: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a bucket in every row's `buckets`
    #[must_use]
    pub fn bucket_index(&self, name: &str) -> Option<usize> {
        self.bucket_names.iter().position(|n| n == name)
    }

    /// Monthly snapshots of one bucket
    pub fn bucket_series(&self, name: &str) -> Option<impl Iterator<Item = &BucketMonth>> {
        let idx = self.bucket_index(name)?;
        Some(self.rows.iter().map(move |row| &row.buckets[idx]))
    }

    /// True when every month's net spending reaches its expenses within `tolerance`
    #[must_use]
    pub fn is_fully_funded(&self, tolerance: f64) -> bool {
        self.rows
            .iter()
            .all(|row| row.total_net_spent >= row.expenses - tolerance)
    }

    /// Sum of uncovered expenses across all months
    #[must_use]
    pub fn total_shortfall(&self) -> f64 {
        self.rows.iter().map(MonthlyRow::shortfall).sum()
    }

    /// Flat column names in output order
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ["year", "month", "inflation", "expenses", "total_net_spent"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        for bucket in &self.bucket_names {
            for (suffix, _) in BUCKET_FIELDS.iter() {
                names.push(format!("{bucket}_{suffix}"));
            }
        }
        names
    }

    /// Values of a flat column, one per month
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let getter: fn(&MonthlyRow) -> f64 = match name {
            "year" => |r| f64::from(r.year),
            "month" => |r| f64::from(r.month),
            "inflation" => |r| r.inflation,
            "expenses" => |r| r.expenses,
            "total_net_spent" => |r| r.total_net_spent,
            _ => {
                let (idx, suffix) = split_bucket_column(&self.bucket_names, name, |s| {
                    BUCKET_FIELDS.iter().any(|(field, _)| *field == s)
                })?;
                let (_, field) = BUCKET_FIELDS.iter().find(|(s, _)| *s == suffix)?;
                return Some(self.rows.iter().map(|r| field(&r.buckets[idx])).collect());
            }
        };
        Some(self.rows.iter().map(getter).collect())
    }
}

/// One month of a percentile envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileRow {
    pub year: u32,
    pub month: u32,
    pub expenses: f64,
    pub total_net_spent: f64,
    /// Holding in the expenses currency, one per bucket
    pub amount_exp: Vec<f64>,
}

/// Per-column marginal percentile across trials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentileTable {
    /// Percentile in 0..=100
    pub percentile: f64,
    pub bucket_names: Vec<String>,
    pub rows: Vec<PercentileRow>,
}

impl PercentileTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&PercentileRow> {
        self.rows.last()
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ["year", "month", "total_net_spent", "expenses"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        names.extend(self.bucket_names.iter().map(|b| format!("{b}_amount_exp")));
        names
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let getter: fn(&PercentileRow) -> f64 = match name {
            "year" => |r| f64::from(r.year),
            "month" => |r| f64::from(r.month),
            "expenses" => |r| r.expenses,
            "total_net_spent" => |r| r.total_net_spent,
            _ => {
                let (idx, _) =
                    split_bucket_column(&self.bucket_names, name, |s| s == "amount_exp")?;
                return Some(self.rows.iter().map(|r| r.amount_exp[idx]).collect());
            }
        };
        Some(self.rows.iter().map(getter).collect())
    }
}

/// Aggregated outcome of a Monte Carlo batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub n_simulations: usize,
    pub success_count: usize,
    /// 0.0 to 1.0
    pub success_rate: f64,
    pub percentile_10: PercentileTable,
    pub percentile_50: PercentileTable,
    pub percentile_90: PercentileTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> MonthlyTable {
        let mut table = MonthlyTable::new(vec!["Cash".to_string(), "Cash_EUR".to_string()], 2);
        for m in 0..2u32 {
            table.rows.push(MonthlyRow {
                year: 1,
                month: m + 1,
                inflation: 0.0,
                expenses: 100.0,
                total_net_spent: 100.0 - f64::from(m) * 50.0,
                buckets: vec![
                    BucketMonth {
                        price: 1.0,
                        amount: 1_000.0 - f64::from(m),
                        ..Default::default()
                    },
                    BucketMonth {
                        price: 2.0,
                        amount: 5.0,
                        ..Default::default()
                    },
                ],
            });
        }
        table
    }

    #[test]
    fn test_column_names_layout() {
        let table = sample_table();
        let names = table.column_names();
        assert_eq!(names.len(), 5 + 2 * 10);
        assert_eq!(names[5], "Cash_price");
        assert!(names.contains(&"Cash_EUR_net_spent".to_string()));
    }

    #[test]
    fn test_column_lookup_resolves_bucket_prefixes() {
        let table = sample_table();
        assert_eq!(table.column("Cash_amount"), Some(vec![1_000.0, 999.0]));
        assert_eq!(table.column("Cash_EUR_price"), Some(vec![2.0, 2.0]));
        assert_eq!(table.column("month"), Some(vec![1.0, 2.0]));
        assert!(table.column("Cash_unknown").is_none());
        assert!(table.column("Bonds_price").is_none());
    }

    #[test]
    fn test_funding_and_shortfall() {
        let table = sample_table();
        assert!(!table.is_fully_funded(0.01));
        assert!((table.total_shortfall() - 50.0).abs() < 1e-12);
    }
}
