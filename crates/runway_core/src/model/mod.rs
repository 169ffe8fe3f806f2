mod bucket;
mod currency;
mod expense;
mod inflation;
mod results;

pub use bucket::{InvestmentBucket, RebalanceFrequency, RebalancingParams};
pub use currency::CurrencySettings;
pub use expense::{ExpensePeriod, OneTimeExpense, month_index};
pub use inflation::InflationSettings;
pub use results::{
    BucketMonth, MonteCarloResult, MonthlyRow, MonthlyTable, PercentileRow, PercentileTable,
};
