//! Monthly rebalancing and withdrawal
//!
//! Each month runs in three steps over the bucket ledger:
//!
//! 0. Reset every bucket's monthly counters.
//! 1. **Target-trajectory skim.** In configuration order, a bucket whose
//!    growth outpaces its target by more than `sell_trigger` sells the part of
//!    its holding priced above the target, provided the whole portfolio still
//!    covers `required_runaway_months` of expenses. After-tax proceeds go to
//!    the standby bucket when its buy trigger fires and otherwise leave the
//!    ledger.
//! 2. **Expense cascade.** Buckets are drained in ascending
//!    `spending_priority` (ties keep configuration order), each keeping
//!    `cash_floor_months` of expenses, until the month's expense is covered.
//!
//! A shortfall is never an error; it is the gap between the month's expense
//! and the returned amount covered.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::config::SimConfig;
use crate::liquidation::{approximate_cost_basis, capital_gains_tax, compute_buy, compute_sell};
use crate::model::{InvestmentBucket, RebalanceFrequency};

/// Price of one unit of a currency in the expenses currency, keyed by code
pub type FxTable = FxHashMap<String, f64>;

/// Runtime ledger of one bucket during a trial
#[derive(Debug, Clone, PartialEq)]
pub struct BucketState {
    pub name: String,
    pub currency: String,
    /// Current price in the bucket currency
    pub price: f64,
    /// Holding in the bucket currency
    pub amount: f64,
    /// Anchor for growth and cost-basis calculations
    pub initial_price: f64,
    pub target_growth_pct: f64,
    pub buy_sell_fee_pct: f64,

    pub frequency: RebalanceFrequency,
    pub sell_trigger: f64,
    pub standby_bucket: Option<String>,
    pub buy_trigger: f64,
    pub buying_priority: i32,
    pub required_runaway_months: f64,
    pub spending_priority: i32,
    pub cash_floor_months: f64,

    // Monthly counters
    /// Sold this month, bucket currency
    pub amount_sold: f64,
    /// Bought this month, bucket currency
    pub amount_bought: f64,
    /// Expenses currency
    pub fees_paid: f64,
    /// Expenses currency
    pub tax_paid: f64,
    /// Expenses currency
    pub net_spent: f64,
}

impl BucketState {
    /// Fresh state at the configured initial price and holding
    #[must_use]
    pub fn from_bucket(bucket: &InvestmentBucket) -> Self {
        let params = &bucket.rebalancing;
        Self {
            name: bucket.name.clone(),
            currency: bucket.currency.clone(),
            price: bucket.initial_price,
            amount: bucket.initial_amount,
            initial_price: bucket.initial_price,
            target_growth_pct: bucket.target_growth_pct,
            buy_sell_fee_pct: bucket.buy_sell_fee_pct,
            frequency: params.frequency,
            sell_trigger: params.sell_trigger,
            standby_bucket: params.standby_bucket.clone(),
            buy_trigger: params.buy_trigger,
            buying_priority: params.buying_priority,
            required_runaway_months: params.required_runaway_months,
            spending_priority: params.spending_priority,
            cash_floor_months: params.cash_floor_months,
            amount_sold: 0.0,
            amount_bought: 0.0,
            fees_paid: 0.0,
            tax_paid: 0.0,
            net_spent: 0.0,
        }
    }

    pub fn reset_month_counters(&mut self) {
        self.amount_sold = 0.0;
        self.amount_bought = 0.0;
        self.fees_paid = 0.0;
        self.tax_paid = 0.0;
        self.net_spent = 0.0;
    }

    /// Price on the target trajectory: one period of target growth
    #[must_use]
    pub fn target_price(&self) -> f64 {
        self.initial_price * (1.0 + self.target_growth_pct / 100.0)
    }
}

/// Rate converting `bucket_currency` into the expenses currency.
///
/// Identity for the expenses currency itself; a currency missing from the
/// table also converts at 1.
#[must_use]
pub fn get_fx_rate(bucket_currency: &str, expenses_currency: &str, fx_rates: &FxTable) -> f64 {
    if bucket_currency == expenses_currency {
        return 1.0;
    }
    fx_rates.get(bucket_currency).copied().unwrap_or(1.0)
}

/// True when growth since inception exceeds the target by more than the
/// sell trigger ratio.
///
/// A zero target growth or a non-positive initial price never fires.
#[must_use]
pub fn check_sell_trigger(bucket: &BucketState) -> bool {
    if bucket.target_growth_pct == 0.0 || bucket.initial_price <= 0.0 {
        return false;
    }
    let actual_growth_pct = (bucket.price - bucket.initial_price) / bucket.initial_price * 100.0;
    actual_growth_pct / bucket.target_growth_pct > bucket.sell_trigger
}

/// True when the price sits below the target price by more than
/// `buy_trigger` percent.
#[must_use]
pub fn check_buy_trigger(bucket: &BucketState) -> bool {
    if bucket.price <= 0.0 {
        return false;
    }
    let discount_pct = 100.0 * bucket.target_price() / bucket.price - 100.0;
    discount_pct > bucket.buy_trigger
}

/// Portfolio value in months of `month_expense`; infinite when nothing is spent.
#[must_use]
pub fn runway_months(states: &[BucketState], fx: &[f64], month_expense: f64) -> f64 {
    if month_expense <= 0.0 {
        return f64::INFINITY;
    }
    let total: f64 = states.iter().zip(fx).map(|(b, rate)| b.amount * rate).sum();
    total / month_expense
}

/// Per-trial rebalancing plan: standby links and spending order are resolved
/// once from the bucket names and reused every month.
#[derive(Debug, Clone)]
pub struct Rebalancer {
    expenses_currency: String,
    capital_gain_tax_pct: f64,
    /// Resolved standby index per bucket
    standby: Vec<Option<usize>>,
    /// Bucket indices in cascade order
    spending_order: Vec<usize>,
}

impl Rebalancer {
    #[must_use]
    pub fn new(states: &[BucketState], expenses_currency: &str, capital_gain_tax_pct: f64) -> Self {
        let by_name: FxHashMap<&str, usize> = states
            .iter()
            .enumerate()
            .map(|(idx, b)| (b.name.as_str(), idx))
            .collect();
        let standby = states
            .iter()
            .map(|b| {
                b.standby_bucket
                    .as_deref()
                    .and_then(|name| by_name.get(name).copied())
            })
            .collect();

        let mut spending_order: Vec<usize> = (0..states.len()).collect();
        spending_order.sort_by_key(|&idx| states[idx].spending_priority);

        Self {
            expenses_currency: expenses_currency.to_string(),
            capital_gain_tax_pct,
            standby,
            spending_order,
        }
    }

    #[must_use]
    pub fn from_config(config: &SimConfig, states: &[BucketState]) -> Self {
        Self::new(states, &config.expenses_currency, config.capital_gain_tax_pct)
    }

    /// Bucket indices in the order the expense cascade visits them
    #[must_use]
    pub fn spending_order(&self) -> &[usize] {
        &self.spending_order
    }

    /// Run one month. Returns the amount of `month_expense` covered, in the
    /// expenses currency.
    ///
    /// `states` must be the slice this rebalancer was built from, with prices
    /// already moved to the current month.
    pub fn execute(
        &self,
        states: &mut [BucketState],
        month_expense: f64,
        fx_rates: &FxTable,
        month_idx: usize,
    ) -> f64 {
        for b in states.iter_mut() {
            b.reset_month_counters();
        }

        let fx: Vec<f64> = states
            .iter()
            .map(|b| get_fx_rate(&b.currency, &self.expenses_currency, fx_rates))
            .collect();

        for idx in 0..states.len() {
            self.skim(states, &fx, idx, month_expense, month_idx);
        }

        let remaining = self.cover_expense(states, &fx, month_expense);
        month_expense - remaining.max(0.0)
    }

    /// Step 1 for one bucket
    fn skim(
        &self,
        states: &mut [BucketState],
        fx: &[f64],
        idx: usize,
        month_expense: f64,
        month_idx: usize,
    ) {
        let b = &states[idx];
        if !b.frequency.is_due(month_idx) || !check_sell_trigger(b) {
            return;
        }
        if runway_months(states, fx, month_expense) < b.required_runaway_months {
            return;
        }

        let excess_per_unit = b.price - b.target_price();
        if excess_per_unit <= 0.0 {
            return;
        }
        let sell_amount = b.amount * (excess_per_unit / b.price);
        if sell_amount <= 0.0 {
            return;
        }

        let rate = fx[idx];
        let sale = compute_sell(sell_amount, b.buy_sell_fee_pct);
        let basis = approximate_cost_basis(sell_amount, b.initial_price, b.price);
        let tax = capital_gains_tax(sale.net, basis, self.capital_gain_tax_pct);
        let after_tax = sale.net - tax;

        let b = &mut states[idx];
        b.amount -= sell_amount;
        b.amount_sold += sell_amount;
        b.fees_paid += sale.fee * rate;
        b.tax_paid += tax * rate;
        trace!(bucket = %b.name, month_idx, sell_amount, after_tax, "skimmed above target");

        let Some(standby_idx) = self.standby[idx] else {
            return;
        };
        let standby = &mut states[standby_idx];
        if !check_buy_trigger(standby) {
            return;
        }
        let standby_rate = fx[standby_idx];
        let spend = if standby_rate > 0.0 {
            after_tax * rate / standby_rate
        } else {
            0.0
        };
        let purchase = compute_buy(spend, standby.buy_sell_fee_pct);
        standby.amount += purchase.net;
        standby.amount_bought += purchase.net;
        standby.fees_paid += purchase.fee * standby_rate;
    }

    /// Step 2. Returns the expense left uncovered (may be slightly negative).
    fn cover_expense(&self, states: &mut [BucketState], fx: &[f64], month_expense: f64) -> f64 {
        let mut remaining = month_expense;

        for &idx in &self.spending_order {
            if remaining <= 0.0 {
                break;
            }
            let rate = fx[idx];
            if rate <= 0.0 {
                continue;
            }
            let b = &mut states[idx];
            let floor = b.cash_floor_months * month_expense;
            let available = (b.amount * rate - floor).max(0.0);
            if available <= 0.0 {
                continue;
            }

            let sell_native = remaining.min(available) / rate;
            let sale = compute_sell(sell_native, b.buy_sell_fee_pct);
            let basis = approximate_cost_basis(sell_native, b.initial_price, b.price);
            let tax = capital_gains_tax(sale.net, basis, self.capital_gain_tax_pct);
            let net_spent = (sale.net - tax) * rate;

            b.amount -= sell_native;
            b.amount_sold += sell_native;
            b.fees_paid += sale.fee * rate;
            b.tax_paid += tax * rate;
            b.net_spent += net_spent;
            remaining -= net_spent;
        }

        remaining
    }
}

/// One-shot rebalance that resolves the plan from `states` on every call.
///
/// Trials should build a [`Rebalancer`] once instead.
pub fn execute_rebalance(
    states: &mut [BucketState],
    month_expense: f64,
    fx_rates: &FxTable,
    config: &SimConfig,
    month_idx: usize,
) -> f64 {
    Rebalancer::from_config(config, states).execute(states, month_expense, fx_rates, month_idx)
}
