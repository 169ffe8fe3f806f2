//! Trade helpers: fees and the capital-gains approximation
//!
//! All amounts are in the traded bucket's own currency.

/// Outcome of a single buy or sell
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Trade {
    /// Proceeds of a sale, or the amount invested by a purchase
    pub net: f64,
    pub fee: f64,
}

/// Sell `amount`, deducting a percentage fee from the proceeds.
#[must_use]
pub fn compute_sell(amount: f64, fee_pct: f64) -> Trade {
    let fee = amount * fee_pct / 100.0;
    Trade {
        net: amount - fee,
        fee,
    }
}

/// Spend `amount` on a purchase; the fee comes out before investing.
#[must_use]
pub fn compute_buy(amount: f64, fee_pct: f64) -> Trade {
    let fee = amount * fee_pct / 100.0;
    Trade {
        net: amount - fee,
        fee,
    }
}

/// Approximate cost basis of `sold` units' worth at `price`.
///
/// The sold fraction is assumed to have been bought at `initial_price`; there
/// is no per-lot tracking. A non-positive price yields a zero basis.
#[must_use]
pub fn approximate_cost_basis(sold: f64, initial_price: f64, price: f64) -> f64 {
    if price > 0.0 {
        sold * (initial_price / price)
    } else {
        0.0
    }
}

/// Capital-gains tax owed on a sale; never negative.
#[must_use]
pub fn capital_gains_tax(net_proceeds: f64, cost_basis: f64, tax_pct: f64) -> f64 {
    ((net_proceeds - cost_basis) * tax_pct / 100.0).max(0.0)
}
