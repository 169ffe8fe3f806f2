//! Household portfolio runway simulation library
//!
//! This crate provides a Monte Carlo engine that asks how long a set of
//! investment buckets can fund a household's expenses. It supports:
//! - Stochastic inflation, FX and asset-price paths with named volatility profiles
//! - Recurring and one-time expenses adjusted for cumulative inflation
//! - Target-trajectory rebalancing with standby buckets and a runway guard
//! - A spending-priority withdrawal cascade with per-bucket cash floors
//! - Fees and an approximate capital-gains tax on every sale
//! - Reproducible Monte Carlo batches with percentile envelopes
//!
//! # Builder DSL
//!
//! ```ignore
//! use runway_core::config::{BucketBuilder, SimConfigBuilder};
//! use runway_core::simulation::run_monte_carlo;
//!
//! let config = SimConfigBuilder::new()
//!     .years(30)
//!     .monthly_expense(1, 1, 4_000.0)
//!     .bucket(BucketBuilder::cash("Cash").amount(50_000.0))
//!     .bucket(BucketBuilder::sp500("Stocks")
//!         .amount(900_000.0)
//!         .standby("Cash")
//!         .spending_priority(1))
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! let result = run_monte_carlo(&config, 1_000, Some(42), None)?;
//! println!("success rate: {:.1}%", result.success_rate * 100.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod expenses;
pub mod liquidation;
pub mod market;
pub mod rebalancer;
pub mod simulation;
pub mod volatility;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{BucketBuilder, SimConfig, SimConfigBuilder};
pub use error::{ConfigError, SimulationError};
pub use simulation::{
    MonteCarloProgress, run_monte_carlo, run_monte_carlo_with_progress, run_simulation, simulate,
};
