//! Integration tests for the runway simulation engine
//!
//! Tests are organized by topic:
//! - `basic` - Single-trial mechanics and the monthly table
//! - `policy` - Rebalancing and withdrawal policy over whole trials
//! - `currency` - Multi-currency buckets
//! - `monte_carlo` - Batch aggregation, reproducibility and cancellation
//! - `builder_dsl` - Builder DSL for fluent configuration setup

mod basic;
mod builder_dsl;
