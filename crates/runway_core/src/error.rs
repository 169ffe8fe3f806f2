use std::fmt;

/// Configuration bound violations, raised once before any trial runs
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A min/avg/max triple is out of order
    InvalidBounds {
        entity: String,
        min: f64,
        avg: f64,
        max: f64,
    },
    /// A value that must be strictly positive is not
    NonPositive {
        entity: String,
        field: &'static str,
        value: f64,
    },
    /// A value that must be non-negative is negative
    Negative {
        entity: String,
        field: &'static str,
        value: f64,
    },
    /// Month outside 1..=12
    InvalidMonth { entity: String, month: u32 },
    /// Year below 1
    InvalidYear { entity: String, year: u32 },
    DuplicateBucketName(String),
    /// The simulation horizon is zero years
    EmptyHorizon,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBounds {
                entity,
                min,
                avg,
                max,
            } => write!(
                f,
                "{entity}: bounds must satisfy min <= avg <= max (min={min}, avg={avg}, max={max})"
            ),
            ConfigError::NonPositive {
                entity,
                field,
                value,
            } => write!(f, "{entity}: {field} must be > 0 (got {value})"),
            ConfigError::Negative {
                entity,
                field,
                value,
            } => write!(f, "{entity}: {field} must be >= 0 (got {value})"),
            ConfigError::InvalidMonth { entity, month } => {
                write!(f, "{entity}: month must be between 1 and 12 (got {month})")
            }
            ConfigError::InvalidYear { entity, year } => {
                write!(f, "{entity}: year must be >= 1 (got {year})")
            }
            ConfigError::DuplicateBucketName(name) => {
                write!(f, "bucket name {name:?} is used more than once")
            }
            ConfigError::EmptyHorizon => write!(f, "period_years must be >= 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors surfaced by the Monte Carlo entry points
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// `n_simulations` was zero
    EmptyBatch,
    /// Monte Carlo simulation was cancelled by user request
    Cancelled,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::EmptyBatch => {
                write!(f, "monte carlo batch needs at least one simulation")
            }
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {}

pub type Result<T> = std::result::Result<T, SimulationError>;
