//! Error types for the calculators and their loaders

use thiserror::Error;

/// Failures reported by the XIRR solver
#[derive(Debug, Error, Clone, PartialEq)]
pub enum XirrError {
    /// The cash-flow set cannot have an internal rate of return
    #[error("invalid cash flows: {0}")]
    InvalidInput(String),

    /// Newton-Raphson did not settle on an admissible rate
    #[error("XIRR did not converge after {iterations} iterations: {reason}")]
    NonConvergent { reason: String, iterations: u32 },
}

/// Failures building or loading a tax jurisdiction
#[derive(Debug, Error)]
pub enum TaxError {
    #[error("unknown jurisdiction: {0}")]
    UnknownJurisdiction(String),

    #[error("invalid slab table for {code}: {reason}")]
    InvalidSlabs { code: String, reason: String },

    #[error("jurisdiction file error: {0}")]
    Load(#[from] LoadError),
}

/// Failures converting between currencies
#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("amount must be positive, got {0}")]
    InvalidAmount(f64),

    #[error("exchange rate not found for {from} to {to}")]
    RateNotFound { from: String, to: String },

    #[error("no rates available for base currency {0}")]
    UnknownBase(String),

    #[error("rates file error: {0}")]
    Load(#[from] LoadError),
}

/// Failures reading CSV/JSON input files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad value in row {row}: {message}")]
    Format { row: usize, message: String },
}

/// Failures reading settings or the preferences file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
