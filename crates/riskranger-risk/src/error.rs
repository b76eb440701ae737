//! Error types for risk computations.

use thiserror::Error;

/// Result type for risk computations.
pub type Result<T> = std::result::Result<T, RiskError>;

/// Errors that can occur while computing returns and risk metrics.
#[derive(Debug, Error, PartialEq)]
pub enum RiskError {
    /// Too few observations for the requested statistic
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Confidence level, annualization factor or rate out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Volatility is zero, so the Sharpe ratio is undefined
    #[error("Division by zero: volatility is zero, Sharpe ratio is undefined")]
    ZeroVolatility,

    /// The risk-free rate could not be obtained and no fallback was given
    #[error("Risk-free rate unavailable: {0}")]
    RateUnavailable(String),
}
