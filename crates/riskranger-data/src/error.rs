//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading market data.
#[derive(Debug, Error)]
pub enum DataError {
    /// The data source does not recognize the symbol or returned nothing for it
    #[error("Ticker not found: {symbol} ({reason})")]
    TickerNotFound {
        /// Symbol that was queried
        symbol: String,
        /// Reason reported by the source
        reason: String,
    },

    /// The data source could not be reached or kept failing
    #[error("Data source unavailable after {attempts} attempt(s): {reason}")]
    DataSourceUnavailable {
        /// Last failure reported by the source
        reason: String,
        /// Number of attempts made
        attempts: u32,
    },

    /// A single failed request that is worth retrying
    #[error("Transient data source failure: {0}")]
    Transient(String),

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Invalid lookback period
    #[error("Invalid period '{0}': expected forms like 30d, 6mo, 10y or max")]
    InvalidPeriod(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Price data that violates the series invariants
    #[error("Invalid price series for {symbol}: {reason}")]
    InvalidSeries {
        /// Symbol of the offending series
        symbol: String,
        /// What was wrong with it
        reason: String,
    },

    /// Time conversion error
    #[error("Time conversion error: {0}")]
    TimeConversion(String),
}

impl DataError {
    /// Whether the failure may go away if the request is repeated.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
