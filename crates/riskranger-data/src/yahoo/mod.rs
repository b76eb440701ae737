//! Yahoo Finance data providers.

pub mod quotes;
pub mod treasury;

pub use quotes::YahooQuoteProvider;
pub use treasury::{DEFAULT_RATE_SYMBOL, YahooTreasuryRate};
