//! Collaborator seams for market data.
//!
//! The risk engine never talks to the network itself; it consumes whatever a
//! [`PriceSource`] or [`RateSource`] hands it. Tests substitute in-memory
//! implementations.

use crate::error::Result;
use crate::series::PriceSeries;
use crate::window::FetchWindow;
use std::future::Future;

/// Supplies daily price series.
pub trait PriceSource {
    /// Fetch the daily price series for `symbol` over `window`.
    ///
    /// # Errors
    /// [`DataError::TickerNotFound`](crate::DataError::TickerNotFound) when the
    /// source does not recognize the symbol and
    /// [`DataError::DataSourceUnavailable`](crate::DataError::DataSourceUnavailable)
    /// when it cannot be reached.
    fn fetch_prices(
        &self,
        symbol: &str,
        window: FetchWindow,
    ) -> impl Future<Output = Result<PriceSeries>> + Send;
}

/// Supplies an annualized short-term government yield as a decimal fraction.
pub trait RateSource {
    /// Fetch the representative rate over `window`.
    fn fetch_rate(&self, window: FetchWindow) -> impl Future<Output = Result<f64>> + Send;
}
