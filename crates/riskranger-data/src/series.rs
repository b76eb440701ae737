//! Daily price series.
//!
//! A [`PriceSeries`] is the only thing the risk engine needs from a data
//! source: one symbol, dates strictly increasing, every price finite and
//! strictly positive. Missing trading days are simply absent.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Which quote column a series is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    /// Raw close; returns exclude dividends (price return)
    #[default]
    #[display("close")]
    Close,
    /// Dividend and split adjusted close (total return)
    #[display("adjusted close")]
    AdjustedClose,
}

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Price on that date.
    pub price: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub const fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Ordered daily prices for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, validating ordering and price sanity.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidSymbol`] for an empty symbol and
    /// [`DataError::InvalidSeries`] when dates are not strictly increasing or a
    /// price is not a finite positive number.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        for (i, point) in points.iter().enumerate() {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(DataError::InvalidSeries {
                    symbol,
                    reason: format!("price {} on {} is not positive", point.price, point.date),
                });
            }
            if i > 0 && points[i - 1].date >= point.date {
                return Err(DataError::InvalidSeries {
                    symbol,
                    reason: format!(
                        "dates not strictly increasing at {} -> {}",
                        points[i - 1].date,
                        point.date
                    ),
                });
            }
        }

        Ok(Self { symbol, points })
    }

    /// Build a series from bare prices on consecutive calendar days starting at `start`.
    ///
    /// Convenient for tests and for callers that only care about values.
    pub fn from_prices(symbol: impl Into<String>, start: NaiveDate, prices: &[f64]) -> Result<Self> {
        let points = prices
            .iter()
            .zip(start.iter_days())
            .map(|(&price, date)| PricePoint::new(date, price))
            .collect();
        Self::new(symbol, points)
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// All observations in date order.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Prices in date order.
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    /// Number of observations.
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations.
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First observation, if any.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Last observation, if any.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}
