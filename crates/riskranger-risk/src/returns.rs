//! Periodic returns.
//!
//! Simple returns `r_t = (p_t - p_{t-1}) / p_{t-1}`, each dated by the later of
//! the two prices it is computed from.

use crate::error::{Result, RiskError};
use chrono::NaiveDate;
use ndarray::Array1;
use riskranger_data::PriceSeries;

/// Simple returns derived from a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    symbol: String,
    start: NaiveDate,
    dates: Vec<NaiveDate>,
    values: Array1<f64>,
}

impl ReturnSeries {
    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Date of the first price, i.e. the start of the measured period.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Date of the last price, i.e. the end of the measured period.
    pub fn end(&self) -> NaiveDate {
        self.dates.last().copied().unwrap_or(self.start)
    }

    /// Date each return is realized on.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Return values in date order.
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Return values as a slice.
    pub fn as_slice(&self) -> &[f64] {
        self.values.as_slice().unwrap_or_default()
    }

    /// Number of returns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no returns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Convert a price series into simple periodic returns.
///
/// # Errors
/// [`RiskError::InsufficientData`] when the series has fewer than two prices.
pub fn compute_returns(prices: &PriceSeries) -> Result<ReturnSeries> {
    let points = prices.points();
    if points.len() < 2 {
        return Err(RiskError::InsufficientData {
            required: 2,
            actual: points.len(),
        });
    }

    let values: Array1<f64> = points
        .windows(2)
        .map(|w| (w[1].price - w[0].price) / w[0].price)
        .collect();
    let dates = points[1..].iter().map(|p| p.date).collect();

    Ok(ReturnSeries {
        symbol: prices.symbol().to_string(),
        start: points[0].date,
        dates,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_simple_returns() {
        let prices = PriceSeries::from_prices("TEST", start(), &[100.0, 110.0, 99.0]).unwrap();
        let returns = compute_returns(&prices).unwrap();

        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns.values()[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.values()[1], -0.10, epsilon = 1e-12);
        assert_eq!(returns.symbol(), "TEST");
        assert_eq!(returns.start(), start());
        assert_eq!(returns.end(), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(returns.dates()[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_insufficient_prices() {
        for prices in [vec![], vec![100.0]] {
            let series = PriceSeries::from_prices("TEST", start(), &prices).unwrap();
            assert_eq!(
                compute_returns(&series),
                Err(RiskError::InsufficientData {
                    required: 2,
                    actual: prices.len(),
                })
            );
        }
    }

    #[test]
    fn test_random_walk_lengths_and_values() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut price = 50.0;
        let mut prices = Vec::new();
        for _ in 0..300 {
            prices.push(price);
            price *= 1.0 + rng.gen_range(-0.05..0.05);
        }

        let series = PriceSeries::from_prices("RW", start(), &prices).unwrap();
        let returns = compute_returns(&series).unwrap();

        assert_eq!(returns.len(), prices.len() - 1);
        assert_eq!(returns.as_slice().len(), returns.len());
        for t in 1..prices.len() {
            let expected = (prices[t] - prices[t - 1]) / prices[t - 1];
            assert_relative_eq!(returns.values()[t - 1], expected, epsilon = 1e-15);
        }
    }
}
