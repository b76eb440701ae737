//! Short-term government yield from Yahoo Finance.
//!
//! `^IRX` quotes the 13-week US Treasury bill discount yield in percent, so a
//! close of 5.2 means 5.2% a year. The representative rate for a window is the
//! arithmetic mean of the daily closes in that window, as a decimal fraction.

use crate::error::{DataError, Result};
use crate::retry::BackoffPolicy;
use crate::series::PriceField;
use crate::source::RateSource;
use crate::window::FetchWindow;
use crate::yahoo::YahooQuoteProvider;
use chrono::{DateTime, NaiveDate};
use std::future::Future;

/// 13-week Treasury bill yield index.
pub const DEFAULT_RATE_SYMBOL: &str = "^IRX";

/// Risk-free rate source backed by a Yahoo yield index.
#[derive(Debug)]
pub struct YahooTreasuryRate {
    quotes: YahooQuoteProvider,
    symbol: String,
}

impl YahooTreasuryRate {
    /// Create a source reading [`DEFAULT_RATE_SYMBOL`].
    pub fn new() -> Result<Self> {
        Ok(Self {
            quotes: YahooQuoteProvider::new()?.with_price_field(PriceField::Close),
            symbol: DEFAULT_RATE_SYMBOL.to_string(),
        })
    }

    /// Read a different yield index (quoted in percent).
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Use a custom retry policy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.quotes = self.quotes.with_backoff(backoff);
        self
    }

    /// Yield index symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    async fn estimate(&self, window: FetchWindow) -> Result<f64> {
        let raw = self.quotes.fetch_raw(&self.symbol, window).await?;
        let yields = daily_yields(raw)?;
        let rate = mean_yield(&yields).ok_or_else(|| DataError::TickerNotFound {
            symbol: self.symbol.clone(),
            reason: "no yield observations in the requested window".to_string(),
        })?;
        tracing::debug!(
            target: "riskranger::data",
            symbol = %self.symbol,
            %window,
            observations = yields.len(),
            rate,
            "estimated risk-free rate"
        );
        Ok(rate)
    }
}

impl RateSource for YahooTreasuryRate {
    fn fetch_rate(&self, window: FetchWindow) -> impl Future<Output = Result<f64>> + Send {
        self.estimate(window)
    }
}

/// One yield per calendar day, in date order.
///
/// Yields can legitimately be zero or negative, so only non-finite closes are
/// dropped. When a day has several quotes the latest wins.
pub(crate) fn daily_yields(mut raw: Vec<(i64, f64)>) -> Result<Vec<f64>> {
    raw.sort_by_key(|&(ts, _)| ts);

    let mut days: Vec<(NaiveDate, f64)> = Vec::with_capacity(raw.len());
    for (ts, value) in raw.into_iter().filter(|(_, value)| value.is_finite()) {
        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| DataError::TimeConversion(format!("timestamp {ts} out of range")))?
            .date_naive();
        match days.last_mut() {
            Some(last) if last.0 == date => last.1 = value,
            _ => days.push((date, value)),
        }
    }

    Ok(days.into_iter().map(|(_, value)| value).collect())
}

/// Mean of percent-quoted yields, as a decimal fraction.
pub(crate) fn mean_yield(yields: &[f64]) -> Option<f64> {
    if yields.is_empty() {
        return None;
    }
    let sum: f64 = yields.iter().sum();
    Some(sum / yields.len() as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Lookback;
    use approx::assert_relative_eq;

    // 2024-01-02 21:00:00 UTC
    const JAN_2: i64 = 1_704_229_200;
    const DAY: i64 = 86_400;

    fn rate(raw: Vec<(i64, f64)>) -> Option<f64> {
        mean_yield(&daily_yields(raw).unwrap())
    }

    #[test]
    fn test_mean_yield_converts_percent() {
        let rate = mean_yield(&[5.0, 5.2, 5.4]).unwrap();
        assert_relative_eq!(rate, 0.052, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_yield_empty() {
        assert!(mean_yield(&[]).is_none());
        assert!(rate(vec![(JAN_2, f64::NAN)]).is_none());
    }

    #[test]
    fn test_zero_yields_count_as_observations() {
        let raw = vec![(JAN_2, 0.0), (JAN_2 + DAY, 0.0), (JAN_2 + 2 * DAY, 0.1)];
        assert_eq!(daily_yields(raw.clone()).unwrap().len(), 3);
        assert_relative_eq!(rate(raw).unwrap(), 0.1 / 3.0 / 100.0, epsilon = 1e-15);
    }

    #[test]
    fn test_all_zero_window_is_zero_rate() {
        let raw = vec![(JAN_2, 0.0), (JAN_2 + DAY, 0.0), (JAN_2 + 2 * DAY, 0.0)];
        assert_eq!(rate(raw), Some(0.0));
    }

    #[test]
    fn test_negative_yields_kept() {
        let raw = vec![(JAN_2, -0.02), (JAN_2 + DAY, 0.04)];
        assert_relative_eq!(rate(raw).unwrap(), 0.0001, epsilon = 1e-15);
    }

    #[test]
    fn test_daily_yields_sorts_dedupes_and_skips_non_finite() {
        let raw = vec![
            (JAN_2 + DAY, 4.0),
            (JAN_2, 5.0),
            (JAN_2 + DAY + 600, 4.5),
            (JAN_2 + 2 * DAY, f64::INFINITY),
        ];
        assert_eq!(daily_yields(raw).unwrap(), vec![5.0, 4.5]);
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_fetch_rate_live() {
        let source = YahooTreasuryRate::new().unwrap();
        let rate = source.fetch_rate(Lookback::Years(1).into()).await.unwrap();
        assert!((0.0..0.2).contains(&rate));
    }
}
