//! Daily price history from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::retry::BackoffPolicy;
use crate::series::{PriceField, PricePoint, PriceSeries};
use crate::source::PriceSource;
use crate::window::FetchWindow;
use chrono::{DateTime, Days, NaiveDate};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Yahoo Finance quote provider with rate limiting and bounded retries.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    field: PriceField,
    rate_limit_delay: Duration,
    backoff: BackoffPolicy,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("field", &self.field)
            .field("rate_limit_delay", &self.rate_limit_delay)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a provider reading close prices, pausing 250ms after each request.
    ///
    /// # Errors
    /// Returns [`DataError::DataSourceUnavailable`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let provider = yahoo::YahooConnector::new().map_err(|e| DataError::DataSourceUnavailable {
            reason: e.to_string(),
            attempts: 0,
        })?;
        Ok(Self {
            provider,
            field: PriceField::Close,
            rate_limit_delay: Duration::from_millis(250),
            backoff: BackoffPolicy::default(),
        })
    }

    /// Use a different quote column.
    pub const fn with_price_field(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    /// Use a custom pause between requests.
    pub const fn with_rate_limit(mut self, rate_limit_delay: Duration) -> Self {
        self.rate_limit_delay = rate_limit_delay;
        self
    }

    /// Use a custom retry policy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Quote column this provider reads.
    pub const fn price_field(&self) -> PriceField {
        self.field
    }

    /// Fetch and normalize the daily series for `symbol`.
    pub async fn fetch_series(&self, symbol: &str, window: FetchWindow) -> Result<PriceSeries> {
        let symbol = symbol.trim();
        let raw = self.fetch_raw(symbol, window).await?;
        normalize_quotes(symbol, raw)
    }

    /// Fetch unvalidated `(unix timestamp, value)` pairs for `symbol`, with retries.
    pub(crate) async fn fetch_raw(
        &self,
        symbol: &str,
        window: FetchWindow,
    ) -> Result<Vec<(i64, f64)>> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let raw = self
            .backoff
            .run(&format!("fetching {symbol}"), || self.request(symbol, window))
            .await?;

        tracing::debug!(
            target: "riskranger::data",
            symbol,
            %window,
            quotes = raw.len(),
            "fetched quote history"
        );

        Ok(raw)
    }

    /// One request against the chart endpoint, returning `(timestamp, price)` pairs.
    async fn request(&self, symbol: &str, window: FetchWindow) -> Result<Vec<(i64, f64)>> {
        let response = match window {
            FetchWindow::Range(range) => {
                let start = to_offset_datetime(range.start())?;
                // The endpoint treats the end bound as exclusive.
                let end_date = range
                    .end()
                    .checked_add_days(Days::new(1))
                    .ok_or_else(|| DataError::TimeConversion(range.end().to_string()))?;
                let end = to_offset_datetime(end_date)?;
                self.provider.get_quote_history(symbol, start, end).await
            }
            FetchWindow::Lookback(lookback) => {
                self.provider
                    .get_quote_range(symbol, "1d", &lookback.range_param())
                    .await
            }
        }
        .map_err(|e| classify_error(symbol, &e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| classify_error(symbol, &e.to_string()))?;

        sleep(self.rate_limit_delay).await;

        let field = self.field;
        Ok(quotes
            .iter()
            .map(|q| {
                let price = match field {
                    PriceField::Close => q.close,
                    PriceField::AdjustedClose => q.adjclose,
                };
                (q.timestamp, price)
            })
            .collect())
    }
}

impl PriceSource for YahooQuoteProvider {
    fn fetch_prices(
        &self,
        symbol: &str,
        window: FetchWindow,
    ) -> impl Future<Output = Result<PriceSeries>> + Send {
        self.fetch_series(symbol, window)
    }
}

fn to_offset_datetime(date: NaiveDate) -> Result<time::OffsetDateTime> {
    let timestamp = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DataError::TimeConversion(date.to_string()))?
        .and_utc()
        .timestamp();
    time::OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}

/// Map a Yahoo failure message to the data error taxonomy.
///
/// Unknown symbols come back as 404s or empty result sets; everything else is
/// treated as a transient transport problem and left to the retry policy.
pub(crate) fn classify_error(symbol: &str, message: &str) -> DataError {
    let lower = message.to_lowercase();
    let not_found = ["404", "not found", "no data found", "delisted", "empty data set", "no quotes"];

    if not_found.iter().any(|needle| lower.contains(needle)) {
        DataError::TickerNotFound {
            symbol: symbol.to_string(),
            reason: message.to_string(),
        }
    } else {
        DataError::Transient(message.to_string())
    }
}

/// Turn raw `(unix timestamp, price)` pairs into a validated series.
///
/// Quotes are ordered by timestamp, unusable prices are dropped, and when two
/// quotes fall on the same calendar day the later one wins (Yahoo repeats the
/// live quote as an extra row while the market is open).
pub(crate) fn normalize_quotes(symbol: &str, mut raw: Vec<(i64, f64)>) -> Result<PriceSeries> {
    raw.sort_by_key(|&(ts, _)| ts);

    let mut points: Vec<PricePoint> = Vec::with_capacity(raw.len());
    let mut dropped = 0usize;

    for (ts, price) in raw {
        if !price.is_finite() || price <= 0.0 {
            dropped += 1;
            continue;
        }
        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| DataError::TimeConversion(format!("timestamp {ts} out of range")))?
            .date_naive();

        match points.last_mut() {
            Some(last) if last.date == date => last.price = price,
            _ => points.push(PricePoint::new(date, price)),
        }
    }

    if dropped > 0 {
        tracing::debug!(target: "riskranger::data", symbol, dropped, "dropped unusable quotes");
    }

    if points.is_empty() {
        return Err(DataError::TickerNotFound {
            symbol: symbol.to_string(),
            reason: "no usable quotes in the requested window".to_string(),
        });
    }

    PriceSeries::new(symbol, points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{DateRange, Lookback};
    use rstest::rstest;

    // 2024-01-02 14:30:00 UTC, a regular session open.
    const JAN_2: i64 = 1_704_205_800;
    const DAY: i64 = 86_400;

    #[rstest]
    #[case("fetching the data from yahoo! finance failed: 404 Not Found")]
    #[case("No data found, symbol may be delisted")]
    #[case("yahoo! finance returned an empty data set")]
    fn test_classify_not_found(#[case] message: &str) {
        assert!(matches!(
            classify_error("ZZZZ", message),
            DataError::TickerNotFound { ref symbol, .. } if symbol == "ZZZZ"
        ));
    }

    #[rstest]
    #[case("connection to yahoo! finance server failed: operation timed out")]
    #[case("fetching the data from yahoo! finance failed: 503 Service Unavailable")]
    fn test_classify_transient(#[case] message: &str) {
        assert!(classify_error("AAPL", message).is_transient());
    }

    #[test]
    fn test_normalize_sorts_and_dedupes() {
        let raw = vec![
            (JAN_2 + DAY, 101.0),
            (JAN_2, 100.0),
            (JAN_2 + DAY + 3_600, 102.0),
        ];
        let series = normalize_quotes("AAPL", raw).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.prices().collect::<Vec<_>>(), vec![100.0, 102.0]);
        assert_eq!(
            series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_normalize_drops_bad_prices() {
        let raw = vec![(JAN_2, 100.0), (JAN_2 + DAY, 0.0), (JAN_2 + 2 * DAY, f64::NAN)];
        let series = normalize_quotes("AAPL", raw).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_normalize_empty_is_not_found() {
        let result = normalize_quotes("AAPL", vec![(JAN_2, -1.0)]);
        assert!(matches!(result, Err(DataError::TickerNotFound { .. })));
    }

    #[tokio::test]
    async fn test_empty_symbol_rejected_without_network() {
        let provider = YahooQuoteProvider::new().unwrap();
        let result = provider
            .fetch_series(" ", FetchWindow::Lookback(Lookback::Days(5)))
            .await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_fetch_series_live() {
        let provider = YahooQuoteProvider::new().unwrap();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();

        let series = provider.fetch_series("AAPL", range.into()).await.unwrap();
        assert!(series.len() > 15);
        assert_eq!(series.symbol(), "AAPL");
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_unknown_symbol_live() {
        let provider = YahooQuoteProvider::new().unwrap().with_backoff(BackoffPolicy::none());
        let result = provider
            .fetch_series("NOT-A-REAL-TICKER-XYZ", Lookback::Months(1).into())
            .await;
        assert!(matches!(result, Err(DataError::TickerNotFound { .. })));
    }
}
