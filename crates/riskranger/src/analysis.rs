//! Multi-ticker analysis.
//!
//! [`RiskAnalyzer`] resolves the risk-free rate once per run, then fetches and
//! analyzes every ticker with at most `concurrency` requests in flight.
//! Outcomes come back in the order the tickers were given, each carrying
//! either a report or the error that stopped that ticker.

use futures::stream::{self, StreamExt};
use riskranger_data::{DataError, FetchWindow, PriceSource, RateSource};
use riskranger_output::{RunReport, RunReportBuilder, TickerFailure};
use riskranger_risk::{
    RiskError, RiskFreeRate, RiskFreeRateEstimator, RiskMetricsEngine, RiskReport,
    compute_returns,
};
use thiserror::Error;

/// Default number of tickers fetched at the same time.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Error stopping one ticker or a whole run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Loading market data failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Computing statistics failed.
    #[error(transparent)]
    Risk(#[from] RiskError),
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// What happened to one requested ticker.
#[derive(Debug)]
pub struct TickerOutcome {
    /// Symbol as requested.
    pub symbol: String,

    /// The report, or the reason there is none.
    pub result: Result<RiskReport>,
}

/// Outcome of a run over several tickers.
#[derive(Debug)]
pub struct Analysis {
    /// Requested window.
    pub window: FetchWindow,

    /// Rate used for every ticker.
    pub risk_free_rate: RiskFreeRate,

    /// One outcome per ticker, in request order.
    pub outcomes: Vec<TickerOutcome>,
}

impl Analysis {
    /// Successful reports in request order.
    pub fn reports(&self) -> impl Iterator<Item = &RiskReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failed tickers and their errors in request order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &AnalysisError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.symbol.as_str(), e)))
    }

    /// True when no ticker produced a report.
    pub fn all_failed(&self) -> bool {
        self.reports().next().is_none()
    }

    /// Convert into a serializable run report.
    pub fn into_run_report(self) -> RunReport {
        let builder = RunReportBuilder::new()
            .window(self.window)
            .risk_free_rate(self.risk_free_rate);

        self.outcomes
            .into_iter()
            .fold(builder, |builder, outcome| match outcome.result {
                Ok(report) => builder.report(report),
                Err(e) => builder.failure(TickerFailure::new(outcome.symbol, e)),
            })
            .build()
    }
}

/// Runs the loader, return calculator and engine over many tickers.
#[derive(Debug)]
pub struct RiskAnalyzer<P, R> {
    prices: P,
    rates: R,
    engine: RiskMetricsEngine,
    estimator: RiskFreeRateEstimator,
    concurrency: usize,
}

impl<P: PriceSource, R: RateSource> RiskAnalyzer<P, R> {
    /// Create an analyzer with [`DEFAULT_CONCURRENCY`].
    pub const fn new(
        prices: P,
        rates: R,
        engine: RiskMetricsEngine,
        estimator: RiskFreeRateEstimator,
    ) -> Self {
        Self {
            prices,
            rates,
            engine,
            estimator,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Maximum number of tickers in flight (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Configured concurrency.
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Price source.
    pub const fn prices(&self) -> &P {
        &self.prices
    }

    /// Engine used for every ticker.
    pub const fn engine(&self) -> &RiskMetricsEngine {
        &self.engine
    }

    /// Resolve the risk-free rate for `window`.
    ///
    /// # Errors
    /// [`RiskError::RateUnavailable`] when the market rate cannot be fetched
    /// and no fallback is configured.
    pub async fn risk_free_rate(&self, window: FetchWindow) -> Result<RiskFreeRate> {
        Ok(self.estimator.estimate(&self.rates, window).await?)
    }

    /// Analyze one ticker with an already resolved rate.
    pub async fn analyze_ticker(
        &self,
        symbol: &str,
        window: FetchWindow,
        risk_free: &RiskFreeRate,
    ) -> Result<RiskReport> {
        let prices = self.prices.fetch_prices(symbol, window).await?;
        tracing::debug!(
            target: "riskranger::analysis",
            symbol,
            points = prices.len(),
            "loaded price series"
        );
        let returns = compute_returns(&prices)?;
        Ok(self.engine.compute(&returns, risk_free)?)
    }

    /// Analyze every ticker over `window`.
    ///
    /// # Errors
    /// Fails as a whole only when the risk-free rate cannot be resolved.
    /// Per-ticker errors are reported in [`Analysis::outcomes`].
    pub async fn analyze(&self, tickers: &[String], window: FetchWindow) -> Result<Analysis> {
        self.analyze_with(tickers, window, |_| {}).await
    }

    /// Like [`analyze`](Self::analyze), calling `on_done` as each outcome
    /// arrives (in request order).
    pub async fn analyze_with<F>(
        &self,
        tickers: &[String],
        window: FetchWindow,
        mut on_done: F,
    ) -> Result<Analysis>
    where
        F: FnMut(&TickerOutcome),
    {
        let risk_free_rate = self.risk_free_rate(window).await?;
        tracing::info!(
            target: "riskranger::analysis",
            tickers = tickers.len(),
            rate = risk_free_rate.rate,
            origin = %risk_free_rate.origin,
            "analyzing {window}"
        );

        let outcomes = stream::iter(tickers)
            .map(|symbol| async move {
                let result = self.analyze_ticker(symbol, window, &risk_free_rate).await;
                if let Err(e) = &result {
                    tracing::warn!(target: "riskranger::analysis", symbol = %symbol, "{e}");
                }
                TickerOutcome {
                    symbol: symbol.clone(),
                    result,
                }
            })
            .buffered(self.concurrency)
            .inspect(|outcome| on_done(outcome))
            .collect::<Vec<_>>()
            .await;

        Ok(Analysis {
            window,
            risk_free_rate,
            outcomes,
        })
    }
}
