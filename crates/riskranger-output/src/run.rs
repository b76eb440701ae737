//! Whole-run report: every ticker's outcome in request order.

use chrono::{DateTime, Utc};
use riskranger_risk::{RiskFreeRate, RiskReport};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while serializing a run report.
#[derive(Debug, Error)]
pub enum RunReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A ticker that produced no report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerFailure {
    /// Requested symbol.
    pub symbol: String,

    /// Error message.
    pub error: String,
}

impl TickerFailure {
    /// Create a failure entry.
    pub fn new(symbol: impl Into<String>, error: impl ToString) -> Self {
        Self {
            symbol: symbol.into(),
            error: error.to_string(),
        }
    }
}

/// Outcome of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Requested window, e.g. `last 5y` or `2020-01-01 to 2024-12-31`.
    pub window: String,

    /// Rate shared by every ticker.
    pub risk_free_rate: Option<RiskFreeRate>,

    /// Successful reports in request order.
    pub reports: Vec<RiskReport>,

    /// Failed tickers in request order.
    pub failures: Vec<TickerFailure>,
}

impl RunReport {
    /// True when no ticker produced a report.
    pub fn all_failed(&self) -> bool {
        self.reports.is_empty()
    }

    /// Convert the run to pretty JSON.
    pub fn to_json(&self) -> Result<String, RunReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for [`RunReport`].
#[derive(Debug, Default)]
pub struct RunReportBuilder {
    window: Option<String>,
    risk_free_rate: Option<RiskFreeRate>,
    reports: Vec<RiskReport>,
    failures: Vec<TickerFailure>,
}

impl RunReportBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window description.
    pub fn window(mut self, window: impl ToString) -> Self {
        self.window = Some(window.to_string());
        self
    }

    /// Set the shared risk-free rate.
    pub const fn risk_free_rate(mut self, rate: RiskFreeRate) -> Self {
        self.risk_free_rate = Some(rate);
        self
    }

    /// Add a successful report.
    pub fn report(mut self, report: RiskReport) -> Self {
        self.reports.push(report);
        self
    }

    /// Add a failed ticker.
    pub fn failure(mut self, failure: TickerFailure) -> Self {
        self.failures.push(failure);
        self
    }

    /// Build the run report, stamped with the current time.
    pub fn build(self) -> RunReport {
        RunReport {
            generated_at: Utc::now(),
            window: self.window.unwrap_or_default(),
            risk_free_rate: self.risk_free_rate,
            reports: self.reports,
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run_is_all_failed() {
        let run = RunReportBuilder::new()
            .window("last 1y")
            .failure(TickerFailure::new("ZZZZ", "Ticker not found: ZZZZ"))
            .build();

        assert!(run.all_failed());
        assert_eq!(run.window, "last 1y");
        assert!(run.risk_free_rate.is_none());
    }

    #[test]
    fn test_run_to_json() {
        let run = RunReportBuilder::new()
            .window("last 1y")
            .risk_free_rate(RiskFreeRate::fixed(0.03).unwrap())
            .failure(TickerFailure::new("ZZZZ", "not found"))
            .build();

        let json = run.to_json().unwrap();
        assert!(json.contains("\"window\": \"last 1y\""));
        assert!(json.contains("\"origin\": \"override\""));
        assert!(json.contains("\"symbol\": \"ZZZZ\""));
        assert!(json.contains("generated_at"));
    }
}
