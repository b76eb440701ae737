//! CSV and JSON export of risk reports.
//!
//! CSV rows are flat: one row per ticker, rates as decimal fractions and the
//! drawdown dates as ISO dates (empty when the price never fell).

use chrono::NaiveDate;
use riskranger_risk::RiskReport;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Pick a format from a file path's extension.
    ///
    /// # Errors
    /// [`ExportError::InvalidFormat`] for anything other than `.csv` or `.json`.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::PrettyJson),
            _ => Err(ExportError::InvalidFormat(format!(
                "cannot infer export format from {}; use .csv or .json",
                path.display()
            ))),
        }
    }
}

/// One ticker's report flattened for tabular export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Ticker symbol.
    pub symbol: String,
    /// First price date.
    pub period_start: NaiveDate,
    /// Last price date.
    pub period_end: NaiveDate,
    /// Number of returns.
    pub observations: usize,
    /// VaR confidence level.
    pub confidence_level: f64,
    /// Periods per year.
    pub annualization_factor: u32,
    /// Risk-free rate.
    pub risk_free_rate: f64,
    /// `override`, `market` or `fallback`.
    pub risk_free_origin: String,
    /// Total return.
    pub total_return: f64,
    /// Annualized return.
    pub annualized_return: f64,
    /// Annualized volatility.
    pub annualized_volatility: f64,
    /// Per-period volatility.
    pub period_volatility: f64,
    /// Skewness.
    pub skewness: f64,
    /// Kurtosis.
    pub kurtosis: f64,
    /// Historical VaR.
    pub var: f64,
    /// Historical CVaR.
    pub cvar: f64,
    /// Cornish-Fisher VaR.
    pub cornish_fisher_var: f64,
    /// Maximum drawdown.
    pub max_drawdown: f64,
    /// Drawdown peak date.
    pub drawdown_peak: Option<NaiveDate>,
    /// Drawdown trough date.
    pub drawdown_trough: Option<NaiveDate>,
    /// Annualized excess return.
    pub excess_return: f64,
    /// Return to volatility ratio.
    pub return_to_volatility: f64,
    /// Sharpe ratio.
    pub sharpe_ratio: f64,
}

impl From<&RiskReport> for ReportRow {
    fn from(report: &RiskReport) -> Self {
        Self {
            symbol: report.symbol.clone(),
            period_start: report.period_start,
            period_end: report.period_end,
            observations: report.observations,
            confidence_level: report.confidence_level,
            annualization_factor: report.annualization_factor,
            risk_free_rate: report.risk_free_rate.rate,
            risk_free_origin: report.risk_free_rate.origin.to_string(),
            total_return: report.total_return,
            annualized_return: report.annualized_return,
            annualized_volatility: report.annualized_volatility,
            period_volatility: report.period_volatility,
            skewness: report.skewness,
            kurtosis: report.kurtosis,
            var: report.var,
            cvar: report.cvar,
            cornish_fisher_var: report.cornish_fisher_var,
            max_drawdown: report.max_drawdown(),
            drawdown_peak: report.drawdown.peak_date,
            drawdown_trough: report.drawdown.trough_date,
            excess_return: report.excess_return,
            return_to_volatility: report.return_to_volatility,
            sharpe_ratio: report.sharpe_ratio,
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn rows_to_csv(rows: &[ReportRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for [RiskReport] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let rows: Vec<ReportRow> = self.iter().map(ReportRow::from).collect();
                rows_to_csv(&rows)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for RiskReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        std::slice::from_ref(self).export_to_string(format)
    }
}
