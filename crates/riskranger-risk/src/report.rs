//! Per-ticker risk report.

use crate::drawdown::Drawdown;
use crate::risk_free::RiskFreeRate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Risk and return statistics for one ticker over one period.
///
/// Every rate and return is a decimal fraction (0.05 = 5%). VaR figures are
/// returns, so losses are negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Ticker symbol.
    pub symbol: String,

    /// Date of the first price.
    pub period_start: NaiveDate,

    /// Date of the last price.
    pub period_end: NaiveDate,

    /// Number of returns the statistics are computed from.
    pub observations: usize,

    /// Confidence level used for VaR and CVaR.
    pub confidence_level: f64,

    /// Return periods per year.
    pub annualization_factor: u32,

    /// Risk-free rate used for the Sharpe ratio.
    pub risk_free_rate: RiskFreeRate,

    /// Compounded return over the whole period.
    pub total_return: f64,

    /// Total return compounded to a one-year rate.
    pub annualized_return: f64,

    /// Sample standard deviation of returns scaled to a year.
    pub annualized_volatility: f64,

    /// Population standard deviation of returns, not annualized.
    pub period_volatility: f64,

    /// Population skewness of returns.
    pub skewness: f64,

    /// Population kurtosis of returns (3 for a normal distribution).
    pub kurtosis: f64,

    /// Historical VaR at `confidence_level`.
    pub var: f64,

    /// Historical CVaR at `confidence_level`.
    pub cvar: f64,

    /// Cornish-Fisher VaR at `confidence_level`.
    pub cornish_fisher_var: f64,

    /// Worst peak-to-trough decline.
    pub drawdown: Drawdown,

    /// Annualized return minus the risk-free rate.
    pub excess_return: f64,

    /// Annualized return divided by annualized volatility.
    pub return_to_volatility: f64,

    /// Excess return per unit of annualized volatility.
    pub sharpe_ratio: f64,
}

impl RiskReport {
    /// Maximum drawdown as a negative fraction.
    pub const fn max_drawdown(&self) -> f64 {
        self.drawdown.max_drawdown
    }
}
