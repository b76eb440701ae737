//! Risk Metrics Engine
//!
//! Turns a return series into a [`RiskReport`]. The engine is a pure function
//! of its configuration, the returns and the risk-free rate.
//!
//! Annualization follows the usual conventions for `N` periods per year:
//! - annualized return: `(1 + total)^(N / n) - 1`
//! - annualized volatility: `sample_std * sqrt(N)`
//! - Sharpe ratio: `(annualized return - rf) / annualized volatility`
//!
//! A report is all or nothing: if any statistic is undefined the whole report
//! fails.

use crate::drawdown::max_drawdown;
use crate::error::{Result, RiskError};
use crate::performance::{annualized_return, annualized_volatility, sharpe_ratio, total_return};
use crate::report::RiskReport;
use crate::returns::{ReturnSeries, compute_returns};
use crate::risk_free::RiskFreeRate;
use crate::stats;
use crate::var::{cornish_fisher_var, historical_cvar, historical_var};
use riskranger_data::PriceSeries;
use serde::{Deserialize, Serialize};

/// Minimum number of returns the engine accepts (sample volatility needs two).
pub const MIN_RETURNS: usize = 2;

/// Risk engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Confidence level for VaR and CVaR, strictly between 0 and 1 (default: 0.95)
    pub confidence_level: f64,

    /// Return periods per year (default: 252 trading days)
    pub annualization_factor: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            annualization_factor: 252,
        }
    }
}

impl RiskConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// [`RiskError::InvalidConfiguration`] when the confidence level is outside
    /// `(0, 1)` or the annualization factor is zero.
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(RiskError::InvalidConfiguration(format!(
                "confidence level must be strictly between 0 and 1, got {}",
                self.confidence_level
            )));
        }
        if self.annualization_factor == 0 {
            return Err(RiskError::InvalidConfiguration(
                "annualization factor must be a positive number of periods".to_string(),
            ));
        }
        Ok(())
    }
}

/// Computes risk reports from return series.
#[derive(Debug, Clone)]
pub struct RiskMetricsEngine {
    config: RiskConfig,
}

impl RiskMetricsEngine {
    /// Create an engine, validating the configuration.
    pub fn new(config: RiskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine with the default configuration.
    ///
    /// # Errors
    /// Returns an error if the default configuration is invalid (should not happen).
    pub fn try_default() -> Result<Self> {
        Self::new(RiskConfig::default())
    }

    /// Engine configuration.
    pub const fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Compute the full report for `returns`.
    ///
    /// # Errors
    /// - [`RiskError::InsufficientData`] with fewer than [`MIN_RETURNS`] returns
    /// - [`RiskError::InvalidConfiguration`] for a non-finite risk-free rate
    /// - [`RiskError::ZeroVolatility`] when every return is identical
    pub fn compute(&self, returns: &ReturnSeries, risk_free: &RiskFreeRate) -> Result<RiskReport> {
        let values = returns.as_slice();
        if values.len() < MIN_RETURNS {
            return Err(RiskError::InsufficientData {
                required: MIN_RETURNS,
                actual: values.len(),
            });
        }
        if !risk_free.rate.is_finite() {
            return Err(RiskError::InvalidConfiguration(format!(
                "risk-free rate must be finite, got {}",
                risk_free.rate
            )));
        }

        let confidence = self.config.confidence_level;
        let periods_per_year = self.config.annualization_factor;
        let insufficient = || RiskError::InsufficientData {
            required: MIN_RETURNS,
            actual: values.len(),
        };

        let total = total_return(values);
        let annualized = annualized_return(total, values.len(), periods_per_year);
        let volatility = annualized_volatility(values, periods_per_year).ok_or_else(insufficient)?;
        let sharpe = sharpe_ratio(annualized, risk_free.rate, volatility)?;

        let period_volatility = stats::std_dev(values, 0).ok_or_else(insufficient)?;
        let skewness = stats::skewness(values).ok_or(RiskError::ZeroVolatility)?;
        let kurtosis = stats::kurtosis(values).ok_or(RiskError::ZeroVolatility)?;

        let var = historical_var(values, confidence).ok_or_else(insufficient)?;
        let cvar = historical_cvar(values, confidence).ok_or_else(insufficient)?;
        let cf_var = cornish_fisher_var(values, confidence).ok_or_else(insufficient)?;

        let report = RiskReport {
            symbol: returns.symbol().to_string(),
            period_start: returns.start(),
            period_end: returns.end(),
            observations: values.len(),
            confidence_level: confidence,
            annualization_factor: periods_per_year,
            risk_free_rate: *risk_free,
            total_return: total,
            annualized_return: annualized,
            annualized_volatility: volatility,
            period_volatility,
            skewness,
            kurtosis,
            var,
            cvar,
            cornish_fisher_var: cf_var,
            drawdown: max_drawdown(returns),
            excess_return: annualized - risk_free.rate,
            return_to_volatility: annualized / volatility,
            sharpe_ratio: sharpe,
        };

        tracing::debug!(
            target: "riskranger::risk",
            symbol = %report.symbol,
            observations = report.observations,
            sharpe = report.sharpe_ratio,
            "computed risk report"
        );

        Ok(report)
    }

    /// Compute returns from `prices`, then the report.
    pub fn compute_from_prices(
        &self,
        prices: &PriceSeries,
        risk_free: &RiskFreeRate,
    ) -> Result<RiskReport> {
        self.compute(&compute_returns(prices)?, risk_free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk_free::RateOrigin;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn prices(values: &[f64]) -> PriceSeries {
        PriceSeries::from_prices("TEST", start(), values).unwrap()
    }

    fn rf(rate: f64) -> RiskFreeRate {
        RiskFreeRate::fixed(rate).unwrap()
    }

    #[test]
    fn test_risk_config_default() {
        let config = RiskConfig::default();
        assert_eq!(config.confidence_level, 0.95);
        assert_eq!(config.annualization_factor, 252);
    }

    #[rstest]
    #[case(1.5)]
    #[case(1.0)]
    #[case(0.0)]
    #[case(-0.2)]
    #[case(f64::NAN)]
    fn test_invalid_confidence(#[case] confidence_level: f64) {
        let config = RiskConfig {
            confidence_level,
            ..Default::default()
        };
        assert!(matches!(
            RiskMetricsEngine::new(config),
            Err(RiskError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_annualization_factor() {
        let config = RiskConfig {
            annualization_factor: 0,
            ..Default::default()
        };
        assert!(matches!(
            RiskMetricsEngine::new(config),
            Err(RiskError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_reference_example() {
        let engine = RiskMetricsEngine::try_default().unwrap();
        let report = engine
            .compute_from_prices(&prices(&[100.0, 110.0, 99.0]), &rf(0.0))
            .unwrap();

        assert_eq!(report.observations, 2);
        assert_eq!(report.period_start, start());
        assert_eq!(report.period_end, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_relative_eq!(report.total_return, -0.01, epsilon = 1e-12);
        assert_relative_eq!(report.max_drawdown(), 0.99 / 1.10 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            report.annualized_return,
            0.99_f64.powf(126.0) - 1.0,
            epsilon = 1e-12
        );
        // Sample std of [0.1, -0.1] is sqrt(0.02)
        assert_relative_eq!(
            report.annualized_volatility,
            0.02_f64.sqrt() * 252.0_f64.sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            report.sharpe_ratio,
            report.annualized_return / report.annualized_volatility,
            epsilon = 1e-12
        );
        // 5% quantile of [-0.1, 0.1]: -0.1 + 0.05 * 0.2
        assert_relative_eq!(report.var, -0.09, epsilon = 1e-12);
        assert_relative_eq!(report.cvar, -0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_returns_fail_sharpe() {
        let engine = RiskMetricsEngine::try_default().unwrap();
        let series = prices(&[100.0, 100.0, 100.0, 100.0]);
        assert_eq!(
            engine.compute_from_prices(&series, &rf(0.02)),
            Err(RiskError::ZeroVolatility)
        );
    }

    #[test]
    fn test_single_return_is_insufficient() {
        let engine = RiskMetricsEngine::try_default().unwrap();
        assert_eq!(
            engine.compute_from_prices(&prices(&[100.0, 101.0]), &rf(0.02)),
            Err(RiskError::InsufficientData {
                required: 2,
                actual: 1
            })
        );
        assert!(matches!(
            engine.compute_from_prices(&prices(&[100.0]), &rf(0.02)),
            Err(RiskError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_non_finite_rate_rejected() {
        let engine = RiskMetricsEngine::try_default().unwrap();
        let bad = RiskFreeRate {
            rate: f64::NAN,
            origin: RateOrigin::Market,
        };
        assert!(matches!(
            engine.compute_from_prices(&prices(&[100.0, 101.0, 99.0]), &bad),
            Err(RiskError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_report_invariants_on_random_walks() {
        let engine = RiskMetricsEngine::try_default().unwrap();
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..25 {
            let mut price = 100.0;
            let mut path = Vec::with_capacity(253);
            for _ in 0..253 {
                path.push(price);
                price *= 1.0 + rng.gen_range(-0.03..0.031);
            }

            let report = engine.compute_from_prices(&prices(&path), &rf(0.04)).unwrap();

            assert_eq!(report.observations, 252);
            assert_relative_eq!(
                report.total_return,
                path[252] / path[0] - 1.0,
                epsilon = 1e-9
            );
            // Exactly one year of daily returns annualizes to the total return.
            assert_relative_eq!(report.annualized_return, report.total_return, epsilon = 1e-9);
            assert!(report.max_drawdown() <= 0.0);
            assert!(report.cvar <= report.var);
            assert!(report.annualized_volatility > 0.0);
            assert_relative_eq!(
                report.excess_return,
                report.annualized_return - 0.04,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_rising_prices_have_no_drawdown() {
        let engine = RiskMetricsEngine::try_default().unwrap();
        let report = engine
            .compute_from_prices(&prices(&[10.0, 10.5, 10.5, 11.0, 12.5]), &rf(0.0))
            .unwrap();
        assert_eq!(report.max_drawdown(), 0.0);
        assert!(report.drawdown.trough_date.is_none());
    }
}
