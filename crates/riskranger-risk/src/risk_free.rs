//! Risk-Free Rate Estimation
//!
//! The Sharpe ratio needs an annualized risk-free rate in the same convention
//! as the annualized return: a decimal fraction per year. Two strategies are
//! supported:
//!
//! - `Override`: a caller-supplied rate, used verbatim
//! - `Market`: a short-duration government yield from a [`RateSource`]
//!   (the 13-week T-bill index averaged over the analysis window)
//!
//! If the market source fails, a configured fallback rate is used instead of
//! failing the whole run. Without a fallback the failure surfaces as
//! [`RiskError::RateUnavailable`].

use crate::error::{Result, RiskError};
use derive_more::Display;
use riskranger_data::{FetchWindow, RateSource};
use serde::{Deserialize, Serialize};

/// Where a risk-free rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateOrigin {
    /// Supplied by the caller
    #[display("override")]
    Override,
    /// Derived from market yields
    #[display("market")]
    Market,
    /// Fallback constant after the market source failed
    #[display("fallback")]
    Fallback,
}

/// Annualized risk-free rate as a decimal fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFreeRate {
    /// Rate per year (0.04 = 4%)
    pub rate: f64,
    /// How the rate was obtained
    pub origin: RateOrigin,
}

impl RiskFreeRate {
    /// A caller-supplied rate.
    pub fn fixed(rate: f64) -> Result<Self> {
        validate_rate(rate, "risk-free rate")?;
        Ok(Self {
            rate,
            origin: RateOrigin::Override,
        })
    }
}

/// How the estimator obtains its rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFreeStrategy {
    /// Use this rate verbatim
    Override(f64),
    /// Ask the rate source
    Market,
}

/// Resolves the risk-free rate for a run.
#[derive(Debug, Clone)]
pub struct RiskFreeRateEstimator {
    strategy: RiskFreeStrategy,
    fallback: Option<f64>,
}

impl Default for RiskFreeRateEstimator {
    fn default() -> Self {
        Self {
            strategy: RiskFreeStrategy::Market,
            fallback: None,
        }
    }
}

impl RiskFreeRateEstimator {
    /// Create an estimator with the given strategy and no fallback.
    ///
    /// # Errors
    /// [`RiskError::InvalidConfiguration`] for a non-finite override rate.
    pub fn new(strategy: RiskFreeStrategy) -> Result<Self> {
        if let RiskFreeStrategy::Override(rate) = strategy {
            validate_rate(rate, "risk-free rate override")?;
        }
        Ok(Self {
            strategy,
            fallback: None,
        })
    }

    /// Rate to use when the market source fails.
    pub fn with_fallback(mut self, rate: f64) -> Result<Self> {
        validate_rate(rate, "fallback risk-free rate")?;
        self.fallback = Some(rate);
        Ok(self)
    }

    /// Configured strategy.
    pub const fn strategy(&self) -> RiskFreeStrategy {
        self.strategy
    }

    /// Configured fallback rate, if any.
    pub const fn fallback(&self) -> Option<f64> {
        self.fallback
    }

    /// Resolve the rate for `window`.
    ///
    /// The source is only consulted for [`RiskFreeStrategy::Market`].
    pub async fn estimate<S: RateSource>(
        &self,
        source: &S,
        window: FetchWindow,
    ) -> Result<RiskFreeRate> {
        let rate = match self.strategy {
            RiskFreeStrategy::Override(rate) => {
                return Ok(RiskFreeRate {
                    rate,
                    origin: RateOrigin::Override,
                });
            }
            RiskFreeStrategy::Market => source.fetch_rate(window).await,
        };

        let failure = match rate {
            Ok(rate) if rate.is_finite() => {
                tracing::debug!(target: "riskranger::risk", rate, "using market risk-free rate");
                return Ok(RiskFreeRate {
                    rate,
                    origin: RateOrigin::Market,
                });
            }
            Ok(rate) => format!("source returned non-finite rate {rate}"),
            Err(e) => e.to_string(),
        };

        match self.fallback {
            Some(rate) => {
                tracing::warn!(
                    target: "riskranger::risk",
                    fallback = rate,
                    "risk-free rate unavailable ({failure}), using fallback"
                );
                Ok(RiskFreeRate {
                    rate,
                    origin: RateOrigin::Fallback,
                })
            }
            None => Err(RiskError::RateUnavailable(failure)),
        }
    }
}

fn validate_rate(rate: f64, what: &str) -> Result<()> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(RiskError::InvalidConfiguration(format!(
            "{what} must be a finite decimal rate above -100%, got {rate}"
        )));
    }
    Ok(())
}
