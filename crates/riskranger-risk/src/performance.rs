//! Return and risk-adjusted performance measures.

use crate::error::{Result, RiskError};
use crate::stats;

/// Volatility at or below this level is treated as zero.
pub const ZERO_VOLATILITY_TOLERANCE: f64 = 1e-12;

/// Compounded total return, `prod(1 + r) - 1`.
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0
}

/// Compound a total return over `periods` periods to a yearly rate.
///
/// `(1 + total)^(periods_per_year / periods) - 1`
pub fn annualized_return(total_return: f64, periods: usize, periods_per_year: u32) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    (1.0 + total_return).powf(f64::from(periods_per_year) / periods as f64) - 1.0
}

/// Sample standard deviation scaled by `sqrt(periods_per_year)`.
///
/// `None` with fewer than two returns.
pub fn annualized_volatility(returns: &[f64], periods_per_year: u32) -> Option<f64> {
    stats::std_dev(returns, 1).map(|sd| sd * f64::from(periods_per_year).sqrt())
}

/// Sharpe ratio, `(annualized_return - risk_free_rate) / volatility`.
///
/// # Errors
/// [`RiskError::ZeroVolatility`] when `volatility` is not above
/// [`ZERO_VOLATILITY_TOLERANCE`].
pub fn sharpe_ratio(annualized_return: f64, risk_free_rate: f64, volatility: f64) -> Result<f64> {
    if volatility.is_nan() || volatility <= ZERO_VOLATILITY_TOLERANCE {
        return Err(RiskError::ZeroVolatility);
    }
    Ok((annualized_return - risk_free_rate) / volatility)
}
