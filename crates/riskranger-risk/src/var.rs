//! Value at Risk and Conditional Value at Risk
//!
//! All figures are expressed as returns, so a loss shows up as a negative
//! number: a 95% VaR of -0.021 means a daily loss worse than 2.1% happened on
//! only 5% of the observed days.
//!
//! - Historical VaR: the `(1 - c)` quantile of the empirical distribution,
//!   linearly interpolated between order statistics
//! - Historical CVaR: mean of the returns at or below the historical VaR
//! - Cornish-Fisher VaR: normal quantile corrected for the sample skewness and
//!   kurtosis, `mu + z_cf * sigma`

use crate::stats::{self, quantile_sorted};

/// Historical-simulation VaR at `confidence` (e.g. 0.95).
///
/// Returns `None` for an empty sample.
pub fn historical_var(returns: &[f64], confidence: f64) -> Option<f64> {
    let sorted = sorted_returns(returns)?;
    Some(quantile_sorted(&sorted, 1.0 - confidence))
}

/// Historical CVaR (expected shortfall) at `confidence`.
///
/// Averages every return at or below the historical VaR threshold. The
/// threshold never lies below the smallest return, so the tail is never empty.
pub fn historical_cvar(returns: &[f64], confidence: f64) -> Option<f64> {
    let sorted = sorted_returns(returns)?;
    let threshold = quantile_sorted(&sorted, 1.0 - confidence);
    let tail: Vec<f64> = sorted.iter().copied().take_while(|&r| r <= threshold).collect();
    stats::mean(&tail)
}

/// Cornish-Fisher (modified) VaR at `confidence`.
///
/// Uses population moments. When the sample has no dispersion the skewness
/// and kurtosis are undefined and the result collapses to the mean.
pub fn cornish_fisher_var(returns: &[f64], confidence: f64) -> Option<f64> {
    let mu = stats::mean(returns)?;
    let sigma = stats::std_dev(returns, 0)?;
    let (Some(s), Some(k)) = (stats::skewness(returns), stats::kurtosis(returns)) else {
        return Some(mu);
    };

    let z = stats::norm_ppf(1.0 - confidence);
    let z_cf = z + (z.powi(2) - 1.0) * s / 6.0 + (z.powi(3) - 3.0 * z) * (k - 3.0) / 24.0
        - (2.0 * z.powi(3) - 5.0 * z) * s.powi(2) / 36.0;

    Some(mu + z_cf * sigma)
}

fn sorted_returns(returns: &[f64]) -> Option<Vec<f64>> {
    if returns.is_empty() {
        return None;
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted)
}
