//! Descriptive statistics over return samples.
//!
//! Functions take plain slices and return `None` when the statistic is not
//! defined for the input (empty sample, too few points, zero dispersion).

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom.
///
/// `ddof = 0` gives the population estimator, `ddof = 1` the sample one.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - ddof) as f64).sqrt())
}

/// Population skewness, `E[(x - mu)^3] / sigma^3`.
pub fn skewness(values: &[f64]) -> Option<f64> {
    standardized_moment(values, 3)
}

/// Population kurtosis, `E[(x - mu)^4] / sigma^4` (3 for a normal distribution).
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    standardized_moment(values, 4)
}

fn standardized_moment(values: &[f64], order: i32) -> Option<f64> {
    let m = mean(values)?;
    let sigma = std_dev(values, 0)?;
    if sigma <= 0.0 {
        return None;
    }
    let moment = values.iter().map(|v| (v - m).powi(order)).sum::<f64>() / values.len() as f64;
    Some(moment / sigma.powi(order))
}

/// Empirical quantile with linear interpolation between order statistics.
///
/// With the sample sorted ascending, the position is `h = (n - 1) * p` and the
/// result is `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
/// `p` is clamped to `[0, 1]`.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || p.is_nan() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, p))
}

/// [`quantile`] over data that is already sorted ascending and non-empty.
pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Inverse cumulative distribution function of the standard normal.
///
/// Acklam's rational approximation, relative error below 1.2e-9.
pub fn norm_ppf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        assert_relative_eq!(std_dev(&values, 0).unwrap(), 2.0);
        assert_relative_eq!(std_dev(&values, 1).unwrap(), (32.0_f64 / 7.0).sqrt());
    }

    #[test]
    fn test_undefined_statistics() {
        assert!(mean(&[]).is_none());
        assert!(std_dev(&[1.0], 1).is_none());
        assert!(skewness(&[1.0, 1.0, 1.0]).is_none());
        assert!(quantile(&[], 0.5).is_none());
    }

    #[test]
    fn test_symmetric_sample_has_zero_skew() {
        let values = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert_relative_eq!(skewness(&values).unwrap(), 0.0, epsilon = 1e-12);
        // Discrete uniform on five points: E[x^4] / sigma^4 = 6.8 / 4
        assert_relative_eq!(kurtosis(&values).unwrap(), 1.7, epsilon = 1e-12);
    }

    #[test]
    fn test_right_tail_has_positive_skew() {
        let values = [0.0, 0.0, 0.0, 0.0, 10.0];
        assert!(skewness(&values).unwrap() > 0.0);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(1.0, 5.0)]
    #[case(0.5, 3.0)]
    #[case(0.25, 2.0)]
    #[case(0.1, 1.4)]
    #[case(0.05, 1.2)]
    fn test_linear_quantile(#[case] p: f64, #[case] expected: f64) {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_relative_eq!(quantile(&values, p).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_single_value() {
        assert_relative_eq!(quantile(&[0.3], 0.05).unwrap(), 0.3);
    }

    #[test]
    fn test_norm_ppf() {
        assert!(norm_ppf(0.5).abs() < 1e-9);
        assert_relative_eq!(norm_ppf(0.95), 1.644_853_626_951_472, epsilon = 1e-8);
        assert_relative_eq!(norm_ppf(0.975), 1.959_963_984_540_054, epsilon = 1e-8);
        assert_relative_eq!(norm_ppf(0.01), -2.326_347_874_040_841, epsilon = 1e-8);
        assert_relative_eq!(norm_ppf(0.001), -3.090_232_306_167_813, epsilon = 1e-7);
        assert_relative_eq!(norm_ppf(0.05), -norm_ppf(0.95), epsilon = 1e-9);
        assert_eq!(norm_ppf(0.0), f64::NEG_INFINITY);
        assert_eq!(norm_ppf(1.0), f64::INFINITY);
    }
}
