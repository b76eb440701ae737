//! Maximum drawdown
//!
//! Wealth starts at 1.0 on the first price date and compounds every return.
//! The drawdown at each date is `wealth / running_peak - 1`; the maximum
//! drawdown is the most negative of those, so it is always <= 0 and exactly 0
//! when wealth never falls below a previous peak.

use crate::returns::ReturnSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Largest peak-to-trough decline of cumulative wealth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawdown {
    /// Decline as a negative fraction (-0.25 = 25% below the peak), or 0
    pub max_drawdown: f64,
    /// Date the peak preceding the worst decline was set
    pub peak_date: Option<NaiveDate>,
    /// Date of the trough
    pub trough_date: Option<NaiveDate>,
}

impl Drawdown {
    /// A series that never declined.
    pub const fn none() -> Self {
        Self {
            max_drawdown: 0.0,
            peak_date: None,
            trough_date: None,
        }
    }
}

/// Maximum drawdown of a return series, with the dates that bound it.
pub fn max_drawdown(returns: &ReturnSeries) -> Drawdown {
    let mut wealth = 1.0;
    let mut peak = 1.0;
    let mut peak_date = returns.start();
    let mut worst = Drawdown::none();

    for (&r, &date) in returns.values().iter().zip(returns.dates()) {
        wealth *= 1.0 + r;
        if wealth > peak {
            peak = wealth;
            peak_date = date;
            continue;
        }

        let drawdown = wealth / peak - 1.0;
        if drawdown < worst.max_drawdown {
            worst = Drawdown {
                max_drawdown: drawdown,
                peak_date: Some(peak_date),
                trough_date: Some(date),
            };
        }
    }

    worst
}
