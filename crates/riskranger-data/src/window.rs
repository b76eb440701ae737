//! Fetch windows.
//!
//! Callers ask for data either over an explicit calendar range or over a
//! lookback period ending today (`30d`, `6mo`, `10y`, `max`).

use crate::error::{DataError, Result};
use chrono::{Days, Months, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[display("{start} to {end}")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    pub const fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Lookback period ending at the most recent trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lookback {
    /// Number of calendar days
    Days(u32),
    /// Number of months
    Months(u32),
    /// Number of years
    Years(u32),
    /// Full available history
    Max,
}

impl Lookback {
    /// Range string understood by the Yahoo chart endpoint.
    pub fn range_param(&self) -> String {
        match self {
            Self::Days(n) => format!("{n}d"),
            Self::Months(n) => format!("{n}mo"),
            Self::Years(n) => format!("{n}y"),
            Self::Max => "max".to_string(),
        }
    }

    /// Calendar range covered by this lookback when it ends on `today`.
    ///
    /// `Max` has no defined start and resolves to `None`.
    pub fn resolve(&self, today: NaiveDate) -> Option<DateRange> {
        let start = match *self {
            Self::Days(n) => today.checked_sub_days(Days::new(u64::from(n)))?,
            Self::Months(n) => today.checked_sub_months(Months::new(n))?,
            Self::Years(n) => today.checked_sub_months(Months::new(n.checked_mul(12)?))?,
            Self::Max => return None,
        };
        DateRange::new(start, today).ok()
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.range_param())
    }
}

impl FromStr for Lookback {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let period = s.trim().to_lowercase();
        if period == "max" {
            return Ok(Self::Max);
        }

        let split = period
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| DataError::InvalidPeriod(s.to_string()))?;
        let (digits, unit) = period.split_at(split);
        let n: u32 = digits
            .parse()
            .map_err(|_| DataError::InvalidPeriod(s.to_string()))?;
        if n == 0 {
            return Err(DataError::InvalidPeriod(s.to_string()));
        }

        match unit {
            "d" => Ok(Self::Days(n)),
            "mo" => Ok(Self::Months(n)),
            "y" => Ok(Self::Years(n)),
            _ => Err(DataError::InvalidPeriod(s.to_string())),
        }
    }
}

/// The window a fetch covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum FetchWindow {
    /// Explicit calendar range
    #[display("{_0}")]
    Range(DateRange),
    /// Lookback period ending today
    #[display("last {_0}")]
    Lookback(Lookback),
}

impl FetchWindow {
    /// Calendar dates covered when the window is evaluated on `today`.
    ///
    /// `None` for [`Lookback::Max`], whose start depends on the symbol.
    pub fn calendar_range(&self, today: NaiveDate) -> Option<DateRange> {
        match self {
            Self::Range(range) => Some(*range),
            Self::Lookback(lookback) => lookback.resolve(today),
        }
    }
}

impl From<DateRange> for FetchWindow {
    fn from(range: DateRange) -> Self {
        Self::Range(range)
    }
}

impl From<Lookback> for FetchWindow {
    fn from(lookback: Lookback) -> Self {
        Self::Lookback(lookback)
    }
}
