#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/riskranger/riskranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod retry;
pub mod series;
pub mod source;
pub mod window;
pub mod yahoo;

pub use error::{DataError, Result};
pub use retry::BackoffPolicy;
pub use series::{PricePoint, PriceField, PriceSeries};
pub use source::{PriceSource, RateSource};
pub use window::{DateRange, FetchWindow, Lookback};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
