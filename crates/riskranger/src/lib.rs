#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/riskranger/riskranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;

// Re-export main types from sub-crates
pub use riskranger_data as data;
pub use riskranger_output as output;
pub use riskranger_risk as risk;

pub use analysis::{
    Analysis, AnalysisError, DEFAULT_CONCURRENCY, Result, RiskAnalyzer, TickerOutcome,
};

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
