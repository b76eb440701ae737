#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/riskranger/riskranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod drawdown;
pub mod engine;
pub mod error;
pub mod performance;
pub mod report;
pub mod returns;
pub mod risk_free;
pub mod stats;
pub mod var;

// Re-export main types
pub use drawdown::{Drawdown, max_drawdown};
pub use engine::{RiskConfig, RiskMetricsEngine};
pub use error::{Result, RiskError};
pub use report::RiskReport;
pub use returns::{ReturnSeries, compute_returns};
pub use risk_free::{RateOrigin, RiskFreeRate, RiskFreeRateEstimator, RiskFreeStrategy};
