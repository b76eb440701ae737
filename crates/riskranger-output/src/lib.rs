#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/riskranger/riskranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod run;
pub mod text;

pub use export::{ExportError, ExportFormat, Exporter, ReportRow};
pub use run::{RunReport, RunReportBuilder, RunReportError, TickerFailure};
pub use text::{FailureText, ReportText, render_failure, render_report};
