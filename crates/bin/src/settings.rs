//! Optional JSON settings file.
//!
//! Every field is optional. Command-line flags take precedence over the file,
//! which takes precedence over the built-in defaults.
//!
//! ```json
//! {
//!   "confidence_level": 0.99,
//!   "annualization_factor": 252,
//!   "fallback_rate": 0.04,
//!   "price_field": "adjusted_close",
//!   "period": "10y",
//!   "concurrency": 8
//! }
//! ```

use riskranger_data::{BackoffPolicy, Lookback, PriceField};
use riskranger_risk::RiskConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Errors loading the settings file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum SettingsError {
    /// File could not be read.
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// File is not valid settings JSON.
    #[error("invalid settings file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) confidence_level: Option<f64>,
    pub(crate) annualization_factor: Option<u32>,
    pub(crate) risk_free_rate: Option<f64>,
    pub(crate) fallback_rate: Option<f64>,
    pub(crate) rate_symbol: Option<String>,
    pub(crate) price_field: Option<PriceField>,
    pub(crate) period: Option<String>,
    pub(crate) concurrency: Option<usize>,
    pub(crate) rate_limit_ms: Option<u64>,
    pub(crate) max_retries: Option<u32>,
}

impl Settings {
    pub(crate) fn load(path: &Path) -> Result<Self, SettingsError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: display.clone(),
            source,
        })?;
        Self::parse(&text).map_err(|source| SettingsError::Json {
            path: display,
            source,
        })
    }

    fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load `path` if given, else the empty settings.
    pub(crate) fn load_optional(path: Option<&Path>) -> Result<Self, SettingsError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Engine configuration with `confidence` and `annualization` flags applied.
    pub(crate) fn risk_config(
        &self,
        confidence: Option<f64>,
        annualization: Option<u32>,
    ) -> RiskConfig {
        let defaults = RiskConfig::default();
        RiskConfig {
            confidence_level: confidence
                .or(self.confidence_level)
                .unwrap_or(defaults.confidence_level),
            annualization_factor: annualization
                .or(self.annualization_factor)
                .unwrap_or(defaults.annualization_factor),
        }
    }

    /// Retry policy with the configured retry count.
    pub(crate) fn backoff(&self) -> BackoffPolicy {
        let mut policy = BackoffPolicy::default();
        if let Some(max_retries) = self.max_retries {
            policy.max_retries = max_retries;
        }
        policy
    }

    /// Lookback period from the file, e.g. `10y`.
    pub(crate) fn period(&self) -> riskranger_data::Result<Option<Lookback>> {
        self.period.as_deref().map(str::parse).transpose()
    }

    pub(crate) fn rate_limit(&self) -> Option<Duration> {
        self.rate_limit_ms.map(Duration::from_millis)
    }
}
