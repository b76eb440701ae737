//! Bounded retry for transient data source failures.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Exponential backoff applied between attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Growth factor between consecutive delays
    pub multiplier: f64,
    /// Retries after the first attempt (0 disables retrying)
    pub max_retries: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            max_retries: 3,
        }
    }
}

impl BackoffPolicy {
    /// A policy that never retries.
    pub const fn none() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
            max_retries: 0,
        }
    }

    /// Delay to wait before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(retry.min(i32::MAX as u32) as i32);
        let millis = self.initial_delay.as_millis() as f64 * factor;
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    ///
    /// Only [`DataError::Transient`] failures are retried. When retries are
    /// exhausted the last transient failure is surfaced as
    /// [`DataError::DataSourceUnavailable`].
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(DataError::Transient(reason)) if attempt <= self.max_retries => {
                    let delay = self.delay_for(attempt - 1);
                    tracing::warn!(
                        target: "riskranger::data",
                        attempt,
                        ?delay,
                        "{what} failed ({reason}), retrying"
                    );
                    sleep(delay).await;
                }
                Err(DataError::Transient(reason)) => {
                    return Err(DataError::DataSourceUnavailable {
                        reason,
                        attempts: attempt,
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
