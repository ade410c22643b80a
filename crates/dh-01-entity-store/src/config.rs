//! Store configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Entity Store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
    /// Geospatial index geometry for donation locations.
    pub geo: dh_02_geo_index::GeoIndexConfig,
}

impl StoreConfig {
    /// Fast retries for tests.
    pub fn for_testing() -> Self {
        Self {
            retry: RetryPolicy {
                max_attempts: 3,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(5),
                multiplier: 2.0,
            },
            geo: Default::default(),
        }
    }

    pub fn validate(&self) -> Result<(), StoreConfigError> {
        self.retry.validate()?;
        self.geo
            .validate()
            .map_err(|e| StoreConfigError::Geo(e.to_string()))
    }
}

/// Exponential backoff for transient storage failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(25),
            max_backoff: Duration::from_millis(500),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn next_backoff(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier).min(self.max_backoff)
    }

    pub fn validate(&self) -> Result<(), StoreConfigError> {
        if self.max_attempts == 0 {
            return Err(StoreConfigError::InvalidRetry(
                "max_attempts must be at least 1".into(),
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(StoreConfigError::InvalidRetry(
                "multiplier must be >= 1.0".into(),
            ));
        }
        if self.initial_backoff > self.max_backoff {
            return Err(StoreConfigError::InvalidRetry(
                "initial_backoff exceeds max_backoff".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreConfigError {
    #[error("invalid retry policy: {0}")]
    InvalidRetry(String),

    #[error("invalid geo index config: {0}")]
    Geo(String),
}
