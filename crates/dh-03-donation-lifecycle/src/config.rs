//! Lifecycle configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Attempts at a status write before a version conflict is reported.
    pub max_conflict_retries: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 3,
        }
    }
}

impl LifecycleConfig {
    pub fn validate(&self) -> Result<(), LifecycleConfigError> {
        if self.max_conflict_retries == 0 {
            return Err(LifecycleConfigError::NoAttempts);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleConfigError {
    #[error("max_conflict_retries must be at least 1")]
    NoAttempts,
}
