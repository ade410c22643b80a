//! Workflow configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Reward credited to the volunteer when a request completes.
    pub points_per_completion: u64,
    /// Attempts at a status write before a version conflict is reported.
    pub max_conflict_retries: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            points_per_completion: 10,
            max_conflict_retries: 3,
        }
    }
}

impl WorkflowConfig {
    pub fn validate(&self) -> Result<(), WorkflowConfigError> {
        if self.max_conflict_retries == 0 {
            return Err(WorkflowConfigError::NoAttempts);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowConfigError {
    #[error("max_conflict_retries must be at least 1")]
    NoAttempts,
}
