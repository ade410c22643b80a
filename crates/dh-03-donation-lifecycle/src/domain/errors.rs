//! Error types for the Donation Lifecycle Manager.

use dh_01_entity_store::StoreError;
use shared_types::{DonationId, DonationStatus, ErrorKind, ParseEnumError, UserId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    /// Input failed a creation or filter rule.
    #[error("{0}")]
    Validation(String),

    #[error("donation {0} not found")]
    NotFound(DonationId),

    /// Only the owning donor or an admin may change a donation.
    #[error("user {actor} may not modify donation {donation}")]
    Unauthorized { actor: UserId, donation: DonationId },

    #[error("donation cannot move from {from} to {to}")]
    InvalidTransition {
        from: DonationStatus,
        to: DonationStatus,
    },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LifecycleError {
    pub fn validation(message: impl Into<String>) -> Self {
        LifecycleError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::Validation(_) => ErrorKind::Validation,
            LifecycleError::NotFound(_) => ErrorKind::NotFound,
            LifecycleError::Unauthorized { .. } => ErrorKind::Unauthorized,
            LifecycleError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            LifecycleError::Storage(err) => err.kind(),
        }
    }
}

impl From<ParseEnumError> for LifecycleError {
    fn from(err: ParseEnumError) -> Self {
        LifecycleError::Validation(err.to_string())
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
