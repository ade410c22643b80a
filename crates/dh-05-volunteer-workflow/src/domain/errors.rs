//! Error types for the Volunteer Request Workflow.

use dh_01_entity_store::StoreError;
use shared_types::{DonationId, DonationStatus, ErrorKind, RequestId, RequestStatus, UserId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),

    #[error("volunteer request {0} not found")]
    RequestNotFound(RequestId),

    #[error("donation {0} not found")]
    DonationNotFound(DonationId),

    #[error("user {actor} may not {action} volunteer request {request}")]
    Unauthorized {
        actor: UserId,
        request: RequestId,
        action: &'static str,
    },

    #[error("volunteer request cannot move from {from} to {to}")]
    InvalidTransition { from: RequestStatus, to: RequestStatus },

    /// Accepting would move the donation along an edge that does not exist.
    #[error("donation cannot move from {from} to {to}")]
    DonationTransition {
        from: DonationStatus,
        to: DonationStatus,
    },

    #[error("an active request for donation {donation} by volunteer {volunteer} already exists")]
    DuplicateRequest {
        donation: DonationId,
        volunteer: UserId,
    },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkflowError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Validation(_) => ErrorKind::Validation,
            WorkflowError::RequestNotFound(_) | WorkflowError::DonationNotFound(_) => {
                ErrorKind::NotFound
            }
            WorkflowError::Unauthorized { .. } => ErrorKind::Unauthorized,
            WorkflowError::InvalidTransition { .. } | WorkflowError::DonationTransition { .. } => {
                ErrorKind::InvalidTransition
            }
            WorkflowError::DuplicateRequest { .. } => ErrorKind::DuplicateRequest,
            WorkflowError::Storage(err) => err.kind(),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
