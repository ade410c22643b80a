//! Outbound port: the auth collaborator.
//!
//! The gateway never inspects credentials itself. It hands the raw bearer
//! token to an [`Authenticator`] and passes only the resolved [`User`] to
//! the core services.

use async_trait::async_trait;
use dh_01_entity_store::StoreError;
use shared_types::{Deadline, ErrorKind, User};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    Missing,

    #[error("invalid or expired credential")]
    Invalid,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Missing | AuthError::Invalid => ErrorKind::Unauthenticated,
            AuthError::Storage(err) => err.kind(),
        }
    }
}

/// Resolves a bearer credential to the acting user.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn resolve(&self, credential: &str, deadline: Deadline) -> Result<User, AuthError>;
}
