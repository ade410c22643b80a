//! Error types for the Matching Query Service.

use dh_01_entity_store::StoreError;
use shared_types::{ErrorKind, GeoError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchingError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl MatchingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchingError::Validation(_) => ErrorKind::Validation,
            MatchingError::Storage(err) => err.kind(),
        }
    }
}

impl From<GeoError> for MatchingError {
    fn from(err: GeoError) -> Self {
        MatchingError::Validation(err.to_string())
    }
}

pub type MatchingResult<T> = Result<T, MatchingError>;
