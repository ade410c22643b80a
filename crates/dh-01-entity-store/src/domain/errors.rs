//! Error types for the Entity Store.

use shared_types::ErrorKind;
use std::fmt;
use thiserror::Error;

/// Unique index on `User.email`.
pub const EMAIL_INDEX: &str = "users.email";

/// Unique index on active `(donation, volunteer)` request pairs.
pub const ACTIVE_REQUEST_INDEX: &str = "requests.active_pair";

/// Which table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Donation,
    Request,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::User => "user",
            EntityKind::Donation => "donation",
            EntityKind::Request => "volunteer request",
        })
    }
}

/// Errors returned by [`EntityStore`](crate::EntityStore) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An update referenced a record that does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: String },

    /// A unique index already holds the key.
    #[error("unique index '{index}' violated")]
    UniqueViolation { index: &'static str },

    /// The record changed since it was read.
    #[error("version conflict on {entity} {id}: expected {expected}, found {found}")]
    VersionConflict {
        entity: EntityKind,
        id: String,
        expected: u64,
        found: u64,
    },

    /// The write would break a structural rule (immutable field, duplicate id).
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// Backend temporarily unreachable. Safe to retry.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The caller's deadline elapsed before the store answered.
    #[error("storage deadline exceeded")]
    DeadlineExceeded,
}

impl StoreError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }

    pub fn is_unique_violation(&self, index: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { index: i } if *i == index)
    }

    /// Default mapping onto the shared taxonomy. Services translate
    /// `UniqueViolation` and `NotFound` themselves when they know more.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::UniqueViolation { index } if *index == ACTIVE_REQUEST_INDEX => {
                ErrorKind::DuplicateRequest
            }
            StoreError::UniqueViolation { .. } => ErrorKind::Validation,
            StoreError::VersionConflict { .. }
            | StoreError::Constraint(_)
            | StoreError::Unavailable(_)
            | StoreError::DeadlineExceeded => ErrorKind::Storage,
        }
    }
}
