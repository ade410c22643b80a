//! API error envelope.
//!
//! Every failure leaves the gateway as
//! `{"error": {"kind": "<kind>", "message": "<text>"}}` with a status code
//! derived from the kind.

use crate::domain::config::ConfigError;
use crate::ports::outbound::AuthError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dh_01_entity_store::StoreError;
use dh_03_donation_lifecycle::LifecycleError;
use dh_04_matching_query::MatchingError;
use dh_05_volunteer_workflow::WorkflowError;
use serde::Serialize;
use shared_types::ErrorKind;
use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::error;

/// The only storage message a client ever sees.
pub const STORAGE_MESSAGE: &str = "storage temporarily unavailable";

/// A mapped failure ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: StatusCode,
}

impl ApiError {
    /// Error whose status follows from its kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: status_for(kind),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// The request outran its budget.
    pub fn timeout() -> Self {
        Self {
            kind: ErrorKind::Storage,
            message: STORAGE_MESSAGE.to_string(),
            status: StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Map a subsystem error, hiding storage details from the client.
    fn from_domain(kind: ErrorKind, err: &dyn std::error::Error) -> Self {
        if kind == ErrorKind::Storage {
            error!(error = %err, "storage failure");
            return Self::new(kind, STORAGE_MESSAGE);
        }
        Self::new(kind, err.to_string())
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateRequest | ErrorKind::InvalidTransition => StatusCode::CONFLICT,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    kind: ErrorKind,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                kind: self.kind,
                message: &self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

// =============================================================================
// SUBSYSTEM CONVERSIONS
// =============================================================================

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        Self::from_domain(err.kind(), &err)
    }
}

impl From<MatchingError> for ApiError {
    fn from(err: MatchingError) -> Self {
        Self::from_domain(err.kind(), &err)
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        Self::from_domain(err.kind(), &err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::from_domain(err.kind(), &err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::from_domain(err.kind(), &err)
    }
}

// =============================================================================
// EXTRACTOR REJECTIONS
// =============================================================================

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(format!("invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(format!("invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(format!("invalid path: {}", rejection.body_text()))
    }
}

/// Gateway startup and serving errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
