//! # Error Types
//!
//! The error taxonomy shared across subsystems plus the small parse errors
//! raised by shared value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The kind of every failure a core operation can report.
///
/// Each subsystem error exposes `kind()`; the HTTP surface maps kinds to
/// status codes and never shows anything else to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or missing input.
    #[serde(rename = "validation_error")]
    Validation,
    /// Referenced entity is absent.
    #[serde(rename = "not_found")]
    NotFound,
    /// Missing or invalid credential.
    #[serde(rename = "unauthenticated")]
    Unauthenticated,
    /// Authenticated but not permitted.
    #[serde(rename = "unauthorized")]
    Unauthorized,
    /// An active request already exists for the (donation, volunteer) pair.
    #[serde(rename = "duplicate_request")]
    DuplicateRequest,
    /// The requested status edge does not exist.
    #[serde(rename = "invalid_transition")]
    InvalidTransition,
    /// Infrastructure failure in the storage collaborator.
    #[serde(rename = "storage_error")]
    Storage,
}

impl ErrorKind {
    /// Wire name used in error bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::DuplicateRequest => "duplicate_request",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::Storage => "storage_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string did not name a member of a closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} '{value}', expected one of: {}", expected.join(", "))]
pub struct ParseEnumError {
    /// Vocabulary name, e.g. `category`.
    pub field: &'static str,
    /// The rejected input.
    pub value: String,
    /// Accepted spellings.
    pub expected: &'static [&'static str],
}

impl ParseEnumError {
    pub fn new(field: &'static str, value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

/// Invalid geographic coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("coordinates must be finite numbers")]
    NotFinite,

    #[error("unsupported geometry type '{0}', expected 'Point'")]
    UnsupportedGeometry(String),
}
