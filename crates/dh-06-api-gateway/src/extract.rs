//! Request extractors.
//!
//! [`Caller`] is the auth gate: a handler that takes it only runs once the
//! bearer credential has resolved to a user. The `Api*` wrappers swap axum's
//! plain-text rejections for the JSON error envelope.

use crate::domain::error::ApiError;
use crate::middleware::auth::extract_bearer_token;
use crate::ports::outbound::AuthError;
use crate::service::AppState;
use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use shared_types::User;
use tracing::debug;

/// The authenticated user behind the request.
#[derive(Debug, Clone)]
pub struct Caller(pub User);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_bearer_token(&parts.headers) else {
            return Err(AuthError::Missing.into());
        };
        let user = state
            .authenticator
            .resolve(token, state.deadline())
            .await?;
        debug!(user_id = %user.id, role = %user.role, "caller resolved");
        Ok(Caller(user))
    }
}

/// `axum::Json` with validation-kind rejections.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` with validation-kind rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `axum::extract::Path` with validation-kind rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Parse an id path segment, naming the entity on failure.
pub fn parse_id<T: std::str::FromStr>(raw: &str, entity: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("invalid {entity} id '{raw}'")))
}
