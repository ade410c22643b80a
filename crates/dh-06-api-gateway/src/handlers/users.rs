//! `/api/users` routes.

use crate::extract::Caller;
use axum::Json;
use shared_types::User;

/// The resolved caller's profile. The credential hash is never serialized.
pub async fn me(Caller(user): Caller) -> Json<User> {
    Json(user)
}
