//! Unauthenticated operational endpoints.

use crate::domain::error::ApiError;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use shared_types::ErrorKind;
use tracing::error;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "donation-hub",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus scrape endpoint
pub async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let body = hub_telemetry::gather_text().map_err(|e| {
        error!(error = %e, "failed to encode metrics");
        ApiError::new(ErrorKind::Storage, "metrics unavailable")
    })?;
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
