//! Health check endpoint
//!
//! Liveness only. The provider is not probed: a health check must never spend
//! a provider call.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
}

/// Health check handler
pub async fn handler() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "OK" }))
}
