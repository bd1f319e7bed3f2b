//! Prometheus metrics endpoint
//!
//! Exposes metrics in Prometheus text format for scraping.

use axum::{extract::State, http::StatusCode};

use crate::handlers::AppState;

/// Metrics handler for Prometheus scraping
///
/// # Response
///
/// - `200 OK` with metrics in Prometheus text format
/// - `500 Internal Server Error` if encoding fails
///
/// # Example
///
/// ```bash
/// curl http://localhost:3000/metrics
/// # HELP flashai_generation_requests_total Total number of generation requests by outcome
/// # TYPE flashai_generation_requests_total counter
/// flashai_generation_requests_total{outcome="success"} 42
/// ```
pub async fn handler(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics().gather() {
        Ok(output) => (StatusCode::OK, output),
        Err(e) => {
            tracing::error!(error = %e, "Failed to gather metrics for Prometheus scraping");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to gather metrics".to_string(),
            )
        }
    }
}
