//! Generation endpoint handler
//!
//! Handles `POST /api/generate`: one request in, one card set or one
//! classified failure out.

use axum::{Extension, Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::GenerationError;
use crate::generation::CardSet;
use crate::handlers::AppState;
use crate::middleware::RequestId;

/// Request body: the study material
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Success body: 1 to 10 cards in provider order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub cards: CardSet,
}

/// POST /api/generate handler
///
/// The body is parsed as JSON whatever its `content-type`. A body that is not
/// valid JSON, or is missing `text`, is treated as absent input and classified
/// as `EmptyInput`. The provider call is bounded by the configured budget;
/// failures are rendered through the classifier and never carry provider
/// detail.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, GenerationError> {
    let text = match serde_json::from_slice::<GenerateRequest>(&body) {
        Ok(request) => request.text,
        Err(e) => {
            tracing::debug!(
                request_id = %request_id,
                body_length = body.len(),
                error = %e,
                "Unreadable generation request body"
            );
            None
        }
    };

    tracing::debug!(
        request_id = %request_id,
        text_length = text.as_deref().map(str::len).unwrap_or(0),
        "Received generation request"
    );

    let cancel = CancellationToken::new();
    let cards = state
        .generator()
        .generate(text.as_deref(), request_id, &cancel)
        .await
        .inspect_err(|err| log_failure(request_id, err))?;

    Ok(Json(GenerateResponse { cards }))
}

fn log_failure(request_id: RequestId, err: &GenerationError) {
    let kind = err.kind();
    if err.is_client_error() {
        tracing::debug!(
            request_id = %request_id,
            kind = %kind,
            detail = %err,
            "Rejected generation request"
        );
    } else {
        tracing::error!(
            request_id = %request_id,
            kind = %kind,
            status = err.classify().status.as_u16(),
            detail = %err,
            "Generation request failed"
        );
    }
}
