//! Client side of the generation endpoint

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::generation::CardSet;
use crate::middleware::{REQUEST_ID_HEADER, RequestId};

/// Why a generation round trip failed, as seen by the client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Non-success status; `message` is the server's classified message if present
    #[error("server returned {status}")]
    Server { status: u16, message: Option<String> },

    /// Success status without a usable card list
    #[error("response contained no cards")]
    NoCards,

    #[error("transport failure: {0}")]
    Transport(String),
}

/// The generation endpoint as seen from the client
#[async_trait]
pub trait GenerateApi: Send + Sync {
    /// Submit already-trimmed study text
    async fn generate(&self, text: &str, request_id: RequestId) -> Result<CardSet, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CardsBody {
    cards: Option<CardSet>,
}

/// HTTP implementation against a running FlashAI server
#[derive(Debug, Clone)]
pub struct HttpGenerateApi {
    http: reqwest::Client,
    url: String,
}

impl HttpGenerateApi {
    /// `server_url` is the server root, e.g. `http://127.0.0.1:3000`
    pub fn new(server_url: &str) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(AppError::HttpClient)?;
        Ok(Self {
            http,
            url: format!("{}/api/generate", server_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl GenerateApi for HttpGenerateApi {
    async fn generate(&self, text: &str, request_id: RequestId) -> Result<CardSet, ApiError> {
        let response = self
            .http
            .post(&self.url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error)
                .filter(|message| !message.trim().is_empty());
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<CardsBody>(&bytes)
            .ok()
            .and_then(|body| body.cards)
            .ok_or(ApiError::NoCards)
    }
}
