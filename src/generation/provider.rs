//! External generation client
//!
//! [`CompletionProvider`] is the seam to the text-generation service; the
//! production implementation speaks the OpenAI-compatible chat-completions
//! protocol. [`GenerationClient`] wraps exactly one provider call with the hard
//! timeout and the cancellation token, and is the only caller of the trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::material::StudyMaterial;
use crate::config::ProviderConfig;
use crate::error::{AppError, AppResult, GenerationError};
use crate::middleware::RequestId;

/// Instruction sent with every generation request
pub const SYSTEM_PROMPT: &str = "You are a flashcard generator. Given study material, create 5-10 flashcards.
Return JSON array: [{ \"front\": \"question\", \"back\": \"answer\" }]
Rules:
- Questions should test understanding, not just recall
- Answers should be concise (1-2 sentences max)
- Cover the most important concepts
- No duplicate concepts
Only return valid JSON, no markdown.";

/// One completion request as handed to a provider
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Failure reported by a provider implementation
///
/// The cause is for operator logs only.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ProviderFailure(pub String);

/// A text-generation service
///
/// Implementations hold configuration only, never per-request state, so one
/// instance is shared across concurrent requests behind an `Arc`. Dropping the
/// returned future must abandon the call and release its connection.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Perform one completion and return the raw text content
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Longest prefix of an upstream error body kept in the failure cause
const MAX_ERROR_BODY: usize = 500;

/// OpenAI-compatible chat-completions provider
pub struct OpenAiProvider {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    /// Build a provider with an explicit credential
    pub fn new(config: &ProviderConfig, api_key: impl Into<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(AppError::HttpClient)?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    /// Build a provider reading the credential from the environment
    ///
    /// # Errors
    ///
    /// Fails with [`GenerationError::ConfigMissing`] if the variable named by
    /// `config.api_key_env` is unset or blank.
    pub fn from_env(config: &ProviderConfig) -> AppResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::ConfigMissing {
                env_var: config.api_key_env.clone(),
            })?;

        Self::new(config, api_key)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        let body = ChatCompletionBody {
            model: &self.model,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderFailure(format!("request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let snippet = super::material::truncate_chars(&text, MAX_ERROR_BODY);
            return Err(ProviderFailure(format!(
                "{} returned {}: {}",
                self.endpoint, status, snippet
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderFailure(format!("invalid completion body from {}: {}", self.endpoint, e))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

/// Single bounded call to the provider
///
/// Owns the fixed prompt and sampling settings plus the timeout. Shared
/// across requests; holds no per-request state.
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn CompletionProvider>,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &ProviderConfig) -> Self {
        Self {
            provider,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Issue exactly one provider call for `material`
    ///
    /// The call races the provider against the deadline and `cancel`. When the
    /// deadline passes, `cancel` is triggered; whichever way the token fires,
    /// the provider future is dropped (releasing its connection) and the call
    /// fails with [`GenerationError::ProviderTimeout`]. No retry is attempted.
    pub async fn generate(
        &self,
        material: &StudyMaterial,
        cancel: &CancellationToken,
        request_id: RequestId,
    ) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: material.as_str().to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(
            request_id = %request_id,
            material_chars = material.char_count(),
            timeout_ms = self.timeout_ms(),
            "Starting provider call"
        );

        let started = Instant::now();
        let call = self.provider.complete(&request);
        let deadline = tokio::time::sleep(self.timeout);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            _ = deadline => {
                cancel.cancel();
                None
            }
            result = call => Some(result),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Some(Ok(text)) => {
                tracing::info!(
                    request_id = %request_id,
                    response_length = text.len(),
                    elapsed_ms = elapsed_ms,
                    "Provider call completed"
                );
                Ok(text)
            }
            Some(Err(failure)) => {
                tracing::error!(
                    request_id = %request_id,
                    elapsed_ms = elapsed_ms,
                    error = %failure,
                    "Provider call failed"
                );
                Err(GenerationError::ProviderError { cause: failure.0 })
            }
            None => {
                tracing::warn!(
                    request_id = %request_id,
                    elapsed_ms = elapsed_ms,
                    timeout_ms = self.timeout_ms(),
                    "Provider call cancelled at deadline"
                );
                Err(GenerationError::ProviderTimeout {
                    timeout_ms: self.timeout_ms(),
                })
            }
        }
    }
}
