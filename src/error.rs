//! Error types for FlashAI
//!
//! Two families live here:
//!
//! - [`AppError`]: startup and configuration failures (config file, server bind).
//!   These never reach an HTTP client.
//! - [`GenerationError`]: the per-request failure taxonomy. Every path through the
//!   generation pipeline ends in either a card set or exactly one of these, and
//!   [`GenerationError::classify`] maps each one to a stable external triple.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Startup and configuration errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Failed to initialize metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

/// Stable identifier for each failure in the generation taxonomy
///
/// Doubles as the Prometheus `outcome` label, so the set of values is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ConfigMissing,
    EmptyInput,
    TooShort,
    ProviderTimeout,
    ProviderError,
    MalformedResponse,
    EmptyResult,
}

impl FailureKind {
    /// Label value used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConfigMissing => "config_missing",
            FailureKind::EmptyInput => "empty_input",
            FailureKind::TooShort => "too_short",
            FailureKind::ProviderTimeout => "provider_timeout",
            FailureKind::ProviderError => "provider_error",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::EmptyResult => "empty_result",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures of a single generation request
///
/// The `Display` output is the operator-facing description and may contain
/// provider detail. It is written to the log only; clients receive
/// [`ClassifiedFailure::message`].
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("provider credential missing: environment variable {env_var} is not set")]
    ConfigMissing { env_var: String },

    #[error("study material is empty")]
    EmptyInput,

    #[error("study material has {actual} characters, minimum is {min_chars}")]
    TooShort { min_chars: usize, actual: usize },

    #[error("provider call exceeded {timeout_ms}ms budget")]
    ProviderTimeout { timeout_ms: u64 },

    #[error("provider call failed: {cause}")]
    ProviderError { cause: String },

    #[error("provider response could not be parsed: {detail}")]
    MalformedResponse { detail: String },

    #[error("no valid flashcards in provider response ({discarded} records discarded)")]
    EmptyResult { discarded: usize },
}

/// The externally visible form of a [`GenerationError`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFailure {
    pub kind: FailureKind,
    pub status: StatusCode,
    pub message: String,
}

impl GenerationError {
    /// Taxonomy entry for this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ConfigMissing { .. } => FailureKind::ConfigMissing,
            Self::EmptyInput => FailureKind::EmptyInput,
            Self::TooShort { .. } => FailureKind::TooShort,
            Self::ProviderTimeout { .. } => FailureKind::ProviderTimeout,
            Self::ProviderError { .. } => FailureKind::ProviderError,
            Self::MalformedResponse { .. } => FailureKind::MalformedResponse,
            Self::EmptyResult { .. } => FailureKind::EmptyResult,
        }
    }

    /// Map this failure to its stable `(kind, status, message)` triple
    ///
    /// Messages never include provider payloads or transport detail.
    pub fn classify(&self) -> ClassifiedFailure {
        let (status, message) = match self {
            Self::ConfigMissing { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The flashcard service is not configured. Please contact the operator."
                    .to_string(),
            ),
            Self::EmptyInput => (
                StatusCode::BAD_REQUEST,
                "Please provide study material to generate flashcards from.".to_string(),
            ),
            Self::TooShort { min_chars, .. } => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Please provide at least {} characters of study material.",
                    min_chars
                ),
            ),
            Self::ProviderTimeout { .. } => (
                StatusCode::GATEWAY_TIMEOUT,
                "The AI provider timed out. Please retry.".to_string(),
            ),
            Self::ProviderError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate flashcards. Please try again.".to_string(),
            ),
            Self::MalformedResponse { .. } => (
                StatusCode::BAD_GATEWAY,
                "AI response was not in the expected format. Please try again.".to_string(),
            ),
            Self::EmptyResult { .. } => (
                StatusCode::BAD_GATEWAY,
                "AI did not return any flashcards. Try again.".to_string(),
            ),
        };

        ClassifiedFailure {
            kind: self.kind(),
            status,
            message,
        }
    }

    /// True for failures caused by the caller's input rather than the provider
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::TooShort { .. })
    }
}

impl IntoResponse for GenerationError {
    /// Render the classified status and message
    ///
    /// Logging happens at the call site, which knows the request id.
    fn into_response(self) -> Response {
        let classified = self.classify();

        let body = Json(serde_json::json!({
            "error": classified.message,
        }));

        (classified.status, body).into_response()
    }
}
