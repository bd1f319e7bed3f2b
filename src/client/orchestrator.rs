//! Client orchestrator
//!
//! The caller-side twin of the generation endpoint. It applies the same
//! minimum-length rule before any network call, debounces submissions,
//! bounds each round trip with its own timeout, and owns the browsing state.

use std::time::Duration;
use tokio::time::Instant;

use super::api::{ApiError, GenerateApi};
use super::browse::BrowsingState;
use super::debounce::Debouncer;
use crate::config::{ClientConfig, LimitsConfig};
use crate::generation::{Flashcard, material::truncate_chars};
use crate::middleware::RequestId;

/// Fallback when the server gives no message of its own
const DEFAULT_SERVER_MESSAGE: &str = "Unable to generate flashcards right now.";

/// A failure the user sees
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Please paste your study material first.")]
    EmptyInput,

    #[error("Please provide at least {min_chars} characters for better flashcards.")]
    TooShort { min_chars: usize },

    #[error("Request took too long. Please try again.")]
    TookTooLong,

    #[error("{0}")]
    Server(String),

    #[error("No cards were returned. Please try again.")]
    NoCards,

    #[error("Something went wrong.")]
    Unexpected,
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Server { message, .. } => ClientError::Server(
                message.unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string()),
            ),
            ApiError::NoCards => ClientError::NoCards,
            ApiError::Transport(_) => ClientError::Unexpected,
        }
    }
}

/// What happened to one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new card set is being browsed from its first card
    Loaded { cards: usize },
    /// Local validation failed; nothing was sent
    Rejected(ClientError),
    /// Dropped silently: debounced, or a generation is already in flight
    Ignored,
    /// The round trip failed
    Failed(ClientError),
}

/// Externally visible client state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    NoCards,
    Generating,
    Browsing { index: usize, total: usize },
}

/// Holds the in-flight flag for the lifetime of one round trip
///
/// Cleared on drop, so a `submit()` future abandoned by its caller does not
/// leave the session stuck in `Generating`.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Owns one study session
pub struct Orchestrator<A> {
    api: A,
    limits: LimitsConfig,
    timeout: Duration,
    debouncer: Debouncer,
    input: String,
    generating: bool,
    browsing: BrowsingState,
    error: Option<ClientError>,
}

impl<A: GenerateApi> Orchestrator<A> {
    pub fn new(api: A, limits: LimitsConfig, client: &ClientConfig) -> Self {
        Self {
            api,
            limits,
            timeout: client.timeout(),
            debouncer: Debouncer::new(client.debounce_window()),
            input: String::new(),
            generating: false,
            browsing: BrowsingState::default(),
            error: None,
        }
    }

    /// Replace the input text, capped at the maximum length
    pub fn set_input(&mut self, text: &str) {
        self.input = truncate_chars(text, self.limits.max_chars).to_string();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Characters still needed to reach the minimum, while the input is non-empty
    pub fn missing_chars(&self) -> Option<usize> {
        let chars = self.input.chars().count();
        (chars > 0 && chars < self.limits.min_chars).then(|| self.limits.min_chars - chars)
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    pub fn browsing(&self) -> &BrowsingState {
        &self.browsing
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.browsing.current()
    }

    pub fn state(&self) -> ClientState {
        if self.generating {
            return ClientState::Generating;
        }
        match &self.browsing {
            BrowsingState::NoCards => ClientState::NoCards,
            BrowsingState::Browsing { cards, index } => ClientState::Browsing {
                index: *index,
                total: cards.len(),
            },
        }
    }

    /// Submit the current input for generation
    ///
    /// Blank or short input is rejected locally with a visible error. A
    /// submission within the debounce window of the previous accepted one, or
    /// while a generation is in flight, is ignored without changing the
    /// visible error. Otherwise one request is sent and bounded by the client
    /// timeout; on expiry the request is abandoned and its response discarded.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let trimmed = self.input.trim().to_string();
        if trimmed.is_empty() {
            return self.reject(ClientError::EmptyInput);
        }
        if trimmed.chars().count() < self.limits.min_chars {
            return self.reject(ClientError::TooShort {
                min_chars: self.limits.min_chars,
            });
        }

        if self.generating {
            tracing::debug!("Submission ignored: generation already in flight");
            return SubmitOutcome::Ignored;
        }
        if !self.debouncer.try_accept(Instant::now()) {
            tracing::debug!(
                window_ms = self.debouncer.window().as_millis() as u64,
                "Submission ignored: inside debounce window"
            );
            return SubmitOutcome::Ignored;
        }

        let request_id = RequestId::new();
        self.error = None;

        tracing::debug!(request_id = %request_id, chars = trimmed.len(), "Submitting study material");
        let result = {
            let _in_flight = InFlight::enter(&mut self.generating);
            tokio::time::timeout(self.timeout, self.api.generate(&trimmed, request_id)).await
        };

        let err = match result {
            Ok(Ok(cards)) => {
                let count = cards.len();
                self.browsing.load(cards);
                tracing::info!(request_id = %request_id, cards = count, "Flashcards loaded");
                return SubmitOutcome::Loaded { cards: count };
            }
            Ok(Err(api_error)) => {
                tracing::warn!(request_id = %request_id, error = %api_error, "Generation failed");
                ClientError::from(api_error)
            }
            Err(_elapsed) => {
                tracing::warn!(
                    request_id = %request_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Generation abandoned at client deadline"
                );
                ClientError::TookTooLong
            }
        };

        self.error = Some(err.clone());
        SubmitOutcome::Failed(err)
    }

    fn reject(&mut self, err: ClientError) -> SubmitOutcome {
        self.error = Some(err.clone());
        SubmitOutcome::Rejected(err)
    }

    pub fn next(&mut self) {
        self.browsing.next();
    }

    pub fn previous(&mut self) {
        self.browsing.previous();
    }

    /// Drop the cards, clear the input and any error
    pub fn reset(&mut self) {
        self.browsing.reset();
        self.input.clear();
        self.error = None;
    }
}
