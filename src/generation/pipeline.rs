//! Generation endpoint core
//!
//! Composes sanitize → provider call → normalize for one request, stopping at
//! the first failing stage. Every run ends in a [`CardSet`] or exactly one
//! [`GenerationError`].

use std::time::Instant;
use tokio_util::sync::CancellationToken;

use super::card::CardSet;
use super::material::sanitize;
use super::normalize::normalize;
use super::provider::GenerationClient;
use crate::config::LimitsConfig;
use crate::error::GenerationError;
use crate::metrics::Metrics;
use crate::middleware::RequestId;

/// Lifecycle of one generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Generating,
    Normalizing,
    Succeeded,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Generating => "generating",
            Stage::Normalizing => "normalizing",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        }
    }

    /// True for `Succeeded` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Succeeded | Stage::Failed)
    }
}

/// Stage tracker for a single run; transitions are logged with the request id
struct Run {
    request_id: RequestId,
    stage: Stage,
}

impl Run {
    fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            stage: Stage::Idle,
        }
    }

    fn enter(&mut self, next: Stage) {
        debug_assert!(!self.stage.is_terminal(), "run already finished");
        tracing::debug!(
            request_id = %self.request_id,
            from = self.stage.as_str(),
            to = next.as_str(),
            "Generation stage transition"
        );
        self.stage = next;
    }

    fn fail(&mut self, err: GenerationError) -> GenerationError {
        tracing::debug!(
            request_id = %self.request_id,
            stage = self.stage.as_str(),
            kind = %err.kind(),
            "Generation stage failed"
        );
        self.enter(Stage::Failed);
        err
    }
}

/// The generation endpoint, independent of any transport
///
/// Holds only shared configuration and collaborators. Two calls with identical
/// input make two independent provider calls; nothing is cached.
#[derive(Clone)]
pub struct Generator {
    client: GenerationClient,
    limits: LimitsConfig,
    metrics: Metrics,
}

impl Generator {
    pub fn new(client: GenerationClient, limits: LimitsConfig, metrics: Metrics) -> Self {
        Self {
            client,
            limits,
            metrics,
        }
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Run one generation request to completion
    pub async fn generate(
        &self,
        raw_text: Option<&str>,
        request_id: RequestId,
        cancel: &CancellationToken,
    ) -> Result<CardSet, GenerationError> {
        let result = self.run(raw_text, request_id, cancel).await;

        match &result {
            Ok(cards) => self.metrics.record_success(cards.len()),
            Err(err) => self.metrics.record_failure(err.kind()),
        }

        result
    }

    async fn run(
        &self,
        raw_text: Option<&str>,
        request_id: RequestId,
        cancel: &CancellationToken,
    ) -> Result<CardSet, GenerationError> {
        let mut run = Run::new(request_id);

        run.enter(Stage::Validating);
        let material = match sanitize(raw_text, &self.limits) {
            Ok(material) => material,
            Err(err) => return Err(run.fail(err)),
        };

        run.enter(Stage::Generating);
        let started = Instant::now();
        let raw = self.client.generate(&material, cancel, request_id).await;
        self.metrics
            .record_provider_duration(started.elapsed().as_secs_f64() * 1000.0);
        let raw = match raw {
            Ok(raw) => raw,
            Err(err) => return Err(run.fail(err)),
        };

        run.enter(Stage::Normalizing);
        let cards = match normalize(&raw) {
            Ok(cards) => cards,
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    response_length = raw.len(),
                    error = %err,
                    "Provider output rejected"
                );
                return Err(run.fail(err));
            }
        };

        run.enter(Stage::Succeeded);
        tracing::info!(
            request_id = %request_id,
            cards = cards.len(),
            material_chars = material.char_count(),
            truncated = material.was_truncated(),
            "Generated flashcards"
        );

        Ok(cards)
    }
}
