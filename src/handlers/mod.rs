//! HTTP request handlers for the FlashAI API

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppResult;
use crate::generation::{CompletionProvider, GenerationClient, Generator, OpenAiProvider};
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;

pub mod generate;
pub mod health;
pub mod metrics;

/// Application state shared across all handlers
///
/// Holds configuration and stateless collaborators only; cloning is cheap and
/// no request data is ever stored here.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    generator: Generator,
    metrics: Metrics,
}

impl AppState {
    /// Create state with the OpenAI-compatible provider
    ///
    /// # Errors
    ///
    /// Fails with a `ConfigMissing` generation error if the provider credential
    /// is absent from the environment, so the server never starts without one.
    pub fn new(config: Config) -> AppResult<Self> {
        let provider = OpenAiProvider::from_env(&config.provider)?;
        Self::with_provider(config, Arc::new(provider))
    }

    /// Create state around an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn CompletionProvider>) -> AppResult<Self> {
        let metrics = Metrics::new()?;
        let client = GenerationClient::new(provider, &config.provider);
        let generator = Generator::new(client, config.limits, metrics.clone());

        Ok(Self {
            config: Arc::new(config),
            generator,
            metrics,
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the generation endpoint core
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the HTTP router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate::handler))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
