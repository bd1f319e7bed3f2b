//! Prometheus metrics collection for FlashAI
//!
//! Tracks:
//! - Generation requests by outcome (`success` or a failure kind)
//! - Provider call latency
//! - Cards returned per successful request
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::error::FailureKind;

/// Outcome label for successful requests
const OUTCOME_SUCCESS: &str = "success";

/// Metrics collector for FlashAI
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    generation_requests: IntCounterVec,
    provider_duration: Histogram,
    cards_generated: Histogram,
    recording_failures: IntCounter,
}

impl Metrics {
    /// Create a new Metrics instance with its own registry
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: success + 7 failure kinds = 8 time series
        let generation_requests = IntCounterVec::new(
            Opts::new(
                "flashai_generation_requests_total",
                "Total number of generation requests by outcome",
            ),
            &["outcome"],
        )?;

        let provider_duration = Histogram::with_opts(
            HistogramOpts::new(
                "flashai_provider_duration_ms",
                "Provider call latency in milliseconds, including timed-out calls",
            )
            .buckets(vec![
                100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 15000.0, 30000.0,
            ]),
        )?;

        let cards_generated = Histogram::with_opts(
            HistogramOpts::new(
                "flashai_cards_generated",
                "Number of cards returned per successful generation",
            )
            .buckets(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]),
        )?;

        let recording_failures = IntCounter::with_opts(Opts::new(
            "flashai_metrics_recording_failures_total",
            "Total number of failed metric recordings",
        ))?;

        registry.register(Box::new(generation_requests.clone()))?;
        registry.register(Box::new(provider_duration.clone()))?;
        registry.register(Box::new(cards_generated.clone()))?;
        registry.register(Box::new(recording_failures.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            generation_requests,
            provider_duration,
            cards_generated,
            recording_failures,
        })
    }

    fn inc_outcome(&self, outcome: &str) {
        match self
            .generation_requests
            .get_metric_with_label_values(&[outcome])
        {
            Ok(counter) => counter.inc(),
            Err(e) => {
                tracing::warn!(outcome = outcome, error = %e, "Failed to record generation outcome");
                self.recording_failures.inc();
            }
        }
    }

    /// Record a successful generation and its card count
    pub fn record_success(&self, cards: usize) {
        self.inc_outcome(OUTCOME_SUCCESS);
        self.cards_generated.observe(cards as f64);
    }

    /// Record a classified failure
    pub fn record_failure(&self, kind: FailureKind) {
        self.inc_outcome(kind.as_str());
    }

    /// Record provider call latency
    ///
    /// Non-finite values are dropped; they would corrupt histogram percentiles.
    pub fn record_provider_duration(&self, duration_ms: f64) {
        if !duration_ms.is_finite() {
            tracing::warn!(duration_ms = duration_ms, "Dropping non-finite provider duration");
            self.recording_failures.inc();
            return;
        }
        self.provider_duration.observe(duration_ms);
    }

    /// Count of requests recorded under `outcome`
    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.generation_requests
            .get_metric_with_label_values(&[outcome])
            .map(|c| c.get())
            .unwrap_or(0)
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    metric_family_count = metric_families.len(),
                    "Prometheus text encoder failed"
                );
                e
            })?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!(
                "Prometheus encoder produced invalid UTF-8 at byte {}: {}",
                e.utf8_error().valid_up_to(),
                e
            ))
        })
    }
}
