//! FlashAI - flashcard generation from study text
//!
//! This library provides a bounded-latency pipeline that validates study text,
//! asks a language-model provider for question/answer pairs under a hard
//! timeout, and normalizes the free-form output into a small card set. The
//! [`client`] module is the caller-side counterpart with debounce, its own
//! timeout, and card browsing.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod telemetry;
