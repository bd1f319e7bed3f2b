//! Client orchestrator for the generation endpoint
//!
//! Mirrors the server's input bounds locally, debounces submissions, enforces
//! its own round-trip timeout, and owns the card browsing state.

pub mod api;
pub mod browse;
pub mod debounce;
pub mod orchestrator;
pub mod study;

pub use api::{ApiError, GenerateApi, HttpGenerateApi};
pub use browse::BrowsingState;
pub use debounce::Debouncer;
pub use orchestrator::{ClientError, ClientState, Orchestrator, SubmitOutcome};
