//! The flashcard generation pipeline
//!
//! Leaf-first: [`material`] bounds the input, [`provider`] makes the single
//! timed provider call, [`normalize`] turns raw output into a [`CardSet`], and
//! [`pipeline`] composes them into the endpoint's request cycle.

pub mod card;
pub mod material;
pub mod normalize;
pub mod pipeline;
pub mod provider;

pub use card::{CardSet, Flashcard, MAX_CARDS};
pub use material::{StudyMaterial, sanitize};
pub use normalize::normalize;
pub use pipeline::{Generator, Stage};
pub use provider::{
    CompletionProvider, CompletionRequest, GenerationClient, OpenAiProvider, ProviderFailure,
    SYSTEM_PROMPT,
};
