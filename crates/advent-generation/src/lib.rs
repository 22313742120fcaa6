//! Live content-generation clients for the Advent game.
//!
//! This crate implements the engine's collaborator contracts against
//! real vendor APIs:
//!
//! - [`llm`] -- chat-completion access via enum dispatch over an
//!   OpenAI-compatible endpoint (xAI Grok, Ollama, ...) or the
//!   Anthropic Messages API.
//! - [`prompt`] -- `minijinja` templates for the narrator, the choice
//!   generator, special events, and the three NPC personas.
//! - [`parse`] -- strict parsing of structured model responses with
//!   recovery strategies; failures come back as tagged parse errors,
//!   never as untyped data.
//! - [`story`], [`image`], [`audio`], [`search`] -- the concrete
//!   backends the server wires into a session.
//!
//! Everything here is a thin external collaborator: the turn pipeline
//! treats each call as fallible and substitutes documented fallbacks.

pub mod audio;
pub mod config;
pub mod image;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod search;
pub mod story;

pub use audio::TtsClient;
pub use config::{BackendKind, GenerationConfig, LlmEndpoint};
pub use image::ImageClient;
pub use llm::LlmBackend;
pub use search::SearchClient;
pub use story::LlmStory;
