//! Turn orchestration and effect resolution for the Advent game.
//!
//! This crate is the engine proper. One player turn flows through it
//! as a fixed pipeline:
//!
//! 1. **Resolve** -- [`resolver`] classifies the free-text action into a
//!    quantified [`advent_types::ActionEffect`] (exact table, amount
//!    extraction, keyword categories, role multipliers).
//! 2. **Phase 1** -- [`orchestrator`] fans out the narrative-independent
//!    generation tasks concurrently (special event, delegated or plain
//!    narrative, contextual search, gated scene image), each wrapped in
//!    its own timeout + fallback guard.
//! 3. **Integrate** -- the phase-1 results are composed into a single
//!    narrative in a fixed, reproducible order.
//! 4. **Phase 2** -- the narrative-dependent tasks run concurrently
//!    (choice generation, gated audio narration), same guard contract.
//! 5. **Commit** -- [`risk`] rolls complications, the delegated effect
//!    merges after the base effect, `advent-state` mutates the bounded
//!    state, and the day advances.
//!
//! A slow or failing collaborator degrades only its own slot; the
//! player always receives a complete turn result. The only random
//! source in the engine is the risk engine's injectable RNG.

pub mod backend;
pub mod config;
pub mod delegation;
pub mod ending;
pub mod gates;
pub mod orchestrator;
pub mod resolver;
pub mod risk;

pub use backend::{AudioBackend, BackendError, Backends, ImageBackend, SearchBackend, StoryBackend};
pub use config::GameConfig;
pub use delegation::DelegationRouter;
pub use orchestrator::{GameSession, TurnError};
pub use resolver::EffectResolver;
pub use risk::RiskEngine;
