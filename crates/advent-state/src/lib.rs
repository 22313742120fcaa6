//! Canonical game state management for the Advent narrative engine.
//!
//! This crate owns every mutation of [`advent_types::GameState`]:
//!
//! - [`store`] applies an [`advent_types::ActionEffect`] under the
//!   stat-bound policy (clamp after every mutation, wealth never
//!   negative, level never decreases).
//! - [`progression`] advances the day counter, fires one-time
//!   day-threshold warnings, and applies passive daily decay.
//! - [`roles`] builds the starting state for each player role.
//!
//! All CPU-bound logic here is synchronous and runs atomically between
//! the orchestrator's suspension points, so no two turns' mutations can
//! interleave as long as turn invocations are serialized per session.

pub mod progression;
pub mod roles;
pub mod store;

pub use progression::{ProgressionOutcome, advance, time_cost};
pub use roles::{NewGameError, new_game};
pub use store::{apply_effect, apply_npc_outcome};
