//! Shared type definitions for the Advent narrative game engine.
//!
//! Advent is a turn-based narrative game: the player has 30 in-game days
//! to prepare a village for the demon lord's arrival. Every crate in the
//! workspace speaks in terms of the types defined here -- the game state
//! and its bounded stats, the quantified effect an action has on that
//! state, and the wire-level turn result returned to the frontend.
//!
//! All map-shaped fields use `BTreeMap`/`BTreeSet` so that serialization
//! and iteration order are deterministic. Wire-facing types carry `ts-rs`
//! derives to generate TypeScript bindings for the browser client.

pub mod effect;
pub mod enums;
pub mod structs;

pub use effect::{ActionEffect, NpcReply, StatPatch};
pub use enums::{DayWarning, Ending, ItemKind, Mood, NpcId, PlayerRole, RiskTier};
pub use structs::{
    AudioClip, GameSave, GameState, InventoryItem, NpcRelationship, PlayerStats, SearchEvent,
    TurnMetrics, TurnResult,
};

/// The final day of the game: the demon lord arrives at dawn of day 30.
pub const MAX_DAYS: u32 = 30;

/// The day the game starts on.
pub const STARTING_DAY: u32 = 1;
