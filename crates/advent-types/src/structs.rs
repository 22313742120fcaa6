//! Core state and wire structures for the Advent game.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DayWarning, Ending, ItemKind, Mood, NpcId, PlayerRole};

// ---------------------------------------------------------------------------
// Player stats
// ---------------------------------------------------------------------------

/// The player's bounded ability scores.
///
/// Invariants (enforced by `advent-state` after every mutation):
/// health, strength and knowledge stay in `[0, 100]`; reputation stays
/// in `[-100, 100]`; wealth never drops below 0; level starts at 1 and
/// never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerStats {
    /// Overall growth band, recomputed from the other stats.
    pub level: i64,
    /// Physical condition, 0 means collapse.
    pub health: i64,
    /// Raw fighting power.
    pub strength: i64,
    /// Learning, lore, and tactics.
    pub knowledge: i64,
    /// Village standing; negative means distrust.
    pub reputation: i64,
    /// Gold on hand.
    pub wealth: i64,
    /// Names of companions won over during the countdown.
    pub allies: BTreeSet<String>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            level: 1,
            health: 100,
            strength: 20,
            knowledge: 20,
            reputation: 0,
            wealth: 100,
            allies: BTreeSet::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// A single item the player carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryItem {
    /// Stable identifier (e.g. `sword`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Broad item classification.
    pub kind: ItemKind,
    /// Worth in gold.
    pub value: i64,
}

// ---------------------------------------------------------------------------
// NPC relationships
// ---------------------------------------------------------------------------

/// The player's standing with one NPC.
///
/// Created once at game start and mutated only by delegation outcomes:
/// a turn whose narrative was owned by an NPC may shift that NPC's
/// affinity and trust, and record what the player learned from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NpcRelationship {
    /// How much the NPC likes the player, `[-100, 100]`.
    pub affinity: i64,
    /// How far the NPC trusts the player, `[0, 100]`.
    pub trust: i64,
    /// Facts the NPC has shared with the player.
    pub known_information: BTreeSet<String>,
}

impl NpcRelationship {
    /// A fresh relationship with the given starting trust.
    pub const fn with_trust(trust: i64) -> Self {
        Self {
            affinity: 0,
            trust,
            known_information: BTreeSet::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// The canonical game state for one session.
///
/// Owned by the `GameSession`; every mutation goes through the bounded
/// operations in `advent-state`. There is no global instance -- the
/// caller holds the session and passes it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Current in-game day, `1..=MAX_DAYS`.
    pub current_day: u32,
    /// The role chosen at game start.
    pub player_role: PlayerRole,
    /// The player's name.
    pub player_name: String,
    /// Current location key (e.g. `village_center`).
    pub location: String,
    /// Bounded ability scores.
    pub stats: PlayerStats,
    /// Carried items, in acquisition order.
    pub inventory: Vec<InventoryItem>,
    /// Story flags; later writes win on key collision.
    pub flags: BTreeMap<String, bool>,
    /// Standing with each known NPC.
    pub npc_relationships: BTreeMap<NpcId, NpcRelationship>,
}

// ---------------------------------------------------------------------------
// Turn output
// ---------------------------------------------------------------------------

/// A synthesized narration clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AudioClip {
    /// Base64-encoded audio payload (opaque to the engine).
    pub data: String,
    /// Why this narration cleared the importance gate.
    pub reason: String,
}

/// A contextual lookup woven into the turn's narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SearchEvent {
    /// The query that was looked up.
    pub query: String,
    /// The lookup result rewritten as in-world lore.
    pub integration: String,
    /// Emotional register for the presentation layer.
    pub mood: Mood,
}

/// Wall-clock measurements for one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TurnMetrics {
    /// Total turn duration in milliseconds.
    pub total_ms: u64,
    /// Duration of the first (narrative-independent) parallel phase.
    pub phase1_ms: u64,
    /// Duration of the second (narrative-dependent) parallel phase.
    pub phase2_ms: u64,
    /// Generation tasks that resolved without falling back.
    pub tasks_completed: u32,
    /// Generation tasks that fell back after an error or timeout.
    pub tasks_degraded: u32,
}

/// Everything one processed turn returns to the caller.
///
/// Transient: assembled per turn, returned over the wire, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TurnResult {
    /// The day the action took place (before the day advance).
    pub day: u32,
    /// The fully integrated narrative for this turn.
    pub narrative: String,
    /// Suggested next actions.
    pub choices: Vec<String>,
    /// Scene illustration URL, when the image gate was open.
    pub image_url: Option<String>,
    /// Synthesized narration, when the importance gate was cleared.
    pub audio: Option<AudioClip>,
    /// Special event text, on event days.
    pub special_event: Option<String>,
    /// Contextual lookup result, on search trigger days.
    pub search_event: Option<SearchEvent>,
    /// Day-threshold warnings crossed by this turn's day advance.
    pub warnings: Vec<DayWarning>,
    /// True once the final day has been reached; no further turns run.
    pub game_over: bool,
    /// The judged ending, present only on the final turn.
    pub ending: Option<Ending>,
    /// Wall-clock measurements for this turn.
    pub metrics: TurnMetrics,
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// The JSON save-file wrapper: `{day, state}` plus a timestamp.
///
/// `day` mirrors `state.current_day`; on load the wrapper value wins,
/// which also tolerates save files produced by older revisions that
/// kept the day outside the state object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameSave {
    /// The day the game was saved on.
    pub day: u32,
    /// The full game state.
    pub state: GameState,
    /// When the save was written.
    pub saved_at: DateTime<Utc>,
}
