//! Enumeration types for the Advent game.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Player roles
// ---------------------------------------------------------------------------

/// The role the player picks at the start of a game.
///
/// The role determines starting stats and inventory, and scales the
/// stat effects of actions (a hero's good deeds move reputation further,
/// a merchant squeezes more coin out of every trade).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum PlayerRole {
    /// Strong sense of justice, determined to protect the village.
    Hero,
    /// Profit-minded, builds wealth out of the chaos.
    Merchant,
    /// Thinks only of surviving the 30 days.
    Coward,
    /// Considers siding with the demon lord.
    Traitor,
    /// Unremarkable, but adaptable.
    Villager,
    /// Values knowledge and seeks the truth behind the prophecy.
    Sage,
    /// A professional fighter who moves for pay.
    Mercenary,
}

impl PlayerRole {
    /// The role's display name in the game's original Japanese text.
    pub const fn local_name(self) -> &'static str {
        match self {
            Self::Hero => "英雄",
            Self::Merchant => "商人",
            Self::Coward => "臆病者",
            Self::Traitor => "裏切り者",
            Self::Villager => "村人",
            Self::Sage => "賢者",
            Self::Mercenary => "傭兵",
        }
    }
}

// ---------------------------------------------------------------------------
// Risk tiers
// ---------------------------------------------------------------------------

/// How likely an action is to invite an additional negative consequence
/// beyond its base effect.
///
/// The risk engine rolls one Bernoulli trial per medium/high-risk effect;
/// low-risk effects are never rolled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RiskTier {
    /// No complication roll.
    #[default]
    Low,
    /// Small chance of a minor reputation hit.
    Medium,
    /// Real chance of getting caught in the act.
    High,
}

// ---------------------------------------------------------------------------
// NPCs
// ---------------------------------------------------------------------------

/// The specialized NPC generators a turn's narrative can be delegated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NpcId {
    /// The village chief: politics, governance, and the prophecy.
    ElderMorgan,
    /// Merchant and blacksmith: trade, weapons, and equipment.
    MerchantGrom,
    /// The sage in the tower: magic, divination, and ancient lore.
    ElaraSage,
}

impl NpcId {
    /// The NPC's display name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ElderMorgan => "エルダー・モーガン",
            Self::MerchantGrom => "グロム",
            Self::ElaraSage => "エララ",
        }
    }

    /// All known NPCs, in routing priority order.
    pub const fn all() -> [Self; 3] {
        [Self::ElderMorgan, Self::MerchantGrom, Self::ElaraSage]
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Broad classification of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ItemKind {
    /// Swords, spears, bows.
    Weapon,
    /// General goods and tools.
    Item,
    /// Provisions.
    Food,
    /// Rumors, maps, and written knowledge.
    Information,
}

// ---------------------------------------------------------------------------
// Search mood
// ---------------------------------------------------------------------------

/// Emotional register attached to a contextual search event.
///
/// The mood tracks the countdown: early search days read as hopeful,
/// the last one as desperate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Mood {
    /// Days of preparation still ahead.
    Hopeful,
    /// Business as usual.
    Neutral,
    /// The halfway point has passed.
    Concerned,
    /// Time is running out.
    Urgent,
    /// The final stretch.
    Desperate,
}

// ---------------------------------------------------------------------------
// Day-threshold warnings
// ---------------------------------------------------------------------------

/// A one-time notification fired when the day counter crosses a fixed
/// milestone. Each warning is flag-gated so it is emitted exactly once
/// per game, even when a multi-day action overshoots the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DayWarning {
    /// Day 10: the villagers start debating the invasion in earnest.
    VillageDebate,
    /// Day 20: ten days left, tension rises.
    RisingTension,
    /// Day 25: the final preparation window opens.
    FinalPreparations,
    /// Day 29: the demon lord arrives tomorrow.
    EveOfInvasion,
}

impl DayWarning {
    /// The day threshold that triggers this warning.
    pub const fn threshold(self) -> u32 {
        match self {
            Self::VillageDebate => 10,
            Self::RisingTension => 20,
            Self::FinalPreparations => 25,
            Self::EveOfInvasion => 29,
        }
    }

    /// The flag key that records this warning as delivered.
    pub const fn flag_key(self) -> &'static str {
        match self {
            Self::VillageDebate => "day10_warning",
            Self::RisingTension => "day20_urgency",
            Self::FinalPreparations => "day25_final_prep",
            Self::EveOfInvasion => "day29_imminent",
        }
    }

    /// The player-facing warning text.
    pub const fn message(self) -> &'static str {
        match self {
            Self::VillageDebate => "村人たちが魔王襲来について本格的に議論し始めました…",
            Self::RisingTension => "緊張感が高まっています。残り10日です！",
            Self::FinalPreparations => "最終準備の時期です。残り5日となりました！",
            Self::EveOfInvasion => "魔王襲来が明日に迫りました…！",
        }
    }

    /// All warnings in ascending threshold order.
    pub const fn all() -> [Self; 4] {
        [
            Self::VillageDebate,
            Self::RisingTension,
            Self::FinalPreparations,
            Self::EveOfInvasion,
        ]
    }
}

// ---------------------------------------------------------------------------
// Endings
// ---------------------------------------------------------------------------

/// How the 30-day countdown resolves, judged from the flags and
/// reputation the player accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Ending {
    /// Armed and beloved: the hero drives the demon lord back.
    HeroTriumph,
    /// Knowledge and training carry the day.
    WiseVictory,
    /// A reputation in ruins ends the only way it can.
    TraitorsEnd,
    /// Never engaged with the village, never armed: flight.
    Escapist,
    /// The village stands together and endures.
    VillagerResistance,
}

impl Ending {
    /// The ending's title text.
    pub const fn title(self) -> &'static str {
        match self {
            Self::HeroTriumph => "英雄の凱旋",
            Self::WiseVictory => "賢者の勝利",
            Self::TraitorsEnd => "裏切り者の末路",
            Self::Escapist => "逃亡者",
            Self::VillagerResistance => "村人の抵抗",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&PlayerRole::Hero).unwrap_or_default();
        assert_eq!(json, "\"hero\"");
    }

    #[test]
    fn npc_id_roundtrip() {
        for npc in NpcId::all() {
            let json = serde_json::to_string(&npc).unwrap_or_default();
            let back: Result<NpcId, _> = serde_json::from_str(&json);
            assert_eq!(back.ok(), Some(npc));
        }
    }

    #[test]
    fn warnings_are_ordered_by_threshold() {
        let thresholds: Vec<u32> = DayWarning::all().iter().map(|w| w.threshold()).collect();
        assert_eq!(thresholds, vec![10, 20, 25, 29]);
    }
}
