//! The quantified effect of a player action, and the typed NPC reply.
//!
//! An [`ActionEffect`] is transient: the resolver produces one per
//! action, the risk engine may annotate it, and the state store consumes
//! it immediately. An [`NpcReply`] is the typed form of a delegated
//! NPC generator's structured response -- nothing duck-typed ever
//! reaches the state store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::RiskTier;

/// Stat deltas, flag writes, and the risk classification for one action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionEffect {
    /// Change to reputation.
    pub reputation_delta: i64,
    /// Change to wealth (gold).
    pub wealth_delta: i64,
    /// Change to strength.
    pub strength_delta: i64,
    /// Change to knowledge.
    pub knowledge_delta: i64,
    /// Change to health.
    pub health_delta: i64,
    /// Story flags to merge into the game flags (later values win).
    pub flags: BTreeMap<String, bool>,
    /// Risk classification driving the complication roll.
    pub risk: RiskTier,
}

impl ActionEffect {
    /// The neutral effect: no deltas, no flags, low risk.
    ///
    /// Unrecognized actions always resolve to this rather than failing
    /// the turn.
    pub const fn neutral() -> Self {
        Self {
            reputation_delta: 0,
            wealth_delta: 0,
            strength_delta: 0,
            knowledge_delta: 0,
            health_delta: 0,
            flags: BTreeMap::new(),
            risk: RiskTier::Low,
        }
    }

    /// True when every delta is zero and no flags are set.
    pub fn is_neutral(&self) -> bool {
        self.reputation_delta == 0
            && self.wealth_delta == 0
            && self.strength_delta == 0
            && self.knowledge_delta == 0
            && self.health_delta == 0
            && self.flags.is_empty()
    }

    /// Overlay a delegated NPC's stat patch on top of this effect.
    ///
    /// Merge order is fixed: the base effect first, then the delegated
    /// patch with shallow per-key overwrite. A key the patch does not
    /// mention keeps the base value, so delegated outcomes can override
    /// but never silently drop base effects.
    pub fn merge_patch(&mut self, patch: &StatPatch) {
        if let Some(v) = patch.reputation {
            self.reputation_delta = v;
        }
        if let Some(v) = patch.wealth {
            self.wealth_delta = v;
        }
        if let Some(v) = patch.strength {
            self.strength_delta = v;
        }
        if let Some(v) = patch.knowledge {
            self.knowledge_delta = v;
        }
        if let Some(v) = patch.health {
            self.health_delta = v;
        }
        for (key, value) in &patch.flags {
            self.flags.insert(key.clone(), *value);
        }
    }
}

/// Partial stat overrides carried by a delegated NPC reply.
///
/// `None` means "leave the base effect's value alone".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StatPatch {
    /// Override for the reputation delta.
    pub reputation: Option<i64>,
    /// Override for the wealth delta.
    pub wealth: Option<i64>,
    /// Override for the strength delta.
    pub strength: Option<i64>,
    /// Override for the knowledge delta.
    pub knowledge: Option<i64>,
    /// Override for the health delta.
    pub health: Option<i64>,
    /// Additional story flags.
    pub flags: BTreeMap<String, bool>,
}

impl StatPatch {
    /// True when the patch overrides nothing.
    pub fn is_empty(&self) -> bool {
        self.reputation.is_none()
            && self.wealth.is_none()
            && self.strength.is_none()
            && self.knowledge.is_none()
            && self.health.is_none()
            && self.flags.is_empty()
    }
}

/// The typed outcome of delegating a turn's narrative to an NPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NpcReply {
    /// The NPC's in-character narration for this turn.
    pub narrative: String,
    /// Stat overrides to merge after the base effect.
    pub stats: StatPatch,
    /// Shift in the NPC's affinity toward the player.
    pub affinity_delta: i64,
    /// Shift in the NPC's trust in the player.
    pub trust_delta: i64,
    /// Facts the NPC shared this turn.
    pub learned: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn neutral_is_neutral() {
        assert!(ActionEffect::neutral().is_neutral());
    }

    #[test]
    fn merge_overrides_only_patched_keys() {
        let mut effect = ActionEffect {
            reputation_delta: 10,
            wealth_delta: -30,
            ..ActionEffect::neutral()
        };
        let patch = StatPatch {
            wealth: Some(5),
            flags: BTreeMap::from([(String::from("bargain_struck"), true)]),
            ..StatPatch::default()
        };
        effect.merge_patch(&patch);

        assert_eq!(effect.reputation_delta, 10);
        assert_eq!(effect.wealth_delta, 5);
        assert_eq!(effect.flags.get("bargain_struck"), Some(&true));
    }

    #[test]
    fn merge_flag_collision_later_wins() {
        let mut effect = ActionEffect::neutral();
        effect.flags.insert(String::from("talked_to_elder"), false);
        let patch = StatPatch {
            flags: BTreeMap::from([(String::from("talked_to_elder"), true)]),
            ..StatPatch::default()
        };
        effect.merge_patch(&patch);
        assert_eq!(effect.flags.get("talked_to_elder"), Some(&true));
    }
}
