//! Bounded mutation of the game state.
//!
//! Stat-bound policy, applied uniformly after every mutation:
//!
//! - health, strength, knowledge clamp to `[0, 100]`
//! - reputation clamps to `[-100, 100]`
//! - wealth clamps to `[0, +inf)`
//! - level is `(strength + knowledge + |reputation|) / LEVEL_BAND + 1`
//!   and never decreases, even if the stats later drop
//!
//! All arithmetic is saturating. Applying the same effect once is
//! idempotent in the sense that the exit state is fully determined by
//! the entry state and the effect; no hidden inputs are read.

use advent_types::{ActionEffect, GameState, NpcId, NpcReply, PlayerStats};
use tracing::debug;

/// Stat growth needed per level beyond the first.
const LEVEL_BAND: i64 = 60;

/// Upper bound for health, strength, and knowledge.
const STAT_MAX: i64 = 100;

/// Bounds for reputation and NPC affinity.
const REPUTATION_MIN: i64 = -100;
const REPUTATION_MAX: i64 = 100;

/// Apply one resolved action effect to the game state.
///
/// Adds every delta, re-clamps all bounded stats, merges the effect's
/// flags into the game flags (later values win on collision), and
/// recomputes the level monotonically.
pub fn apply_effect(state: &mut GameState, effect: &ActionEffect) {
    let stats = &mut state.stats;

    stats.health = clamp(stats.health.saturating_add(effect.health_delta), 0, STAT_MAX);
    stats.strength = clamp(
        stats.strength.saturating_add(effect.strength_delta),
        0,
        STAT_MAX,
    );
    stats.knowledge = clamp(
        stats.knowledge.saturating_add(effect.knowledge_delta),
        0,
        STAT_MAX,
    );
    stats.reputation = clamp(
        stats.reputation.saturating_add(effect.reputation_delta),
        REPUTATION_MIN,
        REPUTATION_MAX,
    );
    stats.wealth = stats.wealth.saturating_add(effect.wealth_delta).max(0);

    recompute_level(stats);

    for (key, value) in &effect.flags {
        state.flags.insert(key.clone(), *value);
    }

    debug!(
        health = stats.health,
        reputation = stats.reputation,
        wealth = stats.wealth,
        level = stats.level,
        "effect applied"
    );
}

/// Apply a delegated NPC's relationship outcome.
///
/// Shifts the NPC's affinity and trust (bounded like the player stats)
/// and records any information the NPC shared. Relationships are touched
/// by delegation outcomes only; nothing else in the engine writes them.
pub fn apply_npc_outcome(state: &mut GameState, npc: NpcId, reply: &NpcReply) {
    let Some(relationship) = state.npc_relationships.get_mut(&npc) else {
        return;
    };

    relationship.affinity = clamp(
        relationship.affinity.saturating_add(reply.affinity_delta),
        REPUTATION_MIN,
        REPUTATION_MAX,
    );
    relationship.trust = clamp(
        relationship.trust.saturating_add(reply.trust_delta),
        0,
        STAT_MAX,
    );
    for fact in &reply.learned {
        relationship.known_information.insert(fact.clone());
    }
}

/// Recompute the level from accumulated growth; never decreases.
fn recompute_level(stats: &mut PlayerStats) {
    let growth = stats
        .strength
        .saturating_add(stats.knowledge)
        .saturating_add(stats.reputation.saturating_abs());
    let computed = growth.div_euclid(LEVEL_BAND).saturating_add(1);
    if computed > stats.level {
        stats.level = computed;
    }
}

/// Clamp `value` into `[min, max]`.
const fn clamp(value: i64, min: i64, max: i64) -> i64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use advent_types::{PlayerRole, RiskTier, StatPatch};

    use super::*;
    use crate::roles::new_game;

    fn state() -> GameState {
        new_game("テスト", PlayerRole::Villager).unwrap()
    }

    fn effect(reputation: i64, wealth: i64, health: i64) -> ActionEffect {
        ActionEffect {
            reputation_delta: reputation,
            wealth_delta: wealth,
            health_delta: health,
            ..ActionEffect::neutral()
        }
    }

    #[test]
    fn deltas_are_added() {
        let mut s = state();
        apply_effect(&mut s, &effect(10, -30, -5));
        assert_eq!(s.stats.reputation, 10);
        assert_eq!(s.stats.wealth, 70);
        assert_eq!(s.stats.health, 95);
    }

    #[test]
    fn health_clamps_to_bounds() {
        let mut s = state();
        apply_effect(&mut s, &effect(0, 0, 50));
        assert_eq!(s.stats.health, 100);
        apply_effect(&mut s, &effect(0, 0, -500));
        assert_eq!(s.stats.health, 0);
    }

    #[test]
    fn reputation_clamps_both_ways() {
        let mut s = state();
        apply_effect(&mut s, &effect(250, 0, 0));
        assert_eq!(s.stats.reputation, 100);
        apply_effect(&mut s, &effect(-999, 0, 0));
        assert_eq!(s.stats.reputation, -100);
    }

    #[test]
    fn wealth_never_negative() {
        let mut s = state();
        apply_effect(&mut s, &effect(0, -10_000, 0));
        assert_eq!(s.stats.wealth, 0);
    }

    #[test]
    fn wealth_is_uncapped() {
        let mut s = state();
        apply_effect(&mut s, &effect(0, 5_000, 0));
        assert_eq!(s.stats.wealth, 5_100);
    }

    #[test]
    fn extreme_deltas_saturate_instead_of_overflowing() {
        let mut s = state();
        apply_effect(&mut s, &effect(i64::MAX, i64::MAX, i64::MIN));
        assert_eq!(s.stats.reputation, 100);
        assert_eq!(s.stats.health, 0);
        assert!(s.stats.wealth >= 0);
    }

    #[test]
    fn flags_merge_later_wins() {
        let mut s = state();
        s.flags.insert(String::from("trained"), false);
        let mut e = ActionEffect::neutral();
        e.flags.insert(String::from("trained"), true);
        e.flags.insert(String::from("gathered_info"), true);
        apply_effect(&mut s, &e);
        assert_eq!(s.flags.get("trained"), Some(&true));
        assert_eq!(s.flags.get("gathered_info"), Some(&true));
    }

    #[test]
    fn level_never_decreases() {
        let mut s = state();
        // Push growth over one band: 20 strength + 20 knowledge base.
        apply_effect(
            &mut s,
            &ActionEffect {
                strength_delta: 60,
                knowledge_delta: 60,
                ..ActionEffect::neutral()
            },
        );
        let grown = s.stats.level;
        assert!(grown > 1);

        // Dropping the stats back down must not lower the level.
        apply_effect(
            &mut s,
            &ActionEffect {
                strength_delta: -100,
                knowledge_delta: -100,
                ..ActionEffect::neutral()
            },
        );
        assert_eq!(s.stats.level, grown);
    }

    #[test]
    fn same_entry_state_and_effect_give_same_exit_state() {
        let e = ActionEffect {
            reputation_delta: 7,
            wealth_delta: -20,
            flags: BTreeMap::from([(String::from("trained"), true)]),
            risk: RiskTier::Low,
            ..ActionEffect::neutral()
        };
        let mut a = state();
        let mut b = state();
        apply_effect(&mut a, &e);
        apply_effect(&mut b, &e);
        assert_eq!(a, b);
    }

    #[test]
    fn npc_outcome_bounds_affinity_and_trust() {
        let mut s = state();
        let reply = NpcReply {
            narrative: String::from("…"),
            stats: StatPatch::default(),
            affinity_delta: 500,
            trust_delta: -500,
            learned: vec![String::from("魔王は50年前にも襲来した")],
        };
        apply_npc_outcome(&mut s, NpcId::ElderMorgan, &reply);
        let rel = s.npc_relationships.get(&NpcId::ElderMorgan).unwrap();
        assert_eq!(rel.affinity, 100);
        assert_eq!(rel.trust, 0);
        assert!(rel.known_information.contains("魔王は50年前にも襲来した"));
    }

    #[test]
    fn npc_outcome_for_unknown_npc_is_a_no_op() {
        let mut s = state();
        s.npc_relationships.clear();
        let before = s.clone();
        apply_npc_outcome(&mut s, NpcId::ElaraSage, &NpcReply::default());
        assert_eq!(s, before);
    }
}
