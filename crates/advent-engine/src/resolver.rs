//! Action-to-effect resolution.
//!
//! `resolve` maps a free-text player action to an [`ActionEffect`]
//! through four ordered strategies, first hit wins:
//!
//! 1. Exact match against the curated table of canonical phrases --
//!    deterministic, author-tunable effects for the stock choices.
//! 2. Explicit amount extraction: a `<n>G` gold amount plus a
//!    direction keyword becomes a wealth delta.
//! 3. Ordered keyword categories, positive before negative. Ties are
//!    resolved by category priority, not by matched-keyword count.
//! 4. The neutral effect.
//!
//! The matched effect is then scaled by the player role's fixed
//! multipliers. Resolution never fails: an unrecognized action yields
//! the neutral effect rather than failing the turn.

use std::collections::BTreeMap;

use advent_types::{ActionEffect, PlayerRole, RiskTier};

/// Cap for extracted gold amounts, to keep wild inputs bounded.
const MAX_EXTRACTED_AMOUNT: i64 = 1_000_000;

/// Reputation lost when robbed (carelessness has a social cost).
const ROBBED_REPUTATION_PENALTY: i64 = 5;

/// Resolves free-text actions into quantified effects.
///
/// Stateless apart from its lookup tables; build once per session.
#[derive(Debug, Clone, Default)]
pub struct EffectResolver;

impl EffectResolver {
    /// Create a resolver with the stock tables.
    pub const fn new() -> Self {
        Self
    }

    /// Resolve an action for the given role. Never fails.
    pub fn resolve(&self, action: &str, role: PlayerRole) -> ActionEffect {
        let action = action.trim();
        let base = exact_match(action)
            .or_else(|| amount_effect(action))
            .or_else(|| keyword_effect(action))
            .unwrap_or_else(ActionEffect::neutral);
        scale_for_role(base, role)
    }
}

// ---------------------------------------------------------------------------
// Strategy 1: exact table
// ---------------------------------------------------------------------------

/// The curated table of canonical action phrases.
///
/// These are the phrases the choice generator offers as fallbacks, so
/// they must always resolve to stable, tuned effects.
fn exact_match(action: &str) -> Option<ActionEffect> {
    let spec: EffectSpec = match action {
        "村長と相談" | "村長と相談する" => EffectSpec {
            reputation: 10,
            flags: &["talked_to_elder"],
            ..EffectSpec::EMPTY
        },
        "武器を探しに行く" => EffectSpec {
            strength: 5,
            flags: &["searched_weapons"],
            risk: RiskTier::Medium,
            ..EffectSpec::EMPTY
        },
        "情報を集める" => EffectSpec {
            knowledge: 5,
            flags: &["gathered_info"],
            ..EffectSpec::EMPTY
        },
        "訓練を積む" => EffectSpec {
            strength: 8,
            health: -5,
            flags: &["trained"],
            ..EffectSpec::EMPTY
        },
        "休息を取る" => EffectSpec {
            health: 10,
            ..EffectSpec::EMPTY
        },
        "村の防衛準備を手伝う" => EffectSpec {
            reputation: 8,
            strength: 3,
            flags: &["defenses_prepared"],
            ..EffectSpec::EMPTY
        },
        "魔王軍の偵察" => EffectSpec {
            knowledge: 8,
            flags: &["scouted_enemy"],
            risk: RiskTier::High,
            ..EffectSpec::EMPTY
        },
        "避難準備を始める" => EffectSpec {
            flags: &["evacuation_started"],
            ..EffectSpec::EMPTY
        },
        _ => return None,
    };
    Some(spec.build())
}

// ---------------------------------------------------------------------------
// Strategy 2: explicit amount extraction
// ---------------------------------------------------------------------------

/// Extract an explicit `<n>G` amount and turn it into a wealth delta.
///
/// The direction comes from a keyword: being robbed also dents
/// reputation; spending and earning move wealth alone. An amount with
/// no direction keyword is ambiguous and falls through to the keyword
/// categories.
fn amount_effect(action: &str) -> Option<ActionEffect> {
    let amount = extract_gold_amount(action)?;

    let robbed = ["盗まれ", "奪われ"].iter().any(|kw| action.contains(kw));
    let spent = ["払", "購入", "買"].iter().any(|kw| action.contains(kw));
    let earned = ["稼", "報酬", "売"].iter().any(|kw| action.contains(kw));

    if robbed {
        Some(ActionEffect {
            wealth_delta: amount.saturating_neg(),
            reputation_delta: ROBBED_REPUTATION_PENALTY.saturating_neg(),
            ..ActionEffect::neutral()
        })
    } else if spent {
        Some(ActionEffect {
            wealth_delta: amount.saturating_neg(),
            ..ActionEffect::neutral()
        })
    } else if earned {
        Some(ActionEffect {
            wealth_delta: amount,
            ..ActionEffect::neutral()
        })
    } else {
        None
    }
}

/// Find the first digit run immediately followed by `G` (e.g. `100G`).
fn extract_gold_amount(action: &str) -> Option<i64> {
    let mut digits = String::new();
    let mut chars = action.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            digits.push(c);
            if chars.peek() == Some(&'G') {
                let amount: i64 = digits.parse().unwrap_or(MAX_EXTRACTED_AMOUNT);
                return Some(amount.min(MAX_EXTRACTED_AMOUNT));
            }
        } else {
            digits.clear();
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Strategy 3: ordered keyword categories
// ---------------------------------------------------------------------------

/// Ordered keyword categories: positive first, then negative.
///
/// The first category with any matching keyword wins and no further
/// categories are evaluated.
fn keyword_effect(action: &str) -> Option<ActionEffect> {
    struct Category {
        keywords: &'static [&'static str],
        spec: EffectSpec,
    }

    let categories: [Category; 6] = [
        // --- Positive ---
        Category {
            keywords: &["手伝", "助け", "協力", "help"],
            spec: EffectSpec {
                reputation: 5,
                ..EffectSpec::EMPTY
            },
        },
        Category {
            keywords: &["学", "研究", "調べ", "study", "research"],
            spec: EffectSpec {
                knowledge: 5,
                ..EffectSpec::EMPTY
            },
        },
        Category {
            keywords: &["訓練", "鍛", "特訓", "train"],
            spec: EffectSpec {
                strength: 5,
                ..EffectSpec::EMPTY
            },
        },
        // --- Negative ---
        Category {
            keywords: &["詐欺", "騙", "fraud"],
            spec: EffectSpec {
                wealth: 30,
                reputation: -10,
                risk: RiskTier::High,
                ..EffectSpec::EMPTY
            },
        },
        Category {
            keywords: &["盗", "steal", "theft"],
            spec: EffectSpec {
                wealth: 20,
                reputation: -8,
                risk: RiskTier::High,
                ..EffectSpec::EMPTY
            },
        },
        Category {
            keywords: &["脅", "強請", "extort"],
            spec: EffectSpec {
                wealth: 40,
                reputation: -15,
                risk: RiskTier::High,
                ..EffectSpec::EMPTY
            },
        },
    ];

    let lower = action.to_lowercase();
    categories
        .iter()
        .find(|category| category.keywords.iter().any(|kw| lower.contains(kw)))
        .map(|category| category.spec.build())
}

// ---------------------------------------------------------------------------
// Role multipliers
// ---------------------------------------------------------------------------

/// Per-role effect multipliers, in tenths (15 = x1.5).
///
/// Fixed, read-only lookup data. The villager carries the neutral set,
/// which is also the fallback for any role without a tuned entry.
struct RoleMultipliers {
    reputation: i64,
    wealth: i64,
    strength: i64,
    knowledge: i64,
}

impl RoleMultipliers {
    const NEUTRAL: Self = Self {
        reputation: 10,
        wealth: 10,
        strength: 10,
        knowledge: 10,
    };

    const fn for_role(role: PlayerRole) -> Self {
        match role {
            PlayerRole::Hero => Self {
                reputation: 15,
                wealth: 10,
                strength: 12,
                knowledge: 10,
            },
            PlayerRole::Merchant => Self {
                reputation: 8,
                wealth: 15,
                strength: 10,
                knowledge: 12,
            },
            PlayerRole::Coward => Self {
                reputation: 8,
                wealth: 10,
                strength: 8,
                knowledge: 10,
            },
            PlayerRole::Traitor => Self {
                reputation: 8,
                wealth: 12,
                strength: 10,
                knowledge: 12,
            },
            PlayerRole::Sage => Self {
                reputation: 10,
                wealth: 8,
                strength: 8,
                knowledge: 15,
            },
            PlayerRole::Mercenary => Self {
                reputation: 8,
                wealth: 12,
                strength: 15,
                knowledge: 8,
            },
            PlayerRole::Villager => Self::NEUTRAL,
        }
    }
}

/// Scale a base effect by the role multipliers (tenths, truncating).
fn scale_for_role(mut effect: ActionEffect, role: PlayerRole) -> ActionEffect {
    let m = RoleMultipliers::for_role(role);
    effect.reputation_delta = scale(effect.reputation_delta, m.reputation);
    effect.wealth_delta = scale(effect.wealth_delta, m.wealth);
    effect.strength_delta = scale(effect.strength_delta, m.strength);
    effect.knowledge_delta = scale(effect.knowledge_delta, m.knowledge);
    effect
}

/// `delta * tenths / 10`, saturating.
const fn scale(delta: i64, tenths: i64) -> i64 {
    delta.saturating_mul(tenths) / 10
}

// ---------------------------------------------------------------------------
// Effect construction helper
// ---------------------------------------------------------------------------

/// Compact literal form for table entries.
struct EffectSpec {
    reputation: i64,
    wealth: i64,
    strength: i64,
    knowledge: i64,
    health: i64,
    flags: &'static [&'static str],
    risk: RiskTier,
}

impl EffectSpec {
    const EMPTY: Self = Self {
        reputation: 0,
        wealth: 0,
        strength: 0,
        knowledge: 0,
        health: 0,
        flags: &[],
        risk: RiskTier::Low,
    };

    fn build(&self) -> ActionEffect {
        let mut flags = BTreeMap::new();
        for flag in self.flags {
            flags.insert(String::from(*flag), true);
        }
        ActionEffect {
            reputation_delta: self.reputation,
            wealth_delta: self.wealth,
            strength_delta: self.strength,
            knowledge_delta: self.knowledge,
            health_delta: self.health,
            flags,
            risk: self.risk,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn resolver() -> EffectResolver {
        EffectResolver::new()
    }

    #[test]
    fn elder_consultation_for_hero_gets_role_multiplier() {
        let effect = resolver().resolve("村長と相談", PlayerRole::Hero);
        // Base +10 reputation, hero multiplier x1.5.
        assert_eq!(effect.reputation_delta, 15);
        assert_eq!(effect.wealth_delta, 0);
        assert_eq!(effect.flags.get("talked_to_elder"), Some(&true));
        assert_eq!(effect.risk, RiskTier::Low);
    }

    #[test]
    fn elder_consultation_for_villager_is_unscaled() {
        let effect = resolver().resolve("村長と相談", PlayerRole::Villager);
        assert_eq!(effect.reputation_delta, 10);
    }

    #[test]
    fn robbed_amount_is_extracted() {
        let effect = resolver().resolve("盗まれる 100G", PlayerRole::Villager);
        assert_eq!(effect.wealth_delta, -100);
        assert_eq!(effect.reputation_delta, -5);
    }

    #[test]
    fn spending_moves_wealth_only() {
        let effect = resolver().resolve("剣を購入する 120G", PlayerRole::Villager);
        assert_eq!(effect.wealth_delta, -120);
        assert_eq!(effect.reputation_delta, 0);
    }

    #[test]
    fn earning_is_positive() {
        let effect = resolver().resolve("護衛の報酬 50G", PlayerRole::Villager);
        assert_eq!(effect.wealth_delta, 50);
    }

    #[test]
    fn amount_without_direction_falls_through() {
        // "盗" is absent; no spend/earn keyword either, so the amount is
        // ignored and the neutral default applies.
        let effect = resolver().resolve("100Gを眺める", PlayerRole::Villager);
        assert!(effect.is_neutral());
    }

    #[test]
    fn unknown_action_is_neutral() {
        let effect = resolver().resolve("空を見上げる", PlayerRole::Hero);
        assert!(effect.is_neutral());
        assert_eq!(effect.risk, RiskTier::Low);
    }

    #[test]
    fn positive_category_wins_over_negative() {
        // Contains both a help keyword and a theft keyword; category
        // order short-circuits at the positive one.
        let effect = resolver().resolve("盗賊退治を手伝う", PlayerRole::Villager);
        assert_eq!(effect.reputation_delta, 5);
        assert_eq!(effect.wealth_delta, 0);
        assert_eq!(effect.risk, RiskTier::Low);
    }

    #[test]
    fn theft_keyword_is_high_risk() {
        let effect = resolver().resolve("倉庫から盗む", PlayerRole::Villager);
        assert_eq!(effect.wealth_delta, 20);
        assert_eq!(effect.reputation_delta, -8);
        assert_eq!(effect.risk, RiskTier::High);
    }

    #[test]
    fn merchant_scales_wealth() {
        let effect = resolver().resolve("商品を売る 100G", PlayerRole::Merchant);
        assert_eq!(effect.wealth_delta, 150);
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolver().resolve("訓練を積む", PlayerRole::Mercenary);
        let b = resolver().resolve("訓練を積む", PlayerRole::Mercenary);
        assert_eq!(a, b);
        // Base +8 strength, mercenary x1.5 = 12.
        assert_eq!(a.strength_delta, 12);
    }

    #[test]
    fn extracts_first_amount_token() {
        assert_eq!(extract_gold_amount("30Gと50Gを失った"), Some(30));
        assert_eq!(extract_gold_amount("金貨はない"), None);
        assert_eq!(extract_gold_amount("999999999999999999999G"), Some(1_000_000));
    }
}
