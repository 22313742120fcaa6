//! Probabilistic complications for risky actions.
//!
//! One Bernoulli trial per applicable effect -- not a retry loop:
//!
//! - High risk: 30% chance of getting caught in the act, costing
//!   reputation and gold and setting the `caught_in_act` flag.
//! - Medium risk: 15% chance of a smaller reputation dent.
//! - Low risk: no roll at all.
//!
//! The random source is injected so tests can seed it and assert
//! byte-identical outcomes.

use advent_types::{ActionEffect, RiskTier};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

/// Probability that a high-risk action backfires.
const HIGH_RISK_PROBABILITY: f64 = 0.30;

/// Probability that a medium-risk action backfires.
const MEDIUM_RISK_PROBABILITY: f64 = 0.15;

/// Reputation lost when caught in the act.
const CAUGHT_REPUTATION_PENALTY: i64 = 10;

/// Gold lost when caught in the act.
const CAUGHT_WEALTH_PENALTY: i64 = 50;

/// Reputation lost on a medium-risk complication.
const MEDIUM_REPUTATION_PENALTY: i64 = 5;

/// Flag recorded when a high-risk complication lands.
const CAUGHT_FLAG: &str = "caught_in_act";

/// Rolls additional consequences for medium/high-risk effects.
pub struct RiskEngine {
    rng: Box<dyn RngCore + Send + Sync>,
}

impl RiskEngine {
    /// A risk engine backed by the OS entropy source.
    pub fn new() -> Self {
        Self::with_rng(Box::new(StdRng::from_os_rng()))
    }

    /// A risk engine with an injected random source.
    ///
    /// Tests pass a seeded [`StdRng`] here to make the whole
    /// resolve-plus-risk pipeline deterministic.
    pub fn with_rng(rng: Box<dyn RngCore + Send + Sync>) -> Self {
        Self { rng }
    }

    /// A risk engine seeded from a fixed value (deterministic).
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Box::new(StdRng::seed_from_u64(seed)))
    }

    /// Roll the complication trial for this effect, annotating it in
    /// place. Returns true when a complication landed.
    pub fn apply(&mut self, effect: &mut ActionEffect) -> bool {
        let hit = match effect.risk {
            RiskTier::Low => false,
            RiskTier::Medium => {
                if self.rng.random_bool(MEDIUM_RISK_PROBABILITY) {
                    effect.reputation_delta = effect
                        .reputation_delta
                        .saturating_sub(MEDIUM_REPUTATION_PENALTY);
                    true
                } else {
                    false
                }
            }
            RiskTier::High => {
                if self.rng.random_bool(HIGH_RISK_PROBABILITY) {
                    effect.reputation_delta = effect
                        .reputation_delta
                        .saturating_sub(CAUGHT_REPUTATION_PENALTY);
                    effect.wealth_delta = effect.wealth_delta.saturating_sub(CAUGHT_WEALTH_PENALTY);
                    effect.flags.insert(String::from(CAUGHT_FLAG), true);
                    true
                } else {
                    false
                }
            }
        };

        if hit {
            debug!(risk = ?effect.risk, "risk complication landed");
        }
        hit
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use advent_types::RiskTier;

    use super::*;

    fn effect(risk: RiskTier) -> ActionEffect {
        ActionEffect {
            risk,
            ..ActionEffect::neutral()
        }
    }

    #[test]
    fn low_risk_never_rolls() {
        let mut engine = RiskEngine::seeded(0);
        for _ in 0..100 {
            let mut e = effect(RiskTier::Low);
            assert!(!engine.apply(&mut e));
            assert!(e.is_neutral());
        }
    }

    #[test]
    fn same_seed_gives_identical_outcomes() {
        let run = |seed: u64| -> Vec<(bool, i64, i64)> {
            let mut engine = RiskEngine::seeded(seed);
            (0..50)
                .map(|_| {
                    let mut e = effect(RiskTier::High);
                    let hit = engine.apply(&mut e);
                    (hit, e.reputation_delta, e.wealth_delta)
                })
                .collect()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn high_risk_complication_sets_caught_flag_and_penalties() {
        // Scan seeds until the trial lands; the outcome shape is what
        // is under test, not the seed.
        for seed in 0..64 {
            let mut engine = RiskEngine::seeded(seed);
            let mut e = effect(RiskTier::High);
            if engine.apply(&mut e) {
                assert_eq!(e.reputation_delta, -10);
                assert_eq!(e.wealth_delta, -50);
                assert_eq!(e.flags.get("caught_in_act"), Some(&true));
                return;
            }
        }
        // 64 consecutive misses at p=0.30 is (0.7)^64 -- effectively
        // impossible with a correct trial.
        unreachable_for_test();
    }

    #[test]
    fn medium_risk_complication_is_reputation_only() {
        for seed in 0..64 {
            let mut engine = RiskEngine::seeded(seed);
            let mut e = effect(RiskTier::Medium);
            if engine.apply(&mut e) {
                assert_eq!(e.reputation_delta, -5);
                assert_eq!(e.wealth_delta, 0);
                assert!(e.flags.is_empty());
                return;
            }
        }
        unreachable_for_test();
    }

    #[test]
    fn high_risk_rate_is_roughly_thirty_percent() {
        let mut engine = RiskEngine::seeded(7);
        let hits = (0..2_000)
            .filter(|_| {
                let mut e = effect(RiskTier::High);
                engine.apply(&mut e)
            })
            .count();
        // Loose envelope around 600/2000.
        assert!((450..=750).contains(&hits), "hits = {hits}");
    }

    fn unreachable_for_test() {
        assert!(false, "no complication landed across 64 seeds");
    }
}
