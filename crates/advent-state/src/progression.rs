//! Day progression: counter advance, threshold warnings, passive decay.
//!
//! Each committed turn advances the day counter by a deterministic
//! amount (see [`time_cost`]). Crossing a milestone day emits a
//! one-time warning, gated by a flag so repeated or overshooting
//! advances never re-emit it. Each elapsed day also applies a small
//! passive decay: a positive reputation drifts back toward zero, and
//! health wears down while the player is running on full batteries.

use advent_types::{DayWarning, GameState, MAX_DAYS};
use tracing::info;

/// Reputation lost per elapsed day while reputation is positive.
const REPUTATION_DECAY_PER_DAY: i64 = 1;

/// Health lost per elapsed day while health is above the fatigue
/// threshold.
const FATIGUE_DECAY_PER_DAY: i64 = 1;

/// Health level above which daily fatigue applies.
const FATIGUE_THRESHOLD: i64 = 90;

/// What a day advance did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionOutcome {
    /// The day before the advance.
    pub previous_day: u32,
    /// The day after the advance (clamped to [`MAX_DAYS`]).
    pub new_day: u32,
    /// Threshold warnings that fired during this advance, in order.
    pub warnings: Vec<DayWarning>,
    /// True once the final day has been reached; terminal.
    pub game_over: bool,
}

/// Advance the day counter by `days` (at least 1), applying decay and
/// firing any newly crossed threshold warnings.
///
/// The counter clamps to [`MAX_DAYS`]; reaching it sets `game_over`,
/// after which the orchestrator processes no further turns. Warnings
/// are detected with a `>=` comparison against each threshold, so a
/// multi-day advance that skips the exact threshold value still fires
/// the warning once.
pub fn advance(state: &mut GameState, days: u32) -> ProgressionOutcome {
    let previous_day = state.current_day;
    let days = days.max(1);
    let new_day = previous_day.saturating_add(days).min(MAX_DAYS);
    state.current_day = new_day;

    apply_daily_decay(state, u64::from(new_day.saturating_sub(previous_day)));

    let mut warnings = Vec::new();
    for warning in DayWarning::all() {
        if new_day >= warning.threshold() && !flag_set(state, warning.flag_key()) {
            state.flags.insert(String::from(warning.flag_key()), true);
            warnings.push(warning);
        }
    }

    let game_over = new_day >= MAX_DAYS;
    info!(
        previous_day,
        new_day,
        game_over,
        warnings = warnings.len(),
        "day advanced"
    );

    ProgressionOutcome {
        previous_day,
        new_day,
        warnings,
        game_over,
    }
}

/// Classify how many in-game days an action consumes.
///
/// Expedition-scale undertakings cost two days; everything else costs
/// one. The classification is deterministic -- the engine's only random
/// source is the risk engine.
pub fn time_cost(action: &str) -> u32 {
    const HEAVY_KEYWORDS: [&str; 6] = [
        "遠征",
        "長旅",
        "大工事",
        "expedition",
        "long journey",
        "major construction",
    ];

    let lower = action.to_lowercase();
    if HEAVY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        2
    } else {
        1
    }
}

/// Apply per-day passive decay, re-using the stat-bound policy.
fn apply_daily_decay(state: &mut GameState, elapsed_days: u64) {
    for _ in 0..elapsed_days {
        if state.stats.reputation > 0 {
            state.stats.reputation = state
                .stats
                .reputation
                .saturating_sub(REPUTATION_DECAY_PER_DAY)
                .max(0);
        }
        if state.stats.health > FATIGUE_THRESHOLD {
            state.stats.health = state.stats.health.saturating_sub(FATIGUE_DECAY_PER_DAY);
        }
    }
}

/// True when the named flag is present and set.
fn flag_set(state: &GameState, key: &str) -> bool {
    state.flags.get(key).copied().unwrap_or(false)
}
