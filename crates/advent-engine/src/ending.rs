//! Judging the outcome of the 30-day countdown.

use advent_types::{Ending, GameState};

/// Reputation above which an armed player earns the heroic ending.
const TRIUMPH_REPUTATION: i64 = 50;

/// Reputation below which the countdown ends in betrayal.
const DISGRACE_REPUTATION: i64 = -20;

/// Judge the ending from the final state's flags and reputation.
///
/// Checked in priority order; the first matching branch wins.
pub fn determine(state: &GameState) -> Ending {
    let reputation = state.stats.reputation;

    if flag(state, "found_weapon") && reputation > TRIUMPH_REPUTATION {
        Ending::HeroTriumph
    } else if flag(state, "trained") && flag(state, "gathered_info") {
        Ending::WiseVictory
    } else if reputation < DISGRACE_REPUTATION {
        Ending::TraitorsEnd
    } else if !flag(state, "talked_to_elder") && !flag(state, "searched_weapons") {
        Ending::Escapist
    } else {
        Ending::VillagerResistance
    }
}

fn flag(state: &GameState, key: &str) -> bool {
    state.flags.get(key).copied().unwrap_or(false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use advent_types::PlayerRole;

    use super::*;

    fn state() -> GameState {
        advent_state::new_game("テスト", PlayerRole::Villager).unwrap()
    }

    fn set(state: &mut GameState, key: &str) {
        state.flags.insert(String::from(key), true);
    }

    #[test]
    fn armed_and_famous_is_a_triumph() {
        let mut s = state();
        set(&mut s, "found_weapon");
        s.stats.reputation = 60;
        assert_eq!(determine(&s), Ending::HeroTriumph);
    }

    #[test]
    fn armed_but_unknown_is_not() {
        let mut s = state();
        set(&mut s, "found_weapon");
        set(&mut s, "talked_to_elder");
        s.stats.reputation = 30;
        assert_eq!(determine(&s), Ending::VillagerResistance);
    }

    #[test]
    fn training_and_information_win_wisely() {
        let mut s = state();
        set(&mut s, "trained");
        set(&mut s, "gathered_info");
        assert_eq!(determine(&s), Ending::WiseVictory);
    }

    #[test]
    fn disgrace_ends_in_betrayal() {
        let mut s = state();
        set(&mut s, "talked_to_elder");
        s.stats.reputation = -40;
        assert_eq!(determine(&s), Ending::TraitorsEnd);
    }

    #[test]
    fn total_disengagement_is_flight() {
        let s = state();
        assert_eq!(determine(&s), Ending::Escapist);
    }

    #[test]
    fn the_default_is_resistance() {
        let mut s = state();
        set(&mut s, "talked_to_elder");
        assert_eq!(determine(&s), Ending::VillagerResistance);
    }
}
