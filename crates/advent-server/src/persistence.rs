//! JSON file persistence for game saves.
//!
//! The wire format is the `{day, state, saved_at}` wrapper from
//! `advent-types`; no schema versioning beyond that. Writes go through
//! a sibling temp file and a rename so a crash mid-write never leaves
//! a torn save.

use std::path::Path;

use advent_types::GameSave;

/// Errors raised by save/load operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Filesystem access failed.
    #[error("save file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The save file held malformed JSON.
    #[error("save file parse error: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Write a save to disk.
pub fn save(path: &Path, save: &GameSave) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(save)?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read a save back from disk.
pub fn load(path: &Path) -> Result<GameSave, PersistenceError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("advent-persistence-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn save_then_load_reproduces_the_state_exactly() {
        let path = temp_path("roundtrip");
        let mut state =
            advent_state::new_game("テスト", advent_types::PlayerRole::Villager).unwrap();
        state.current_day = 12;
        state.stats.wealth = 777;
        state.flags.insert(String::from("trained"), true);

        let original = GameSave {
            day: 12,
            state,
            saved_at: Utc::now(),
        };
        save(&path, &original).unwrap();
        let restored = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(restored, original);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = temp_path("missing-never-created");
        assert!(matches!(load(&path), Err(PersistenceError::Io(_))));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{not json").unwrap();
        let result = load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(PersistenceError::Malformed(_))));
    }
}
