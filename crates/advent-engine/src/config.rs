//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable engine behavior.
///
/// Deserializable so the server can embed it in its settings file;
/// every field has a default so a missing section means "stock rules".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Route matching actions to specialized NPC narrators.
    ///
    /// When off, the default narrator owns every turn -- the same
    /// orchestrator, not a separate game-loop implementation.
    pub delegation_enabled: bool,
    /// Per-task deadline for collaborator calls, in milliseconds.
    ///
    /// A task that exceeds this degrades to its fallback value; the
    /// turn never hangs on one slow collaborator.
    pub task_timeout_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            delegation_enabled: true,
            task_timeout_ms: 10_000,
        }
    }
}

impl GameConfig {
    /// The per-task deadline as a [`Duration`].
    pub const fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_fields() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert!(config.delegation_enabled);
        assert_eq!(config.task_timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn fields_can_be_overridden() {
        let config: GameConfig =
            serde_json::from_str(r#"{"delegation_enabled": false, "task_timeout_ms": 250}"#)
                .unwrap();
        assert!(!config.delegation_enabled);
        assert_eq!(config.task_timeout(), Duration::from_millis(250));
    }
}
