//! Server settings: file plus environment overrides.
//!
//! Settings load from an optional `advent.yaml` (or `.toml`) next to
//! the binary, overridden by `ADVENT_*` environment variables. The
//! generation clients load their own endpoint credentials separately
//! (see `advent_generation::GenerationConfig`).

use advent_engine::GameConfig;
use advent_types::PlayerRole;
use serde::Deserialize;

/// Complete server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Save file location for `/api/save` and `/api/load`.
    pub save_path: String,
    /// Player name for the session started at boot.
    pub player_name: String,
    /// Player role for the session started at boot.
    pub player_role: PlayerRole,
    /// Run with stub collaborators even if live credentials exist.
    pub offline: bool,
    /// Engine behavior.
    pub game: GameConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 3141,
            save_path: String::from("advent-save.json"),
            player_name: String::from("旅人"),
            player_role: PlayerRole::Villager,
            offline: false,
            game: GameConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from `advent.{yaml,toml}` and `ADVENT_*` env vars.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("advent").required(false))
            .add_source(config::Environment::with_prefix("ADVENT").separator("__"))
            .build()?
            .try_deserialize()
    }
}
