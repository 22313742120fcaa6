//! Game server binary for Advent.
//!
//! # Startup sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load settings (`advent.yaml` + `ADVENT_*` env overrides)
//! 3. Load generation credentials from the environment; fall back to
//!    stub collaborators when they are absent (offline mode)
//! 4. Start the boot session for the configured player
//! 5. Bind and serve the HTTP API

use advent_engine::{Backends, GameSession};
use advent_generation::{GenerationConfig, ImageClient, LlmBackend, LlmStory, SearchClient, TtsClient};
use advent_generation::prompt::PromptEngine;
use advent_server::server::{ServerConfig, start_server};
use advent_server::settings::Settings;
use advent_server::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("advent-server starting");

    let settings = Settings::load()?;
    info!(
        host = settings.host,
        port = settings.port,
        player = settings.player_name,
        role = ?settings.player_role,
        offline = settings.offline,
        "settings loaded"
    );

    let backends = build_backends(&settings)?;
    let session = GameSession::new(
        &settings.player_name,
        settings.player_role,
        settings.game.clone(),
        backends,
    )?;
    let state = AppState::new(session, settings.save_path.clone().into());

    let config = ServerConfig {
        host: settings.host.clone(),
        port: settings.port,
    };
    start_server(&config, state).await?;
    Ok(())
}

/// Wire live collaborators from the environment, or stubs when the
/// credentials are absent. A misconfigured deployment still boots and
/// plays -- with degraded content rather than a crash.
fn build_backends(settings: &Settings) -> anyhow::Result<Backends> {
    if settings.offline {
        info!("offline mode: using stub collaborators");
        return Ok(Backends::stubbed());
    }

    let generation = match GenerationConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            warn!(%error, "generation credentials missing, using stub collaborators");
            return Ok(Backends::stubbed());
        }
    };

    let story_backend = LlmBackend::from_endpoint(&generation.llm);
    let search_backend = LlmBackend::from_endpoint(&generation.llm);
    info!(backend = story_backend.name(), model = generation.llm.model, "LLM backend wired");

    let mut backends = Backends {
        story: Box::new(LlmStory::new(story_backend, PromptEngine::new()?)),
        image: Box::new(advent_engine::backend::DisabledImage),
        audio: Box::new(advent_engine::backend::DisabledAudio),
        search: Box::new(SearchClient::new(search_backend, PromptEngine::new()?)),
    };

    if let Some(image_url) = &generation.image_api_url {
        backends.image = Box::new(ImageClient::new(
            image_url,
            &generation.llm.api_key,
            &generation.image_model,
        ));
    } else {
        info!("image generation disabled (no ADVENT_IMAGE_API_URL)");
    }

    if let Some(tts_url) = &generation.tts_api_url {
        backends.audio = Box::new(TtsClient::new(tts_url, &generation.tts_api_key));
    } else {
        info!("narration audio disabled (no ADVENT_TTS_API_URL)");
    }

    Ok(backends)
}
