//! Environment-loaded configuration for the generation clients.
//!
//! The server needs to know which chat endpoint generates the story,
//! and optionally where images and narration audio come from. All of
//! it comes from `ADVENT_*` environment variables so deployments can
//! swap vendors without recompiling.

/// Errors raised while loading generation configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable held an unusable value.
    #[error("invalid value for {var}: {value}")]
    InvalidVar {
        /// The variable name.
        var: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Which wire protocol a chat endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// OpenAI-compatible chat completions (xAI Grok, `OpenAI`, Ollama).
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

/// One chat endpoint: protocol, URL, key, model.
#[derive(Debug, Clone)]
pub struct LlmEndpoint {
    /// The wire protocol.
    pub kind: BackendKind,
    /// Base API URL (e.g. `https://api.x.ai/v1`).
    pub api_url: String,
    /// API key.
    pub api_key: String,
    /// Model identifier (e.g. `grok-3-mini`).
    pub model: String,
}

/// Complete generation configuration.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// The chat endpoint driving narration, choices, and NPCs.
    pub llm: LlmEndpoint,
    /// Image-generation endpoint base URL; `None` disables images.
    pub image_api_url: Option<String>,
    /// Image model identifier.
    pub image_model: String,
    /// TTS endpoint base URL; `None` disables narration audio.
    pub tts_api_url: Option<String>,
    /// TTS API key.
    pub tts_api_key: String,
}

impl GenerationConfig {
    /// Load configuration from the environment.
    ///
    /// Required:
    /// - `ADVENT_LLM_BACKEND` -- `openai` or `anthropic`
    /// - `ADVENT_LLM_API_URL`
    /// - `ADVENT_LLM_API_KEY`
    /// - `ADVENT_LLM_MODEL`
    ///
    /// Optional:
    /// - `ADVENT_IMAGE_API_URL` (images disabled when unset)
    /// - `ADVENT_IMAGE_MODEL` (default `grok-2-image`)
    /// - `ADVENT_TTS_API_URL` (audio disabled when unset)
    /// - `ADVENT_TTS_API_KEY`
    pub fn from_env() -> Result<Self, ConfigError> {
        let kind = match env_var("ADVENT_LLM_BACKEND")?.to_lowercase().as_str() {
            "openai" | "openai-compatible" | "xai" | "ollama" => BackendKind::OpenAi,
            "anthropic" => BackendKind::Anthropic,
            other => {
                return Err(ConfigError::InvalidVar {
                    var: "ADVENT_LLM_BACKEND",
                    value: String::from(other),
                });
            }
        };

        Ok(Self {
            llm: LlmEndpoint {
                kind,
                api_url: env_var("ADVENT_LLM_API_URL")?,
                api_key: env_var("ADVENT_LLM_API_KEY")?,
                model: env_var("ADVENT_LLM_MODEL")?,
            },
            image_api_url: std::env::var("ADVENT_IMAGE_API_URL").ok(),
            image_model: std::env::var("ADVENT_IMAGE_MODEL")
                .unwrap_or_else(|_| String::from("grok-2-image")),
            tts_api_url: std::env::var("ADVENT_TTS_API_URL").ok(),
            tts_api_key: std::env::var("ADVENT_TTS_API_KEY").unwrap_or_default(),
        })
    }
}

fn env_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
