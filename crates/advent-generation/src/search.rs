//! Contextual lookup woven into the story on fixed trigger days.
//!
//! On a trigger day the client builds a search query from the day's
//! theme and the player's action, asks the model for real-world
//! findings, then rewrites them as in-world lore ("the elder spoke of
//! an old crisis in a distant land..."). Results are cached per query
//! so a retried turn does not pay for the lookup twice.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use advent_engine::{BackendError, SearchBackend};
use advent_types::{GameState, Mood, SearchEvent};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::llm::{CompletionParams, LlmBackend};
use crate::prompt::PromptEngine;

/// Days on which the lookup fires.
const TRIGGER_DAYS: [u32; 5] = [5, 10, 15, 20, 25];

/// How long a cached lookup result stays valid.
const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Lookup parameters: factual register, moderate length.
const LOOKUP_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.7,
    max_tokens: 400,
};

/// Integration parameters: more creative rewriting.
const INTEGRATION_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.8,
    max_tokens: 200,
};

/// Canned integration used when the rewriting step fails: the lookup
/// still lands as a terse proverb instead of vanishing.
const FALLBACK_INTEGRATION: &str = "村の賢者が語った：「困難な時こそ、過去の知恵に学ばねばならぬ…」";

/// Search backend driven by the chat endpoint's knowledge.
pub struct SearchClient {
    backend: LlmBackend,
    prompts: PromptEngine,
    cache: Mutex<BTreeMap<String, (String, Instant)>>,
}

impl SearchClient {
    /// Wire a search client from its LLM client and prompt engine.
    pub const fn new(backend: LlmBackend, prompts: PromptEngine) -> Self {
        Self {
            backend,
            prompts,
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// The day's base query theme.
    const fn base_query(day: u32) -> Option<&'static str> {
        match day {
            5 => Some("disaster preparedness community survival methods"),
            10 => Some("medieval fantasy defense strategies against monsters"),
            15 => Some("ancient legends demon lord weakness mythological"),
            20 => Some("military tactics last stand village defense"),
            25 => Some("apocalyptic survival final battle preparations"),
            _ => None,
        }
    }

    /// The day's emotional register.
    const fn mood_for_day(day: u32) -> Mood {
        match day {
            5 => Mood::Hopeful,
            15 => Mood::Concerned,
            20 => Mood::Urgent,
            25 => Mood::Desperate,
            _ => Mood::Neutral,
        }
    }

    /// Refine the base query with the action's themes. Deterministic.
    fn build_query(day: u32, action: &str) -> Option<String> {
        let mut query = String::from(Self::base_query(day)?);
        if action.contains("武器") {
            query.push_str(" weapon crafting ancient artifacts");
        }
        if action.contains("魔法") {
            query.push_str(" magic spells protective enchantments");
        }
        if action.contains("情報") {
            query.push_str(" intelligence gathering reconnaissance");
        }
        if action.contains('村') || action.contains("仲間") {
            query.push_str(" community unity teamwork");
        }
        Some(query)
    }

    /// Fetch lookup results, consulting the cache first.
    async fn lookup_results(&self, query: &str) -> Result<String, BackendError> {
        if let Some(cached) = self.cached(query) {
            debug!(query, "lookup cache hit");
            return Ok(cached);
        }

        let prompt = crate::prompt::RenderedPrompt {
            system: String::from(
                "あなたは現実世界の知識を要約するリサーチャーです。回答は箇条書き3-5点、日本語で。",
            ),
            user: format!(
                "次のトピックについて、ファンタジーRPGの世界観に応用できる実用的な知識を\
                 3-5個のポイントでまとめてください:\n\"{query}\""
            ),
        };
        let results = self.backend.complete(&prompt, LOOKUP_PARAMS).await?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(String::from(query), (results.clone(), Instant::now()));
        }
        Ok(results)
    }

    fn cached(&self, query: &str) -> Option<String> {
        let cache = self.cache.lock().ok()?;
        let (results, stored_at) = cache.get(query)?;
        (stored_at.elapsed() < CACHE_TTL).then(|| results.clone())
    }
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn lookup(
        &self,
        day: u32,
        action: &str,
        state: &GameState,
    ) -> Result<Option<SearchEvent>, BackendError> {
        if !TRIGGER_DAYS.contains(&day) {
            return Ok(None);
        }
        let Some(query) = Self::build_query(day, action) else {
            return Ok(None);
        };

        info!(day, query, "contextual lookup triggered");
        let results = self.lookup_results(&query).await?;

        let integration = match self.prompts.search_integration(day, &query, &results, state) {
            Ok(prompt) => self
                .backend
                .complete(&prompt, INTEGRATION_PARAMS)
                .await
                .unwrap_or_else(|_| String::from(FALLBACK_INTEGRATION)),
            Err(_) => String::from(FALLBACK_INTEGRATION),
        };

        Ok(Some(SearchEvent {
            query,
            integration,
            mood: Self::mood_for_day(day),
        }))
    }
}
