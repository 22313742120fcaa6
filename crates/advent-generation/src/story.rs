//! The live story backend: narration, choices, events, NPC turns.

use advent_engine::{BackendError, StoryBackend};
use advent_types::{GameState, NpcId, NpcReply};
use async_trait::async_trait;
use tracing::warn;

use crate::llm::{CompletionParams, LlmBackend};
use crate::parse;
use crate::prompt::PromptEngine;

/// Days on which a special event may fire.
const SPECIAL_EVENT_DAYS: [u32; 7] = [5, 10, 15, 20, 25, 29, 30];

/// Creative narration: high temperature, short output.
const NARRATIVE_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.8,
    max_tokens: 300,
};

/// Structured output: lower temperature.
const STRUCTURED_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.7,
    max_tokens: 400,
};

/// Story backend driven by a chat-completion endpoint.
pub struct LlmStory {
    backend: LlmBackend,
    prompts: PromptEngine,
}

impl LlmStory {
    /// Wire a story backend from its LLM client and prompt engine.
    pub const fn new(backend: LlmBackend, prompts: PromptEngine) -> Self {
        Self { backend, prompts }
    }

    /// The canned seed for a special-event day, if any.
    ///
    /// Doubles as the fallback text when elaboration fails: the event
    /// still happens, just tersely.
    const fn event_seed(day: u32) -> Option<&'static str> {
        match day {
            5 => Some("商人が村を訪れる"),
            10 => Some("偵察隊が魔王軍の動きを報告"),
            15 => Some("村に不穏な噂が広がる"),
            20 => Some("魔王軍の先遣隊が目撃される"),
            25 => Some("最後の準備期間"),
            29 => Some("決戦前夜"),
            30 => Some("魔王襲来！"),
            _ => None,
        }
    }
}

#[async_trait]
impl StoryBackend for LlmStory {
    async fn narrative(
        &self,
        day: u32,
        action: &str,
        state: &GameState,
    ) -> Result<String, BackendError> {
        let prompt = self.prompts.narrative(day, action, state)?;
        let text = self.backend.complete(&prompt, NARRATIVE_PARAMS).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(BackendError::Upstream(String::from("empty narrative response")));
        }
        Ok(String::from(text))
    }

    async fn choices(
        &self,
        day: u32,
        narrative: &str,
        state: &GameState,
    ) -> Result<Vec<String>, BackendError> {
        let prompt = self.prompts.choices(day, narrative, state)?;
        let raw = self.backend.complete(&prompt, STRUCTURED_PARAMS).await?;
        parse::parse_choices(&raw)
    }

    async fn special_event(
        &self,
        day: u32,
        state: &GameState,
    ) -> Result<Option<String>, BackendError> {
        let Some(seed) = Self::event_seed(day) else {
            return Ok(None);
        };
        if !SPECIAL_EVENT_DAYS.contains(&day) {
            return Ok(None);
        }

        let prompt = self.prompts.special_event(day, seed, state)?;
        match self.backend.complete(&prompt, NARRATIVE_PARAMS).await {
            Ok(text) if !text.trim().is_empty() => Ok(Some(String::from(text.trim()))),
            Ok(_) => Ok(Some(String::from(seed))),
            Err(error) => {
                // The event itself is scripted; only its elaboration is
                // generative. Fall back to the seed text.
                warn!(day, %error, "special-event elaboration failed, using seed text");
                Ok(Some(String::from(seed)))
            }
        }
    }

    async fn npc_reply(
        &self,
        npc: NpcId,
        day: u32,
        action: &str,
        state: &GameState,
    ) -> Result<NpcReply, BackendError> {
        let prompt = self.prompts.npc(npc, day, action, state)?;
        let raw = self.backend.complete(&prompt, STRUCTURED_PARAMS).await?;
        parse::parse_npc_reply(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_seeds_cover_exactly_the_trigger_days() {
        for day in 1..=30 {
            assert_eq!(
                LlmStory::event_seed(day).is_some(),
                SPECIAL_EVENT_DAYS.contains(&day),
                "day {day}"
            );
        }
    }
}
