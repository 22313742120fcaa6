//! Collaborator contracts consumed by the turn orchestrator.
//!
//! Each external generation capability sits behind its own trait so the
//! orchestrator can fan them out concurrently and isolate their
//! failures. The live implementations in `advent-generation` call real
//! vendor APIs; the stub implementations here let the engine and
//! server be exercised end-to-end without any network, in the same way
//! a stubbed decision source exercises a simulation loop before its
//! model backend exists.

use advent_types::{AudioClip, GameState, NpcId, NpcReply, SearchEvent, StatPatch};
use async_trait::async_trait;

/// Errors surfaced by collaborator calls.
///
/// `Parse` is deliberately its own variant: a malformed structured
/// response is handled as a parse failure (canned response plus a
/// retry-hint choice), not as a generic upstream failure, and its raw
/// payload is preserved for the log.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The upstream call failed or returned a non-success status.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The response arrived but its structured payload was malformed.
    #[error("response parse error: {reason}")]
    Parse {
        /// The raw response text, preserved for diagnosis.
        raw: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The collaborator is not configured or not reachable at all.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Narrative text generation: the default narrator, choice lists,
/// special events, and the specialized NPC narrators.
#[async_trait]
pub trait StoryBackend: Send + Sync {
    /// Narrate the outcome of an action on the given day.
    async fn narrative(
        &self,
        day: u32,
        action: &str,
        state: &GameState,
    ) -> Result<String, BackendError>;

    /// Generate the next choice list from the integrated narrative.
    async fn choices(
        &self,
        day: u32,
        narrative: &str,
        state: &GameState,
    ) -> Result<Vec<String>, BackendError>;

    /// Check whether this day triggers a special event.
    ///
    /// Returns `Ok(None)` on non-trigger days.
    async fn special_event(
        &self,
        day: u32,
        state: &GameState,
    ) -> Result<Option<String>, BackendError>;

    /// Let the routed NPC own this turn's narrative.
    async fn npc_reply(
        &self,
        npc: NpcId,
        day: u32,
        action: &str,
        state: &GameState,
    ) -> Result<NpcReply, BackendError>;
}

/// Scene illustration.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Generate a scene image and return its URL.
    ///
    /// The day-based gate is the orchestrator's job; when called, this
    /// should attempt generation. `Ok(None)` means the vendor produced
    /// nothing without erroring.
    async fn scene_image(&self, prompt: &str, day: u32) -> Result<Option<String>, BackendError>;
}

/// Spoken narration synthesis.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Synthesize narration for text that cleared the importance gate.
    async fn synthesize(
        &self,
        text: &str,
        day: u32,
        reason: &str,
    ) -> Result<Option<AudioClip>, BackendError>;
}

/// Contextual lookup woven into the story on trigger days.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run the lookup for this day and action.
    ///
    /// Returns `Ok(None)` on non-trigger days.
    async fn lookup(
        &self,
        day: u32,
        action: &str,
        state: &GameState,
    ) -> Result<Option<SearchEvent>, BackendError>;
}

/// The full collaborator set a session is wired with.
pub struct Backends {
    /// Narrative, choices, events, NPC narrators.
    pub story: Box<dyn StoryBackend>,
    /// Scene illustration.
    pub image: Box<dyn ImageBackend>,
    /// Spoken narration.
    pub audio: Box<dyn AudioBackend>,
    /// Contextual lookup.
    pub search: Box<dyn SearchBackend>,
}

impl Backends {
    /// An all-stub collaborator set for tests and offline runs.
    pub fn stubbed() -> Self {
        Self {
            story: Box::new(StubStory::default()),
            image: Box::new(StubImage::default()),
            audio: Box::new(StubAudio::default()),
            search: Box::new(StubSearch::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Stubs
// ---------------------------------------------------------------------------

/// Deterministic story source for tests.
///
/// Failure switches let a test make exactly one capability reject, to
/// verify that a failing collaborator degrades only its own slot.
#[derive(Debug, Clone, Default)]
pub struct StubStory {
    /// Reject narrative generation.
    pub fail_narrative: bool,
    /// Reject choice generation.
    pub fail_choices: bool,
    /// Return a parse error from choice generation.
    pub choices_parse_error: bool,
    /// Reject the special-event check.
    pub fail_special_event: bool,
    /// Special event text to return (default: none).
    pub special_event: Option<String>,
    /// Reject NPC replies.
    pub fail_npc: bool,
    /// Return a parse error from NPC replies.
    pub npc_parse_error: bool,
    /// Stat patch attached to every NPC reply.
    pub npc_patch: StatPatch,
    /// Artificial delay before the narrative resolves, for timeout
    /// tests.
    pub narrative_delay_ms: u64,
}

#[async_trait]
impl StoryBackend for StubStory {
    async fn narrative(
        &self,
        day: u32,
        action: &str,
        _state: &GameState,
    ) -> Result<String, BackendError> {
        if self.narrative_delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.narrative_delay_ms)).await;
        }
        if self.fail_narrative {
            return Err(BackendError::Upstream(String::from("stub narrative failure")));
        }
        Ok(format!("Day {day}、あなたは{action}。村は静かに見守っていた。"))
    }

    async fn choices(
        &self,
        _day: u32,
        _narrative: &str,
        _state: &GameState,
    ) -> Result<Vec<String>, BackendError> {
        if self.choices_parse_error {
            return Err(BackendError::Parse {
                raw: String::from("not json at all"),
                reason: String::from("stub parse error"),
            });
        }
        if self.fail_choices {
            return Err(BackendError::Upstream(String::from("stub choices failure")));
        }
        Ok(vec![
            String::from("広場の様子を見る"),
            String::from("見張り塔に登る"),
            String::from("酒場で噂を聞く"),
        ])
    }

    async fn special_event(
        &self,
        _day: u32,
        _state: &GameState,
    ) -> Result<Option<String>, BackendError> {
        if self.fail_special_event {
            return Err(BackendError::Upstream(String::from(
                "stub special-event failure",
            )));
        }
        Ok(self.special_event.clone())
    }

    async fn npc_reply(
        &self,
        npc: NpcId,
        _day: u32,
        action: &str,
        _state: &GameState,
    ) -> Result<NpcReply, BackendError> {
        if self.npc_parse_error {
            return Err(BackendError::Parse {
                raw: String::from("{\"narrative\": "),
                reason: String::from("stub truncated json"),
            });
        }
        if self.fail_npc {
            return Err(BackendError::Upstream(String::from("stub npc failure")));
        }
        Ok(NpcReply {
            narrative: format!("{}は頷いた。「{action}、悪くない考えだ」", npc.display_name()),
            stats: self.npc_patch.clone(),
            affinity_delta: 2,
            trust_delta: 1,
            learned: Vec::new(),
        })
    }
}

/// Deterministic image source for tests.
#[derive(Debug, Clone)]
pub struct StubImage {
    /// Reject image generation.
    pub fail: bool,
    /// URL to return.
    pub url: Option<String>,
}

impl Default for StubImage {
    fn default() -> Self {
        Self {
            fail: false,
            url: Some(String::from("https://images.invalid/scene.png")),
        }
    }
}

#[async_trait]
impl ImageBackend for StubImage {
    async fn scene_image(&self, _prompt: &str, _day: u32) -> Result<Option<String>, BackendError> {
        if self.fail {
            return Err(BackendError::Upstream(String::from("stub image failure")));
        }
        Ok(self.url.clone())
    }
}

/// Deterministic audio source for tests.
#[derive(Debug, Clone, Default)]
pub struct StubAudio {
    /// Reject synthesis.
    pub fail: bool,
}

#[async_trait]
impl AudioBackend for StubAudio {
    async fn synthesize(
        &self,
        _text: &str,
        _day: u32,
        reason: &str,
    ) -> Result<Option<AudioClip>, BackendError> {
        if self.fail {
            return Err(BackendError::Upstream(String::from("stub audio failure")));
        }
        Ok(Some(AudioClip {
            data: String::from("c3R1Yi1hdWRpbw=="),
            reason: String::from(reason),
        }))
    }
}

/// Image source for deployments without an image vendor: the slot
/// resolves to nothing, without counting as a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledImage;

#[async_trait]
impl ImageBackend for DisabledImage {
    async fn scene_image(&self, _prompt: &str, _day: u32) -> Result<Option<String>, BackendError> {
        Ok(None)
    }
}

/// Audio source for deployments without a TTS vendor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAudio;

#[async_trait]
impl AudioBackend for DisabledAudio {
    async fn synthesize(
        &self,
        _text: &str,
        _day: u32,
        _reason: &str,
    ) -> Result<Option<AudioClip>, BackendError> {
        Ok(None)
    }
}

/// Deterministic search source for tests.
#[derive(Debug, Clone, Default)]
pub struct StubSearch {
    /// Reject lookups.
    pub fail: bool,
    /// Event to return (default: none, as on a non-trigger day).
    pub event: Option<SearchEvent>,
    /// Artificial delay before resolving, for timeout tests.
    pub delay_ms: u64,
}

#[async_trait]
impl SearchBackend for StubSearch {
    async fn lookup(
        &self,
        _day: u32,
        _action: &str,
        _state: &GameState,
    ) -> Result<Option<SearchEvent>, BackendError> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail {
            return Err(BackendError::Upstream(String::from("stub search failure")));
        }
        Ok(self.event.clone())
    }
}
