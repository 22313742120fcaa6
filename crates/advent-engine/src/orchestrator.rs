//! The turn orchestrator: one player action, one complete turn.
//!
//! A turn moves through a fixed state sequence:
//!
//! ```text
//! Idle -> Phase1Running -> NarrativeIntegrated -> Phase2Running
//!      -> Committed -> (TurnOver | Continuing)
//! ```
//!
//! Phase 1 fans out the narrative-independent tasks (special event,
//! delegated or default narrative, search lookup, gated image) and
//! Phase 2 the narrative-dependent ones (choices, audio). Every task
//! is individually wrapped in a timeout + fallback guard: a slow or
//! failing collaborator degrades that feature only, never the turn.
//! Ordering across sibling tasks is unspecified; ordering between the
//! phases is strict.
//!
//! The commit stage is fully synchronous -- effect resolution, risk
//! roll, state mutation, and the day advance all run atomically
//! between suspension points, so no two turns' mutations can
//! interleave as long as turn invocations are serialized per session.
//! The session is an explicit object owned by the caller; concurrent
//! sessions each own their own state.

use std::time::{Duration, Instant};

use advent_state::{NewGameError, progression};
use advent_types::{
    GameSave, GameState, MAX_DAYS, NpcId, NpcReply, PlayerRole, STARTING_DAY, SearchEvent,
    TurnMetrics, TurnResult,
};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::backend::{BackendError, Backends};
use crate::config::GameConfig;
use crate::delegation::DelegationRouter;
use crate::resolver::EffectResolver;
use crate::risk::RiskEngine;
use crate::{ending, gates};

/// The fixed fallback choice list, served whenever choice generation
/// degrades.
const FALLBACK_CHOICES: [&str; 3] = ["村長と相談する", "武器を探しに行く", "情報を集める"];

/// Choice appended when a structured response failed to parse, inviting
/// the player to retry.
const RETRY_CHOICE: &str = "もう一度試す";

/// Canned narrative for a malformed structured response.
const PARSE_FAILURE_NARRATIVE: &str = "システムエラーが発生しました。もう一度お試しください。";

/// Errors a turn can be rejected with.
///
/// Both variants are precondition failures: the state has not been
/// mutated when they are returned. Everything downstream of the
/// preconditions is defensively isolated, and the synchronous commit
/// stage is infallible by construction.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The action text was empty or whitespace-only.
    #[error("action text must not be empty")]
    EmptyAction,

    /// The final day has been reached; no further turns are processed.
    #[error("the demon lord has arrived; the game is over")]
    GameOver,
}

/// What the narrative task produced, and how.
struct NarrativeOutcome {
    /// The narrative text (possibly a fallback).
    text: String,
    /// The NPC that owned the turn, when delegation routed one.
    npc: Option<NpcId>,
    /// The NPC's typed reply, when delegation succeeded.
    reply: Option<NpcReply>,
    /// True when a structured response failed to parse.
    parse_failed: bool,
    /// True when the slot fell back for any reason.
    degraded: bool,
}

/// One game session: the canonical state plus everything needed to
/// process turns against it.
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    resolver: EffectResolver,
    router: DelegationRouter,
    risk: RiskEngine,
    backends: Backends,
}

impl GameSession {
    /// Start a new game for the named player.
    ///
    /// An empty player name is rejected with no session created.
    pub fn new(
        player_name: &str,
        role: PlayerRole,
        config: GameConfig,
        backends: Backends,
    ) -> Result<Self, NewGameError> {
        let state = advent_state::new_game(player_name, role)?;
        Ok(Self::from_state(state, config, backends))
    }

    /// Resume a session around an existing state (e.g. a loaded save).
    pub fn from_state(state: GameState, config: GameConfig, backends: Backends) -> Self {
        Self {
            config,
            state,
            resolver: EffectResolver::new(),
            router: DelegationRouter::new(),
            risk: RiskEngine::new(),
            backends,
        }
    }

    /// Replace the risk engine (tests inject a seeded one).
    #[must_use]
    pub fn with_risk(mut self, risk: RiskEngine) -> Self {
        self.risk = risk;
        self
    }

    /// Read-only view of the canonical state.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// True once the final day has been reached.
    pub const fn game_over(&self) -> bool {
        self.state.current_day >= MAX_DAYS
    }

    /// Start over with a fresh state for the named player, keeping the
    /// wired collaborators. An empty name is rejected with no change.
    pub fn reset(&mut self, player_name: &str, role: PlayerRole) -> Result<(), NewGameError> {
        self.state = advent_state::new_game(player_name, role)?;
        Ok(())
    }

    /// Restore state from a save wrapper. The wrapper's day wins over
    /// the embedded state's, clamped to the valid range.
    pub fn restore(&mut self, save: GameSave) {
        self.state = save.state;
        self.state.current_day = save.day.clamp(STARTING_DAY, MAX_DAYS);
    }

    /// Process one player action into a complete turn result.
    ///
    /// Precondition failures (empty action, game already over) return
    /// an error with no state mutation. Otherwise the player always
    /// receives a complete result: every generation slot is either its
    /// real value or its documented fallback.
    pub async fn process_action(&mut self, action: &str) -> Result<TurnResult, TurnError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(TurnError::EmptyAction);
        }
        if self.game_over() {
            return Err(TurnError::GameOver);
        }

        let turn_start = Instant::now();
        let day = self.state.current_day;
        let deadline = self.config.task_timeout();
        info!(day, action, "turn started");

        // --- Phase 1: narrative-independent tasks, concurrently ---
        let phase1_start = Instant::now();
        let this = &*self;
        let ((special_event, special_degraded), narrative, (search_event, search_degraded), (image_url, image_degraded)) = tokio::join!(
            guard(
                "special-event",
                deadline,
                None,
                this.backends.story.special_event(day, &this.state),
            ),
            this.run_narrative(day, action, deadline),
            guard(
                "search",
                deadline,
                None,
                this.backends.search.lookup(day, action, &this.state),
            ),
            this.run_image(day, deadline),
        );
        let phase1_ms = elapsed_ms(phase1_start);

        // --- Narrative integration: fixed composition order ---
        let full_narrative = integrate_narrative(
            &narrative.text,
            special_event.as_deref(),
            search_event.as_ref(),
        );

        // --- Phase 2: narrative-dependent tasks, concurrently ---
        let phase2_start = Instant::now();
        let ((choices, choices_degraded, choices_parse_failed), (audio, audio_degraded)) = tokio::join!(
            this.run_choices(day, &full_narrative, deadline),
            this.run_audio(day, &full_narrative, deadline),
        );
        let phase2_ms = elapsed_ms(phase2_start);

        let mut choices = choices;
        if narrative.parse_failed || choices_parse_failed {
            choices.push(String::from(RETRY_CHOICE));
        }

        // --- Commit: synchronous, single-writer ---
        let mut effect = self.resolver.resolve(action, self.state.player_role);
        self.risk.apply(&mut effect);
        if let Some(reply) = &narrative.reply {
            // Base effect first, delegated patch second: delegated
            // outcomes override but never drop base effects.
            effect.merge_patch(&reply.stats);
        }
        advent_state::apply_effect(&mut self.state, &effect);
        if let (Some(npc), Some(reply)) = (narrative.npc, &narrative.reply) {
            advent_state::apply_npc_outcome(&mut self.state, npc, reply);
        }

        let days = progression::time_cost(action);
        let outcome = progression::advance(&mut self.state, days);
        let ending = outcome.game_over.then(|| ending::determine(&self.state));

        let degraded_slots = [
            special_degraded,
            narrative.degraded,
            search_degraded,
            image_degraded,
            choices_degraded,
            audio_degraded,
        ];
        let tasks_degraded = u32::try_from(degraded_slots.iter().filter(|d| **d).count())
            .unwrap_or(u32::MAX);
        let tasks_total = u32::try_from(degraded_slots.len()).unwrap_or(u32::MAX);

        info!(
            day,
            new_day = outcome.new_day,
            game_over = outcome.game_over,
            tasks_degraded,
            "turn committed"
        );

        Ok(TurnResult {
            day,
            narrative: full_narrative,
            choices,
            image_url,
            audio,
            special_event,
            search_event,
            warnings: outcome.warnings,
            game_over: outcome.game_over,
            ending,
            metrics: TurnMetrics {
                total_ms: elapsed_ms(turn_start),
                phase1_ms,
                phase2_ms,
                tasks_completed: tasks_total.saturating_sub(tasks_degraded),
                tasks_degraded,
            },
        })
    }

    /// The narrative slot: delegated to an NPC when routing matches,
    /// otherwise the default narrator. Both paths degrade gracefully.
    async fn run_narrative(
        &self,
        day: u32,
        action: &str,
        deadline: Duration,
    ) -> NarrativeOutcome {
        let npc = self
            .config
            .delegation_enabled
            .then(|| self.router.route(action))
            .flatten();

        let Some(npc) = npc else {
            let fallback = format!("{action}を試みた。結果は...予想外のものだった。（Day {day}/{MAX_DAYS}）");
            let (text, degraded) = guard(
                "narrative",
                deadline,
                fallback,
                self.backends.story.narrative(day, action, &self.state),
            )
            .await;
            return NarrativeOutcome {
                text,
                npc: None,
                reply: None,
                parse_failed: false,
                degraded,
            };
        };

        match timeout(
            deadline,
            self.backends.story.npc_reply(npc, day, action, &self.state),
        )
        .await
        {
            Ok(Ok(reply)) => NarrativeOutcome {
                text: reply.narrative.clone(),
                npc: Some(npc),
                reply: Some(reply),
                parse_failed: false,
                degraded: false,
            },
            Ok(Err(BackendError::Parse { raw, reason })) => {
                warn!(task = "npc-reply", %reason, raw, "structured response failed to parse");
                NarrativeOutcome {
                    text: String::from(PARSE_FAILURE_NARRATIVE),
                    npc: Some(npc),
                    reply: None,
                    parse_failed: true,
                    degraded: true,
                }
            }
            Ok(Err(error)) => {
                warn!(task = "npc-reply", %error, "delegation failed, using canned reply");
                NarrativeOutcome {
                    text: npc_unavailable(npc),
                    npc: Some(npc),
                    reply: None,
                    parse_failed: false,
                    degraded: true,
                }
            }
            Err(_) => {
                warn!(task = "npc-reply", ?deadline, "delegation timed out, using canned reply");
                NarrativeOutcome {
                    text: npc_unavailable(npc),
                    npc: Some(npc),
                    reply: None,
                    parse_failed: false,
                    degraded: true,
                }
            }
        }
    }

    /// The image slot: day gate first, then a guarded generation call.
    async fn run_image(&self, day: u32, deadline: Duration) -> (Option<String>, bool) {
        if !gates::should_generate_image(day) {
            return (None, false);
        }
        let prompt = format!("Day {day} scene");
        guard(
            "image",
            deadline,
            None,
            self.backends.image.scene_image(&prompt, day),
        )
        .await
    }

    /// The choices slot: real generation, or the fixed fallback list.
    /// The extra boolean reports a parse failure specifically.
    async fn run_choices(
        &self,
        day: u32,
        narrative: &str,
        deadline: Duration,
    ) -> (Vec<String>, bool, bool) {
        match timeout(
            deadline,
            self.backends.story.choices(day, narrative, &self.state),
        )
        .await
        {
            Ok(Ok(choices)) if !choices.is_empty() => (choices, false, false),
            Ok(Ok(_)) => {
                warn!(task = "choices", "empty choice list, using fallback");
                (fallback_choices(), true, false)
            }
            Ok(Err(BackendError::Parse { raw, reason })) => {
                warn!(task = "choices", %reason, raw, "structured response failed to parse");
                (fallback_choices(), true, true)
            }
            Ok(Err(error)) => {
                warn!(task = "choices", %error, "choice generation failed, using fallback");
                (fallback_choices(), true, false)
            }
            Err(_) => {
                warn!(task = "choices", ?deadline, "choice generation timed out, using fallback");
                (fallback_choices(), true, false)
            }
        }
    }

    /// The audio slot: importance gate first, then guarded synthesis.
    async fn run_audio(
        &self,
        day: u32,
        narrative: &str,
        deadline: Duration,
    ) -> (Option<advent_types::AudioClip>, bool) {
        let importance = gates::narration_importance(narrative, day);
        if !importance.clears_gate() {
            return (None, false);
        }
        guard(
            "audio",
            deadline,
            None,
            self.backends
                .audio
                .synthesize(narrative, day, &importance.reason),
        )
        .await
    }
}

/// Compose the integrated narrative in its fixed order: special-event
/// block prefixed, base narrative, search block appended.
pub fn integrate_narrative(
    base: &str,
    special_event: Option<&str>,
    search_event: Option<&SearchEvent>,
) -> String {
    let mut full = String::from(base);
    if let Some(event) = special_event {
        full = format!("【特別イベント】\n{event}\n\n{full}");
    }
    if let Some(search) = search_event {
        full.push_str("\n\n【探索結果】\n");
        full.push_str(&search.integration);
    }
    full
}

/// Run one collaborator call under a deadline, substituting the named
/// fallback on error or timeout. A task's failure never aborts its
/// siblings. Returns the value and whether the slot degraded.
async fn guard<T>(
    task: &'static str,
    deadline: Duration,
    fallback: T,
    call: impl Future<Output = Result<T, BackendError>>,
) -> (T, bool) {
    match timeout(deadline, call).await {
        Ok(Ok(value)) => (value, false),
        Ok(Err(error)) => {
            warn!(task, %error, "generation task failed, using fallback");
            (fallback, true)
        }
        Err(_) => {
            warn!(task, ?deadline, "generation task timed out, using fallback");
            (fallback, true)
        }
    }
}

fn fallback_choices() -> Vec<String> {
    FALLBACK_CHOICES.iter().map(|c| String::from(*c)).collect()
}

fn npc_unavailable(npc: NpcId) -> String {
    format!(
        "{}は現在応答できません。後でもう一度お試しください。",
        npc.display_name()
    )
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
