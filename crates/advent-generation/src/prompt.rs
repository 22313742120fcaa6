//! Prompt construction via `minijinja` templates.
//!
//! The templates are embedded in the binary: the wording is part of
//! the game's tuning, and shipping it with the code keeps a deployment
//! self-contained. Each public method renders one call's system/user
//! prompt pair from the current game state.

use advent_engine::BackendError;
use advent_types::{GameState, NpcId};
use minijinja::Environment;

/// Errors raised while building the template environment.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// A template failed to compile.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// A rendered system/user prompt pair ready for an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message establishing the narrator or persona.
    pub system: String,
    /// User message carrying the concrete task.
    pub user: String,
}

/// Renders all story prompts from embedded templates.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Build the engine, compiling every embedded template.
    pub fn new() -> Result<Self, PromptError> {
        let mut env = Environment::new();
        env.add_template("narrative", NARRATIVE_TEMPLATE)?;
        env.add_template("choices", CHOICES_TEMPLATE)?;
        env.add_template("special_event", SPECIAL_EVENT_TEMPLATE)?;
        env.add_template("npc_task", NPC_TASK_TEMPLATE)?;
        env.add_template("search_integration", SEARCH_INTEGRATION_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Prompt for narrating an action's outcome.
    pub fn narrative(
        &self,
        day: u32,
        action: &str,
        state: &GameState,
    ) -> Result<RenderedPrompt, BackendError> {
        let user = self.render(
            "narrative",
            &context(day, state, &[("action", action.into())]),
        )?;
        Ok(RenderedPrompt {
            system: String::from(STORYTELLER_SYSTEM),
            user,
        })
    }

    /// Prompt for generating the next choice list.
    pub fn choices(
        &self,
        day: u32,
        narrative: &str,
        state: &GameState,
    ) -> Result<RenderedPrompt, BackendError> {
        let user = self.render(
            "choices",
            &context(
                day,
                state,
                &[
                    ("narrative", narrative.into()),
                    ("late_game", (day > 20).into()),
                ],
            ),
        )?;
        Ok(RenderedPrompt {
            system: String::from(STORYTELLER_SYSTEM),
            user,
        })
    }

    /// Prompt for elaborating a special-event seed into a scene.
    pub fn special_event(
        &self,
        day: u32,
        seed: &str,
        state: &GameState,
    ) -> Result<RenderedPrompt, BackendError> {
        let user = self.render(
            "special_event",
            &context(day, state, &[("seed", seed.into())]),
        )?;
        Ok(RenderedPrompt {
            system: String::from(STORYTELLER_SYSTEM),
            user,
        })
    }

    /// Prompt for a delegated NPC turn, in that NPC's persona.
    pub fn npc(
        &self,
        npc: NpcId,
        day: u32,
        action: &str,
        state: &GameState,
    ) -> Result<RenderedPrompt, BackendError> {
        let user = self.render(
            "npc_task",
            &context(
                day,
                state,
                &[("action", action.into()), ("npc_name", npc.display_name().into())],
            ),
        )?;
        Ok(RenderedPrompt {
            system: String::from(persona(npc)),
            user,
        })
    }

    /// Prompt for rewriting lookup results as in-world lore.
    pub fn search_integration(
        &self,
        day: u32,
        query: &str,
        results: &str,
        state: &GameState,
    ) -> Result<RenderedPrompt, BackendError> {
        let user = self.render(
            "search_integration",
            &context(
                day,
                state,
                &[("query", query.into()), ("results", results.into())],
            ),
        )?;
        Ok(RenderedPrompt {
            system: String::from(STORYTELLER_SYSTEM),
            user,
        })
    }

    fn render(&self, name: &str, ctx: &serde_json::Value) -> Result<String, BackendError> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(|e| BackendError::Upstream(format!("template {name} render failed: {e}")))
    }
}

/// Shared template context: countdown position and player snapshot.
fn context(
    day: u32,
    state: &GameState,
    extra: &[(&str, serde_json::Value)],
) -> serde_json::Value {
    let mut ctx = serde_json::json!({
        "day": day,
        "max_days": advent_types::MAX_DAYS,
        "player_name": state.player_name,
        "role_name": state.player_role.local_name(),
        "reputation": state.stats.reputation,
        "wealth": state.stats.wealth,
        "health": state.stats.health,
        "story_flags": state.flags.keys().cloned().collect::<Vec<_>>(),
    });
    if let Some(map) = ctx.as_object_mut() {
        for (key, value) in extra {
            map.insert(String::from(*key), value.clone());
        }
    }
    ctx
}

/// NPC persona system prompts, condensed from the village cast.
const fn persona(npc: NpcId) -> &'static str {
    match npc {
        NpcId::ElderMorgan => ELDER_PERSONA,
        NpcId::MerchantGrom => MERCHANT_PERSONA,
        NpcId::ElaraSage => SAGE_PERSONA,
    }
}

// ---------------------------------------------------------------------------
// System prompts
// ---------------------------------------------------------------------------

const STORYTELLER_SYSTEM: &str = "\
あなたは「30日後の魔王襲来」の物語を紡ぐストーリーテラーです。\
舞台は始まりの村アルファ（人口500人の小さな村）。30日後に魔王が襲来する予言が村を覆っています。\
すべての文章は日本語で、プレイヤー視点の没入感を重視して描写してください。";

const ELDER_PERSONA: &str = "\
あなたはアルファ村の村長、エルダー・モーガンです。65歳、40年以上村を統治してきた威厳ある老人で、\
古い伝承と50年前の魔王襲来の記録を知っています。丁寧で格調高い言葉遣い（「〜である」「〜であろう」）で話し、\
村の政治的決定と防衛計画に責任を持ちます。プレイヤーの役割に応じて態度を変えてください。\
応答は必ずJSON形式: {\"narrative\": \"応答の描写（150-300文字、日本語）\", \
\"stats\": {\"reputation\": 0, \"wealth\": 0}, \"flags\": {}, \"affinity\": 0, \"trust\": 0, \"learned\": []}";

const MERCHANT_PERSONA: &str = "\
あなたは村の商人兼鍛冶屋のグロムです。45歳、実直で商売熱心、関西弁風の親しみやすい口調（「〜やで」「〜やなあ」）で話します。\
武器・防具・道具を扱い、魔王襲来が近づくほど価格は上がります（Day1-10は通常、Day11-20は1.5倍、Day21-30は3倍）。\
金額の計算は正確に: 購入はwealthのマイナス、売却や報酬はプラス。\
応答は必ずJSON形式: {\"narrative\": \"応答の描写（150-300文字、日本語）\", \
\"stats\": {\"reputation\": 0, \"wealth\": 0}, \"flags\": {}, \"affinity\": 0, \"trust\": 0, \"learned\": []}";

const SAGE_PERSONA: &str = "\
あなたは村の賢者エララです。35歳、知的で冷静、上品な丁寧語（「〜ですわ」「〜でしょうね」）で話し、\
古代魔法・予言解釈・魔王の歴史に精通しています。重要なことは時に謎かけのように語ります。\
応答は必ずJSON形式: {\"narrative\": \"応答の描写（150-300文字、日本語）\", \
\"stats\": {\"reputation\": 0, \"knowledge\": 0}, \"flags\": {}, \"affinity\": 0, \"trust\": 0, \"learned\": []}";

// ---------------------------------------------------------------------------
// User templates
// ---------------------------------------------------------------------------

const NARRATIVE_TEMPLATE: &str = "\
【現在】Day {{ day }}/{{ max_days }}
【プレイヤー】役割: {{ role_name }}、評判: {{ reputation }}、所持金: {{ wealth }}ゴールド
【これまでの行動】{% if story_flags %}{{ story_flags | join('、') }}{% else %}まだ何もしていない{% endif %}

【プレイヤーの行動】
\"{{ action }}\"

この行動の結果を、没入感のある物語として2-3文で描写してください。
- プレイヤー視点で体験を描く
- 村人や環境の反応を表現
- 魔王襲来の緊張感を織り込む
- 批評や解説ではなく、物語の一部として語る";

const CHOICES_TEMPLATE: &str = "\
【現在の状況】Day {{ day }}/{{ max_days }}
{{ narrative }}

【プレイヤー状態】役割: {{ role_name }}、評判: {{ reputation }}、所持金: {{ wealth }}

この状況で取りうる選択肢を3-4個生成し、次のJSON形式だけを返してください:
{\"choices\": [\"選択肢1\", \"選択肢2\", \"選択肢3\"]}

条件: 各選択肢は15文字以内、{{ role_name }}らしい選択肢を含める{% if late_game %}、魔王襲来への対策を含める{% endif %}。";

const SPECIAL_EVENT_TEMPLATE: &str = "\
【特別イベント】{{ seed }}
【プレイヤー情報】役割: {{ role_name }}、評判: {{ reputation }}、Day {{ day }}/{{ max_days }}

このイベントの詳細な描写を2-3文で生成してください。
緊張感と没入感を重視し、プレイヤーの役割に応じた視点で。";

const NPC_TASK_TEMPLATE: &str = "\
プレイヤー「{{ player_name }}」（役割: {{ role_name }}）がDay {{ day }}にあなたを訪れ、
「{{ action }}」と行動しました。

あなたのキャラクター設定に従って一貫した応答をし、結果を指定のJSON形式で返してください。
パラメータ変更は正確に計算してください（お金を使う場合は必ずマイナス値）。";

const SEARCH_INTEGRATION_TEMPLATE: &str = "\
【現在】Day {{ day }}/{{ max_days }}、プレイヤー役割: {{ role_name }}
検索クエリ: \"{{ query }}\"
検索結果:
{{ results }}

この現実世界の情報を、中世ファンタジー世界の設定として自然に統合してください。
村の長老や賢者の口から「古い知恵」として伝える形、旅人の情報や古い書物の記述として表現する形が望ましい。
1-3文の短い語りとして出力してください。";

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use advent_types::PlayerRole;

    use super::*;

    fn state() -> GameState {
        advent_state_for_tests()
    }

    fn advent_state_for_tests() -> GameState {
        serde_json::from_value(serde_json::json!({
            "current_day": 3,
            "player_role": "hero",
            "player_name": "アレン",
            "location": "village_center",
            "stats": {
                "level": 1, "health": 100, "strength": 35, "knowledge": 20,
                "reputation": 10, "wealth": 100, "allies": []
            },
            "inventory": [],
            "flags": {"talked_to_elder": true},
            "npc_relationships": {}
        }))
        .unwrap()
    }

    #[test]
    fn narrative_prompt_carries_the_action_and_day() {
        let engine = PromptEngine::new().unwrap();
        let prompt = engine.narrative(3, "村を探索する", &state()).unwrap();
        assert!(prompt.user.contains("Day 3/30"));
        assert!(prompt.user.contains("村を探索する"));
        assert!(prompt.user.contains("英雄"));
        assert!(prompt.system.contains("ストーリーテラー"));
    }

    #[test]
    fn choices_prompt_adds_invasion_pressure_late() {
        let engine = PromptEngine::new().unwrap();
        let early = engine.choices(5, "…", &state()).unwrap();
        let late = engine.choices(25, "…", &state()).unwrap();
        assert!(!early.user.contains("魔王襲来への対策"));
        assert!(late.user.contains("魔王襲来への対策"));
    }

    #[test]
    fn npc_prompt_uses_the_persona_system() {
        let engine = PromptEngine::new().unwrap();
        let prompt = engine
            .npc(NpcId::MerchantGrom, 12, "剣を買いたい", &state())
            .unwrap();
        assert!(prompt.system.contains("グロム"));
        assert!(prompt.user.contains("剣を買いたい"));
        assert!(prompt.user.contains("アレン"));
    }

    #[test]
    fn flags_render_as_prior_actions() {
        let engine = PromptEngine::new().unwrap();
        let prompt = engine.narrative(3, "休む", &state()).unwrap();
        assert!(prompt.user.contains("talked_to_elder"));
        let role = PlayerRole::Hero;
        assert!(prompt.user.contains(role.local_name()));
    }
}
