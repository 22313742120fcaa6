//! Strict parsing of structured model responses.
//!
//! Models are asked for JSON but routinely wrap it in prose, fence it
//! in markdown, or leave a trailing comma. Parsing attempts several
//! recovery strategies in order:
//!
//! 1. Direct deserialization
//! 2. Extraction from a fenced code block
//! 3. Extraction of the outermost `{...}` object
//! 4. Trailing-comma stripping over each of the above
//!
//! When every strategy fails the caller gets a tagged
//! [`BackendError::Parse`] carrying the raw text -- malformed
//! responses never flow into the state store as untyped data.

use std::collections::BTreeMap;

use advent_engine::BackendError;
use advent_types::{NpcReply, StatPatch};
use serde::Deserialize;
use tracing::debug;

/// Stat keys a structured reply may legally patch.
///
/// Anything else in the `stats` object is dropped with a debug log --
/// a documented tolerance for forward-compatible effect payloads from
/// generative sources.
const KNOWN_STAT_KEYS: [&str; 5] = ["reputation", "wealth", "strength", "knowledge", "health"];

/// Raw shape of an NPC reply as the model produces it.
#[derive(Debug, Deserialize)]
struct RawNpcReply {
    narrative: String,
    #[serde(default)]
    stats: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    flags: BTreeMap<String, bool>,
    #[serde(default)]
    affinity: i64,
    #[serde(default)]
    trust: i64,
    #[serde(default)]
    learned: Vec<String>,
}

/// Raw shape of a choices reply: either plain strings or objects with
/// a `text` field (the richer shape an older revision asked for).
#[derive(Debug, Deserialize)]
struct RawChoices {
    choices: Vec<RawChoice>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChoice {
    Plain(String),
    Structured {
        text: String,
    },
}

/// Parse a delegated NPC's structured reply.
pub fn parse_npc_reply(raw: &str) -> Result<NpcReply, BackendError> {
    let value = parse_json_payload(raw)?;
    let reply: RawNpcReply = serde_json::from_value(value).map_err(|e| BackendError::Parse {
        raw: String::from(raw),
        reason: format!("npc reply shape mismatch: {e}"),
    })?;

    let mut patch = StatPatch::default();
    for (key, value) in &reply.stats {
        let Some(delta) = value.as_i64() else {
            debug!(key, "non-integer stat value dropped");
            continue;
        };
        match key.as_str() {
            "reputation" => patch.reputation = Some(delta),
            "wealth" => patch.wealth = Some(delta),
            "strength" => patch.strength = Some(delta),
            "knowledge" => patch.knowledge = Some(delta),
            "health" => patch.health = Some(delta),
            other => {
                debug!(key = other, known = ?KNOWN_STAT_KEYS, "unknown stat key dropped");
            }
        }
    }
    patch.flags = reply.flags;

    Ok(NpcReply {
        narrative: reply.narrative,
        stats: patch,
        affinity_delta: reply.affinity,
        trust_delta: reply.trust,
        learned: reply.learned,
    })
}

/// Parse a choice-list reply, flattening structured choices to text.
pub fn parse_choices(raw: &str) -> Result<Vec<String>, BackendError> {
    let value = parse_json_payload(raw)?;
    let parsed: RawChoices = serde_json::from_value(value).map_err(|e| BackendError::Parse {
        raw: String::from(raw),
        reason: format!("choices shape mismatch: {e}"),
    })?;

    let choices: Vec<String> = parsed
        .choices
        .into_iter()
        .map(|choice| match choice {
            RawChoice::Plain(text) | RawChoice::Structured { text } => text,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    if choices.is_empty() {
        return Err(BackendError::Parse {
            raw: String::from(raw),
            reason: String::from("choice list is empty"),
        });
    }
    Ok(choices)
}

/// Extract a JSON value from raw model output.
pub fn parse_json_payload(raw: &str) -> Result<serde_json::Value, BackendError> {
    let trimmed = raw.trim();

    for candidate in candidates(trimmed) {
        if let Ok(value) = serde_json::from_str(&candidate) {
            return Ok(value);
        }
        let cleaned = strip_trailing_commas(&candidate);
        if let Ok(value) = serde_json::from_str(&cleaned) {
            return Ok(value);
        }
    }

    Err(BackendError::Parse {
        raw: String::from(raw),
        reason: String::from("no parse strategy produced valid JSON"),
    })
}

/// Candidate JSON substrings, in strategy order.
fn candidates(text: &str) -> Vec<String> {
    let mut list = vec![String::from(text)];
    if let Some(block) = extract_code_block(text) {
        list.push(String::from(block));
    }
    if let Some(object) = extract_outer_object(text) {
        list.push(String::from(object));
    }
    list
}

/// Pull the body out of a ```json fenced block (or a bare fence).
fn extract_code_block(text: &str) -> Option<&str> {
    let fence_start = text.find("```")?;
    let after_fence = text.get(fence_start.checked_add(3)?..)?;
    let body_start = after_fence.find('\n').and_then(|nl| nl.checked_add(1))?;
    let body = after_fence.get(body_start..)?;
    let end = body.find("```")?;
    body.get(..end).map(str::trim)
}

/// The outermost `{...}` span, for JSON buried in prose.
fn extract_outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    text.get(start..=end)
}

/// Drop commas that directly precede a closing brace or bracket.
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();

    let mut index = 0;
    while index < chars.len() {
        let current = chars.get(index).copied().unwrap_or(' ');
        if current == ',' {
            let mut lookahead = index.saturating_add(1);
            while chars.get(lookahead).is_some_and(|c| c.is_whitespace()) {
                lookahead = lookahead.saturating_add(1);
            }
            if matches!(chars.get(lookahead), Some('}' | ']')) {
                index = index.saturating_add(1);
                continue;
            }
        }
        result.push(current);
        index = index.saturating_add(1);
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn direct_json_parses() {
        let raw = r#"{"narrative": "承知した。", "stats": {"reputation": 5}, "affinity": 2}"#;
        let reply = parse_npc_reply(raw).unwrap();
        assert_eq!(reply.narrative, "承知した。");
        assert_eq!(reply.stats.reputation, Some(5));
        assert_eq!(reply.affinity_delta, 2);
    }

    #[test]
    fn fenced_json_parses() {
        let raw = "承知した。結果はこちら:\n```json\n{\"narrative\": \"うむ。\"}\n```\n以上。";
        let reply = parse_npc_reply(raw).unwrap();
        assert_eq!(reply.narrative, "うむ。");
    }

    #[test]
    fn json_buried_in_prose_parses() {
        let raw = "もちろんですわ。 {\"narrative\": \"星々は語ります。\"} ご参考まで。";
        let reply = parse_npc_reply(raw).unwrap();
        assert_eq!(reply.narrative, "星々は語ります。");
    }

    #[test]
    fn trailing_commas_recover() {
        let raw = r#"{"narrative": "ええで。", "stats": {"wealth": -100,},}"#;
        let reply = parse_npc_reply(raw).unwrap();
        assert_eq!(reply.stats.wealth, Some(-100));
    }

    #[test]
    fn unknown_stat_keys_are_dropped() {
        let raw = r#"{"narrative": "…", "stats": {"reputation": 3, "charisma": 9, "mana": 4}}"#;
        let reply = parse_npc_reply(raw).unwrap();
        assert_eq!(reply.stats.reputation, Some(3));
        // Unknown keys silently ignored, not errored.
        assert!(reply.stats.wealth.is_none());
        assert!(reply.stats.health.is_none());
    }

    #[test]
    fn non_integer_stat_values_are_dropped() {
        let raw = r#"{"narrative": "…", "stats": {"reputation": "とても上がる"}}"#;
        let reply = parse_npc_reply(raw).unwrap();
        assert!(reply.stats.is_empty());
    }

    #[test]
    fn garbage_is_a_tagged_parse_error() {
        let raw = "剣なら5本あるで。どれにするんや？";
        let error = parse_npc_reply(raw).unwrap_err();
        match error {
            BackendError::Parse { raw: preserved, .. } => {
                assert_eq!(preserved, raw);
            }
            other => assert!(false, "expected parse error, got {other}"),
        }
    }

    #[test]
    fn plain_choices_parse() {
        let raw = r#"{"choices": ["村長と相談する", "休む"]}"#;
        assert_eq!(parse_choices(raw).unwrap(), vec!["村長と相談する", "休む"]);
    }

    #[test]
    fn structured_choices_flatten() {
        let raw = r#"{"choices": [{"text": "交渉する"}, "立ち去る"]}"#;
        assert_eq!(parse_choices(raw).unwrap(), vec!["交渉する", "立ち去る"]);
    }

    #[test]
    fn empty_choice_list_is_a_parse_error() {
        let raw = r#"{"choices": []}"#;
        assert!(parse_choices(raw).is_err());
    }

    #[test]
    fn missing_narrative_is_a_shape_mismatch() {
        let raw = r#"{"stats": {"wealth": -10}}"#;
        assert!(parse_npc_reply(raw).is_err());
    }
}
