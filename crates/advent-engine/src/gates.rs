//! Day-based and content-based gates for the optional media tasks.
//!
//! Image generation is expensive, so scenes are only illustrated every
//! third day plus fixed milestone days. Audio narration is gated by an
//! importance score computed from keyword presence, text length, and
//! how late in the countdown the turn falls.

/// Milestone days that always get a scene illustration.
const IMAGE_MILESTONE_DAYS: [u32; 7] = [1, 5, 10, 15, 20, 25, 30];

/// Keywords that mark a narration as climactic.
const HIGH_IMPORTANCE_KEYWORDS: [&str; 7] = ["魔王", "決戦", "最終", "勝利", "敗北", "死", "運命"];

/// Keywords that mark a narration as strategically relevant.
const MEDIUM_IMPORTANCE_KEYWORDS: [&str; 6] = ["準備", "仲間", "情報", "武器", "魔法", "戦略"];

/// Character length from which a narration counts as long.
const LONG_TEXT_THRESHOLD: usize = 120;

/// Day from which every narration gains urgency.
const LATE_GAME_DAY: u32 = 25;

/// Minimum importance score for audio synthesis.
pub const NARRATION_THRESHOLD: u32 = 3;

/// Whether a scene image should be generated on this day.
///
/// Every third day starting from day 1, plus the fixed milestones.
pub fn should_generate_image(day: u32) -> bool {
    day % 3 == 1 || IMAGE_MILESTONE_DAYS.contains(&day)
}

/// Importance of narrating a piece of text out loud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Importance {
    /// The computed score; compare against [`NARRATION_THRESHOLD`].
    pub score: u32,
    /// Human-readable justification, carried into the audio clip.
    pub reason: String,
}

impl Importance {
    /// True when the score clears the synthesis gate.
    pub const fn clears_gate(&self) -> bool {
        self.score >= NARRATION_THRESHOLD
    }
}

/// Score a narration: keyword tier, then length and late-game bonuses.
pub fn narration_importance(text: &str, day: u32) -> Importance {
    let (mut score, base_reason): (u32, &str) =
        if HIGH_IMPORTANCE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            (3, "重要な局面の語り")
        } else if MEDIUM_IMPORTANCE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            (2, "戦略的な内容の語り")
        } else {
            (1, "通常の語り")
        };

    if text.chars().count() >= LONG_TEXT_THRESHOLD {
        score = score.saturating_add(1);
    }
    if day >= LATE_GAME_DAY {
        score = score.saturating_add(1);
    }

    Importance {
        score,
        reason: format!("{base_reason}（Day {day}）"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_gate_opens_every_third_day() {
        assert!(should_generate_image(1));
        assert!(should_generate_image(4));
        assert!(should_generate_image(7));
        assert!(!should_generate_image(2));
        assert!(!should_generate_image(3));
    }

    #[test]
    fn image_gate_opens_on_milestones() {
        // 5, 15, 20 are not of the form 3k+1 but are milestones.
        assert!(should_generate_image(5));
        assert!(should_generate_image(15));
        assert!(should_generate_image(20));
        assert!(should_generate_image(30));
    }

    #[test]
    fn climactic_keywords_clear_the_gate_alone() {
        let importance = narration_importance("魔王が動き出した。", 2);
        assert_eq!(importance.score, 3);
        assert!(importance.clears_gate());
    }

    #[test]
    fn plain_short_text_stays_below_the_gate() {
        let importance = narration_importance("朝の市場は静かだった。", 2);
        assert_eq!(importance.score, 1);
        assert!(!importance.clears_gate());
    }

    #[test]
    fn medium_keyword_plus_late_game_clears_the_gate() {
        let importance = narration_importance("武器の手入れをした。", 26);
        assert_eq!(importance.score, 3);
        assert!(importance.clears_gate());
    }

    #[test]
    fn long_text_earns_a_bonus() {
        let long_text = "あ".repeat(150);
        let importance = narration_importance(&long_text, 2);
        assert_eq!(importance.score, 2);
    }
}
