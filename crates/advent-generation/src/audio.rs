//! Spoken narration via an AIVIS-style TTS endpoint.
//!
//! Voices are tuned per character, and the narration style tightens as
//! the countdown runs down: day 1 reads neutrally, day 30 reads like
//! the end of the world.

use advent_engine::{AudioBackend, BackendError};
use advent_types::AudioClip;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::info;

/// A character's voice settings.
struct VoiceProfile {
    model_uuid: &'static str,
    style_id: u32,
    speed: f64,
    pitch: f64,
}

/// The narrator's voice: every turn's integrated narrative is read in
/// this voice; per-character dialogue voices are a frontend concern.
const NARRATOR_VOICE: VoiceProfile = VoiceProfile {
    model_uuid: "default-jp-001",
    style_id: 0,
    speed: 1.0,
    pitch: 1.0,
};

/// Emotion style thresholds by day: the highest entry at or below the
/// current day wins.
const DAY_EMOTION_STEPS: [(u32, u32); 8] = [
    (1, 0),
    (5, 1),
    (10, 1),
    (15, 2),
    (20, 3),
    (25, 4),
    (29, 5),
    (30, 6),
];

/// Client for `POST {api_url}/v1/tts/synthesize`.
pub struct TtsClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl TtsClient {
    /// Build a client for the endpoint.
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: String::from(api_url),
            api_key: String::from(api_key),
        }
    }

    /// The emotion style for a given day.
    fn emotion_for_day(day: u32) -> u32 {
        let mut emotion = 0;
        for (threshold, style) in DAY_EMOTION_STEPS {
            if day >= threshold {
                emotion = style;
            }
        }
        emotion
    }
}

#[async_trait]
impl AudioBackend for TtsClient {
    async fn synthesize(
        &self,
        text: &str,
        day: u32,
        reason: &str,
    ) -> Result<Option<AudioClip>, BackendError> {
        let url = format!("{}/v1/tts/synthesize", self.api_url);
        let emotion = Self::emotion_for_day(day);
        let body = serde_json::json!({
            "model_uuid": NARRATOR_VOICE.model_uuid,
            "text": text,
            "style_id": emotion.max(NARRATOR_VOICE.style_id),
            "speed": NARRATOR_VOICE.speed,
            "pitch": NARRATOR_VOICE.pitch,
            "output_format": "mp3",
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Upstream(format!("tts request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unable to read error body"));
            return Err(BackendError::Upstream(format!(
                "tts endpoint returned {status}: {error_body}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Upstream(format!("tts audio body unreadable: {e}")))?;
        if bytes.is_empty() {
            return Ok(None);
        }

        info!(day, bytes = bytes.len(), "narration synthesized");
        Ok(Some(AudioClip {
            data: BASE64.encode(&bytes),
            reason: String::from(reason),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_tightens_with_the_countdown() {
        assert_eq!(TtsClient::emotion_for_day(1), 0);
        assert_eq!(TtsClient::emotion_for_day(4), 0);
        assert_eq!(TtsClient::emotion_for_day(12), 1);
        assert_eq!(TtsClient::emotion_for_day(22), 3);
        assert_eq!(TtsClient::emotion_for_day(29), 5);
        assert_eq!(TtsClient::emotion_for_day(30), 6);
    }
}
