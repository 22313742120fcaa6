//! Scene illustration via an image-generation endpoint.

use advent_engine::{BackendError, ImageBackend};
use async_trait::async_trait;
use tracing::info;

/// Client for xAI-style `POST {api_url}/images/generations`.
pub struct ImageClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ImageClient {
    /// Build a client for the endpoint.
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: String::from(api_url),
            api_key: String::from(api_key),
            model: String::from(model),
        }
    }
}

#[async_trait]
impl ImageBackend for ImageClient {
    async fn scene_image(&self, prompt: &str, day: u32) -> Result<Option<String>, BackendError> {
        let url = format!("{}/images/generations", self.api_url);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": format!("fantasy RPG scene: {prompt}"),
            "n": 1,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Upstream(format!("image request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unable to read error body"));
            return Err(BackendError::Upstream(format!(
                "image endpoint returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::Upstream(format!("image response body unreadable: {e}")))?;

        let image_url = json
            .get("data")
            .and_then(|d| d.get(0))
            .and_then(|entry| entry.get("url"))
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned);

        if let Some(url) = &image_url {
            info!(day, url, "scene image generated");
        }
        Ok(image_url)
    }
}
