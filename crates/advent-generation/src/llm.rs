//! Chat-completion access with enum dispatch.
//!
//! Async trait methods are not dyn-compatible without boxing, so the
//! two supported wire protocols sit behind an enum instead of a trait
//! object. The story backend does not care which model answers -- it
//! sends a system/user prompt pair and expects text back.

use advent_engine::BackendError;

use crate::config::{BackendKind, LlmEndpoint};
use crate::prompt::RenderedPrompt;

/// Per-call generation parameters.
#[derive(Debug, Clone, Copy)]
pub struct CompletionParams {
    /// Sampling temperature.
    pub temperature: f64,
    /// Response length cap in tokens.
    pub max_tokens: u32,
}

/// A chat endpoint that can complete a prompt.
pub enum LlmBackend {
    /// OpenAI-compatible chat completions (xAI Grok, `OpenAI`, Ollama).
    OpenAi(ChatCompletionsClient),
    /// Anthropic Messages API.
    Anthropic(MessagesClient),
}

impl LlmBackend {
    /// Build a backend from an endpoint configuration.
    pub fn from_endpoint(endpoint: &LlmEndpoint) -> Self {
        match endpoint.kind {
            BackendKind::OpenAi => Self::OpenAi(ChatCompletionsClient::new(endpoint)),
            BackendKind::Anthropic => Self::Anthropic(MessagesClient::new(endpoint)),
        }
    }

    /// Send a prompt and return the raw response text.
    pub async fn complete(
        &self,
        prompt: &RenderedPrompt,
        params: CompletionParams,
    ) -> Result<String, BackendError> {
        match self {
            Self::OpenAi(client) => client.complete(prompt, params).await,
            Self::Anthropic(client) => client.complete(prompt, params).await,
        }
    }

    /// Short protocol name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible protocol
// ---------------------------------------------------------------------------

/// Client for `{api_url}/chat/completions` endpoints.
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsClient {
    /// Build a client for the endpoint.
    pub fn new(endpoint: &LlmEndpoint) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: endpoint.api_url.clone(),
            api_key: endpoint.api_key.clone(),
            model: endpoint.model.clone(),
        }
    }

    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        params: CompletionParams,
    ) -> Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.api_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Upstream(format!("chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unable to read error body"));
            return Err(BackendError::Upstream(format!(
                "chat endpoint returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::Upstream(format!("chat response body unreadable: {e}")))?;

        extract_chat_content(&json)
    }
}

/// Pull `choices[0].message.content` out of a chat completion.
fn extract_chat_content(json: &serde_json::Value) -> Result<String, BackendError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            BackendError::Upstream(String::from(
                "chat response missing choices[0].message.content",
            ))
        })
}

// ---------------------------------------------------------------------------
// Anthropic Messages protocol
// ---------------------------------------------------------------------------

/// Client for the Anthropic Messages API.
///
/// Differs from the chat-completions shape: `x-api-key` header, system
/// prompt as a top-level field, and the text under `content[0].text`.
pub struct MessagesClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl MessagesClient {
    /// Build a client for the endpoint.
    pub fn new(endpoint: &LlmEndpoint) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: endpoint.api_url.clone(),
            api_key: endpoint.api_key.clone(),
            model: endpoint.model.clone(),
        }
    }

    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        params: CompletionParams,
    ) -> Result<String, BackendError> {
        let url = format!("{}/messages", self.api_url);
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Upstream(format!("messages request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unable to read error body"));
            return Err(BackendError::Upstream(format!(
                "messages endpoint returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| {
                BackendError::Upstream(format!("messages response body unreadable: {e}"))
            })?;

        extract_messages_content(&json)
    }
}

/// Pull `content[0].text` out of a Messages API response.
fn extract_messages_content(json: &serde_json::Value) -> Result<String, BackendError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| BackendError::Upstream(String::from("messages response missing content[0].text")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn extract_chat_content_valid() {
        let json = serde_json::json!({
            "choices": [{"message": {"content": "村は朝靄に包まれていた。"}}]
        });
        assert_eq!(
            extract_chat_content(&json).unwrap(),
            "村は朝靄に包まれていた。"
        );
    }

    #[test]
    fn extract_chat_content_missing_choices() {
        let json = serde_json::json!({"error": "rate_limit"});
        assert!(extract_chat_content(&json).is_err());
    }

    #[test]
    fn extract_messages_content_valid() {
        let json = serde_json::json!({
            "content": [{"type": "text", "text": "{\"choices\": []}"}]
        });
        assert_eq!(extract_messages_content(&json).unwrap(), "{\"choices\": []}");
    }

    #[test]
    fn extract_messages_content_empty() {
        let json = serde_json::json!({"content": []});
        assert!(extract_messages_content(&json).is_err());
    }

    #[test]
    fn backend_dispatch_names() {
        let endpoint = LlmEndpoint {
            kind: BackendKind::OpenAi,
            api_url: String::from("https://api.x.ai/v1"),
            api_key: String::from("test"),
            model: String::from("grok-3-mini"),
        };
        assert_eq!(LlmBackend::from_endpoint(&endpoint).name(), "openai-compatible");

        let endpoint = LlmEndpoint {
            kind: BackendKind::Anthropic,
            ..endpoint
        };
        assert_eq!(LlmBackend::from_endpoint(&endpoint).name(), "anthropic");
    }
}
