//! OpenAI chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LlmError;
use crate::types::CompletionRequest;
use crate::CompletionModel;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";

/// Completions can take a while; this bounds a hung connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OpenAiConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `OPENAI_API_KEY` is not set.
    ///
    /// | Variable          | Required | Default                     |
    /// |-------------------|----------|-----------------------------|
    /// | `OPENAI_API_KEY`  | yes      | none                        |
    /// | `OPENAI_BASE_URL` | no       | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`    | no       | `gpt-4`                     |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self {
            api_key,
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }
}

pub struct OpenAiClient {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_payload(&self, request: &CompletionRequest) -> Result<Value, LlmError> {
        let mut payload =
            serde_json::to_value(request).map_err(|e| LlmError::Serialization(e.to_string()))?;
        if request.model.is_empty() {
            payload["model"] = Value::String(self.config.model.clone());
        }
        Ok(payload)
    }

    fn parse_reply(body: &Value) -> Result<String, LlmError> {
        let content = body
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("");

        if content.is_empty() {
            return Err(LlmError::EmptyReply);
        }
        Ok(content.to_string())
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let payload = self.build_payload(request)?;
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::from_status(status.as_u16(), &text));
        }

        let body: Value =
            serde_json::from_str(&text).map_err(|e| LlmError::Serialization(e.to_string()))?;
        let reply = Self::parse_reply(&body)?;
        tracing::debug!(model = %payload["model"], chars = reply.len(), "Completion received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::types::ChatMessage;

    fn client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(OpenAiConfig {
            api_key: "sk-test".into(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.into(),
        })
        .unwrap()
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        assert_eq!(
            client("https://api.openai.com/v1/").completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn payload_fills_default_model() {
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![ChatMessage::system("parse"), ChatMessage::user("CRM for 5000")],
            temperature: 0.3,
            max_tokens: 500,
        };
        let payload = client(DEFAULT_BASE_URL).build_payload(&request).unwrap();
        assert_eq!(payload["model"], "gpt-4");
        assert_eq!(payload["max_tokens"], 500);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "CRM for 5000");
    }

    #[test]
    fn reply_is_first_choice_content() {
        let body = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": " {\"product\":\"x\"} " } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        });
        assert_eq!(OpenAiClient::parse_reply(&body).unwrap(), "{\"product\":\"x\"}");
    }

    #[test]
    fn missing_content_is_empty_reply() {
        let body = serde_json::json!({ "choices": [] });
        assert_matches!(OpenAiClient::parse_reply(&body), Err(LlmError::EmptyReply));
    }
}
