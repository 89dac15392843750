//! Chat completion client speaking the OpenAI completions protocol
//!
//! Works with Groq, Ollama, vLLM, or any endpoint exposing
//! `/chat/completions`. Requests are not retried; a failure propagates to
//! the caller untouched.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Completion request failed: {0}")]
    Request(String),

    #[error("Completion service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Completion service returned no content")]
    EmptyResponse,
}

/// One role-tagged message in a completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request shape of the completion service boundary
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// Trait for completion backends
///
/// Any service mapping a (model, messages, temperature) request to one
/// completion string is substitutable here; tests use a deterministic stub.
pub trait CompletionClient: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

/// Blocking HTTP client for an OpenAI-compatible completion endpoint
pub struct GroqClient {
    client: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
}

impl GroqClient {
    /// Build a client, resolving the API key from `api_key_env`
    pub fn new(
        api_base: &str,
        api_key_env: &str,
        timeout_secs: u64,
    ) -> Result<Self, CompletionError> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| CompletionError::MissingApiKey(api_key_env.to_string()))?;

        // Generation calls can run for many seconds
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CompletionError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

impl CompletionClient for GroqClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.to_string())
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let resp: ChatResponse = response
            .json()
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let text = resp
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let result = GroqClient::new("https://api.groq.com/openai/v1", "KURSO_TEST_UNSET_KEY", 10);
        assert!(matches!(result, Err(CompletionError::MissingApiKey(_))));
    }

    #[test]
    fn test_request_serialization() {
        let request = CompletionRequest {
            model: "llama3-8b-8192".to_string(),
            messages: vec![
                ChatMessage::system("You are a helpful academic assistant."),
                ChatMessage::user("hello"),
            ],
            temperature: 0.5,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3-8b-8192");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["temperature"], 0.5);
    }
}
