use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::application::ports::{LlmClient, LlmClientError};

/// One logical model deployment: an OpenAI-compatible base URL plus the
/// model name to request against it.
#[derive(Debug, Clone)]
pub struct ModelEndpoint {
    pub model: String,
    pub api_base: String,
    pub api_key: String,
}

/// Chat-completions client against an OpenAI-compatible API. Requests a
/// JSON-object response at a fixed low temperature; the whole request is
/// bounded by the configured timeout.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    endpoint: ModelEndpoint,
    temperature: f32,
}

impl OpenAiChatClient {
    pub fn new(
        endpoint: ModelEndpoint,
        timeout: Duration,
        temperature: f32,
    ) -> Result<Self, LlmClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmClientError::ApiRequestFailed(format!("client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            temperature,
        })
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl LlmClient for OpenAiChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        let url = format!(
            "{}/chat/completions",
            self.endpoint.api_base.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.endpoint.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
            "response_format": {"type": "json_object"},
        });

        tracing::debug!(model = %self.endpoint.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.endpoint.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(format!("request: {}", e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmClientError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("no choices in response".to_string()))
    }
}
