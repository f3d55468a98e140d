use std::time::Duration;

use matchvision_models::{ChatMessage, GatewayError};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub const DEFAULT_AI_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "google/gemini-3-flash-preview";

#[derive(Debug, Clone)]
pub struct AiGatewayConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AiGatewayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_AI_GATEWAY_URL.to_string(),
            api_key: None,
            model: DEFAULT_AI_MODEL.to_string(),
            timeout: Duration::from_secs(90),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: PromptRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: PromptRole::User, content: content.into() }
    }
}

impl From<&ChatMessage> for PromptMessage {
    fn from(message: &ChatMessage) -> Self {
        let role = if message.is_assistant() { PromptRole::Assistant } else { PromptRole::User };
        Self { role, content: message.content.clone() }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct AiGatewayClient {
    client: Client,
    config: AiGatewayConfig,
}

impl AiGatewayClient {
    pub fn new(client: Client, config: AiGatewayConfig) -> Self {
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Non-streaming completion. Returns the first choice's text, empty when the model sent none.
    pub async fn complete(&self, messages: &[PromptMessage]) -> Result<String, GatewayError> {
        let response = self.send(messages, false).await?;
        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default())
    }

    /// Streaming completion. The caller owns the event-stream body.
    pub async fn stream(&self, messages: &[PromptMessage]) -> Result<Response, GatewayError> {
        self.send(messages, true).await
    }

    async fn send(&self, messages: &[PromptMessage], stream: bool) -> Result<Response, GatewayError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(GatewayError::MissingCredential("AI_GATEWAY_API_KEY"))?;

        debug!("🤖 AI gateway request: model={} messages={} stream={}", self.config.model, messages.len(), stream);

        let mut request = self
            .client
            .post(&self.config.url)
            .bearer_auth(api_key)
            .json(&CompletionRequest { model: &self.config.model, messages, stream });
        if !stream {
            request = request.timeout(self.config.timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let err = GatewayError::from_ai_status(status.as_u16());
            if matches!(err, GatewayError::UpstreamStatus { .. }) {
                let text = response.text().await.unwrap_or_default();
                error!("❌ AI gateway error: {} {}", status, text);
            }
            return Err(err);
        }

        Ok(response)
    }
}
