//! HTTP client for OpenAI-compatible chat completion services (OpenRouter, Groq)

use super::{ChatBackend, ChatCompletion, ChatMessage, Provider, TokenUsage};
use crate::config::ProviderConfig;
use crate::error::{ChefError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat client for one provider's `/chat/completions` endpoint
pub struct OpenAiCompatClient {
    http_client: reqwest::Client,
    provider: Provider,
    config: ProviderConfig,
}

impl OpenAiCompatClient {
    /// Create new client from configuration
    pub fn new(provider: Provider, config: ProviderConfig, timeout_secs: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            provider,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn transport_error(&self, err: reqwest::Error) -> ChefError {
        ChefError::Upstream {
            provider: self.provider,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<UsageBody>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsageBody {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

/// Turn a raw response body into text and usage
fn normalize_response(provider: Provider, body: &str) -> Result<ChatCompletion> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ChefError::malformed(provider, e))?;

    let text = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ChefError::malformed(provider, "no choices in response"))?
        .message
        .content
        .ok_or_else(|| ChefError::malformed(provider, "choice has no message content"))?;

    let usage = match response.usage {
        Some(u) => TokenUsage::new(u.prompt_tokens, u.completion_tokens, u.total_tokens),
        None => {
            tracing::warn!("{} response carried no usage block, recording zeros", provider);
            TokenUsage::default()
        }
    };

    Ok(ChatCompletion { text, usage })
}

#[async_trait]
impl ChatBackend for OpenAiCompatClient {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<ChatCompletion> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut req = self.http_client.post(self.endpoint()).json(&request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        tracing::debug!("POST {} (model {})", self.endpoint(), self.config.model);

        let response = req.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChefError::Upstream {
                provider: self.provider,
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        normalize_response(self.provider, &body)
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
