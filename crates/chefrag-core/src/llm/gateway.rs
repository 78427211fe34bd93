//! Provider dispatch for chat completions
//!
//! The gateway owns exactly one backend per [`Provider`] variant and routes each
//! prompt with a `match`, so an unsupported provider cannot be represented once
//! the name has been parsed.

use super::{ChatBackend, ChatMessage, Completion, OpenAiCompatClient, Provider, RetryingBackend};
use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;
use std::time::Instant;

/// Routes prompts to the backend of the requested provider
#[derive(Clone)]
pub struct LlmGateway {
    openrouter: Arc<dyn ChatBackend>,
    groq: Arc<dyn ChatBackend>,
}

impl LlmGateway {
    /// Create from explicit backends
    pub fn new(openrouter: Arc<dyn ChatBackend>, groq: Arc<dyn ChatBackend>) -> Self {
        debug_assert_eq!(openrouter.provider(), Provider::OpenRouter);
        debug_assert_eq!(groq.provider(), Provider::Groq);
        Self { openrouter, groq }
    }

    /// Build HTTP backends for every provider, wrapped in the configured retry policy
    pub fn from_config(config: &Config) -> Result<Self> {
        let build = |provider: Provider| -> Result<Arc<dyn ChatBackend>> {
            let client = OpenAiCompatClient::new(
                provider,
                config.providers.get(provider).clone(),
                config.timeout_secs,
            )?;
            let backend: Arc<dyn ChatBackend> = if config.retry.max_retries > 0 {
                Arc::new(RetryingBackend::new(client, config.retry.clone()))
            } else {
                Arc::new(client)
            };
            Ok(backend)
        };

        Ok(Self::new(build(Provider::OpenRouter)?, build(Provider::Groq)?))
    }

    fn backend(&self, provider: Provider) -> &dyn ChatBackend {
        match provider {
            Provider::OpenRouter => self.openrouter.as_ref(),
            Provider::Groq => self.groq.as_ref(),
        }
    }

    /// Model identifier a provider will be asked for
    pub fn model_for(&self, provider: Provider) -> &str {
        self.backend(provider).model_name()
    }

    /// Send `prompt` as a single user message and time the round trip
    pub async fn complete(&self, prompt: &str, provider: Provider) -> Result<Completion> {
        let backend = self.backend(provider);

        let start = Instant::now();
        let completion = backend
            .chat_completion(vec![ChatMessage::user(prompt)])
            .await?;
        let elapsed_secs = start.elapsed().as_secs_f64();

        tracing::debug!(
            provider = %provider,
            model = backend.model_name(),
            elapsed_secs,
            total_tokens = completion.usage.total_tokens,
            "completion received"
        );

        Ok(Completion {
            text: completion.text,
            usage: completion.usage,
            elapsed_secs,
        })
    }

    /// Like [`complete`](Self::complete), taking the provider as a caller-supplied name.
    ///
    /// Unrecognized names fail with `UnknownProvider` before any backend is touched.
    pub async fn complete_by_name(&self, prompt: &str, provider: &str) -> Result<Completion> {
        let provider: Provider = provider.parse()?;
        self.complete(prompt, provider).await
    }
}
