//! Retry with exponential backoff for transient provider failures.
//!
//! Rate limits, 5xx responses and dropped connections are retried; auth
//! failures and unusable payloads are returned immediately.

use super::{ChatBackend, ChatCompletion, ChatMessage, Provider};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 disables retrying).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each subsequent one.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for any single delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Add up to 50% random jitter to each delay.
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    4_000
}

fn default_jitter() -> bool {
    true
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2_u64.saturating_pow(attempt));
        let delay = exponential.min(self.max_delay_ms);

        if self.jitter && delay > 0 {
            Duration::from_millis(delay + fastrand::u64(0..=delay / 2))
        } else {
            Duration::from_millis(delay)
        }
    }
}

/// Chat backend decorator applying a [`RetryPolicy`]
pub struct RetryingBackend<B> {
    inner: B,
    policy: RetryPolicy,
}

impl<B: ChatBackend> RetryingBackend<B> {
    pub fn new(inner: B, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<B: ChatBackend> ChatBackend for RetryingBackend<B> {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<ChatCompletion> {
        let mut attempt = 0;
        loop {
            match self.inner.chat_completion(messages.clone()).await {
                Ok(completion) => return Ok(completion),
                Err(err) if err.is_transient() && attempt < self.policy.max_retries => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        "{} attempt {} failed, retrying in {:?}: {}",
                        self.inner.provider(),
                        attempt + 1,
                        delay,
                        err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn provider(&self) -> Provider {
        self.inner.provider()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
