//! LLM trait definitions

use super::{ChatCompletion, ChatMessage, Provider};
use crate::error::Result;
use async_trait::async_trait;

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// A single upstream chat completion service
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send messages and return the normalized completion
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<ChatCompletion>;

    /// Provider this backend talks to
    fn provider(&self) -> Provider;

    /// Get model name
    fn model_name(&self) -> &str;
}
