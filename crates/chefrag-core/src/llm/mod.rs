//! LLM integration
//!
//! Provides traits and implementations for:
//! - Question embedding via an external service
//! - Chat completions against OpenRouter and Groq
//! - Provider dispatch with timing and token accounting
//! - Retry of transient provider failures

mod client;
mod gateway;
mod http_embedder;
mod provider;
mod retry;
mod traits;
mod types;

pub use client::OpenAiCompatClient;
pub use gateway::LlmGateway;
pub use http_embedder::HttpEmbedder;
pub use provider::{Provider, EVALUATION_PROVIDER};
pub use retry::{RetryPolicy, RetryingBackend};
pub use traits::*;
pub use types::{ChatCompletion, ChatMessage, Completion, TokenUsage};
