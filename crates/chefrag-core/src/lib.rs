//! Chefrag Core Library
//!
//! Retrieval-augmented question answering over a dish knowledge base.
//!
//! # Features
//! - Question embedding and vector index lookup with a relevance floor
//! - Grounded answers from OpenRouter or Groq through one gateway
//! - LLM self-evaluation of every generated answer
//! - SQLite conversation log with user feedback

pub mod assistant;
pub mod config;
pub mod db;
pub mod error;
pub mod evaluation;
pub mod llm;
pub mod prompt;
pub mod retrieval;

#[cfg(test)]
mod testing;

pub use assistant::{AnswerResult, Assistant, NO_CONTEXT_ANSWER};
pub use config::{Config, EmbeddingConfig, IndexConfig, ProviderConfig};
pub use db::{ConversationRecord, Database, FeedbackStats};
pub use error::{ChefError, Error, Result};
pub use evaluation::{Evaluation, Relevance, RelevanceEvaluator};
pub use llm::{
    ChatBackend, ChatMessage, Completion, Embedder, HttpEmbedder, LlmGateway, OpenAiCompatClient,
    Provider, RetryPolicy, TokenUsage, EVALUATION_PROVIDER,
};
pub use prompt::build_grounding_prompt;
pub use retrieval::{
    filter_matches, PineconeIndex, RetrievalMatch, Retriever, VectorIndex, DEFAULT_TOP_K,
    MIN_RELEVANCE_SCORE,
};

/// Default data directory name
pub const DATA_DIR_NAME: &str = "chefrag";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "chefrag";
