//! Error types for chefrag

use crate::llm::Provider;
use thiserror::Error;

/// Result type alias using ChefError
pub type Result<T> = std::result::Result<T, ChefError>;

/// Error type alias for convenience
pub type Error = ChefError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
    pub const UPSTREAM: i32 = 4;
}

/// Main error type for chefrag
#[derive(Debug, Error)]
pub enum ChefError {
    /// Embedding or vector index call failed
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Language model provider call failed
    #[error("{provider} request failed{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Upstream {
        provider: Provider,
        status: Option<u16>,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ChefError {
    /// Build an upstream error without an HTTP status (transport, timeout, payload)
    pub fn upstream(provider: Provider, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider,
            status: None,
            message: message.into(),
        }
    }

    /// Build an upstream error for a payload that arrived but could not be used
    pub fn malformed(provider: Provider, detail: impl std::fmt::Display) -> Self {
        Self::upstream(provider, format!("{}: {}", MALFORMED_PREFIX, detail))
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Only upstream failures qualify: network errors and timeouts (no status),
    /// 408, 429 and 5xx. Auth failures and other client errors never do.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Upstream {
                status: Some(code), ..
            } => *code == 408 || *code == 429 || *code >= 500,
            Self::Upstream {
                status: None,
                message,
                ..
            } => !message.starts_with(MALFORMED_PREFIX),
            _ => false,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => exit_codes::NOT_FOUND,
            Self::UnknownProvider(_) | Self::InvalidInput(_) | Self::Config(_) => {
                exit_codes::INVALID_INPUT
            }
            Self::Upstream { .. } | Self::Retrieval(_) => exit_codes::UPSTREAM,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}

/// Message prefix marking a response that arrived but could not be understood
pub(crate) const MALFORMED_PREFIX: &str = "malformed response";
