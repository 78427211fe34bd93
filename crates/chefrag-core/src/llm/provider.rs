//! Chat completion providers selectable by the caller

use crate::error::ChefError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream chat completion provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenRouter,
    Groq,
}

/// Provider used for every relevance evaluation, regardless of who answered
pub const EVALUATION_PROVIDER: Provider = Provider::Groq;

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenRouter, Provider::Groq];

    /// Name used on the command line, in config and in the conversation log
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::Groq => "groq",
        }
    }

    /// Model requested when the config does not override it
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "meta-llama/llama-3.1-8b-instruct:free",
            Provider::Groq => "llama-3.1-70b-versatile",
        }
    }

    /// OpenAI-compatible API root
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ChefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Ok(Provider::OpenRouter),
            "groq" => Ok(Provider::Groq),
            _ => Err(ChefError::UnknownProvider(s.to_string())),
        }
    }
}
