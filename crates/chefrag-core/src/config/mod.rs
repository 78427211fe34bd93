//! Configuration management
//!
//! Settings live in a YAML file under the user's config directory. Anything the
//! file leaves out falls back to environment variables, then to built-in
//! defaults, so a bare `.env` with the three API keys is enough to run.

use crate::error::{ChefError, Result};
use crate::llm::{Provider, RetryPolicy, EVALUATION_PROVIDER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat completion providers
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Embedding service used to encode questions
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Vector index holding the dish records
    #[serde(default)]
    pub index: IndexConfig,

    /// Retry policy applied to provider calls by the CLI
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Request timeout in seconds for every upstream call
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            embedding: EmbeddingConfig::default(),
            index: IndexConfig::default(),
            retry: RetryPolicy::default(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ProviderOverrides")]
pub struct ProvidersConfig {
    pub openrouter: ProviderConfig,
    pub groq: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProviderOverrides::default().into()
    }
}

impl ProvidersConfig {
    pub fn get(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::OpenRouter => &self.openrouter,
            Provider::Groq => &self.groq,
        }
    }
}

/// Settings for one OpenAI-compatible chat endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ProviderConfig {
    /// API root, `/chat/completions` is appended
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    pub api_key: Option<String>,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Completion length cap; provider default when unset
    pub max_tokens: Option<u32>,
}

impl ProviderConfig {
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            base_url: provider.default_base_url().to_string(),
            model: provider.default_model().to_string(),
            api_key: std::env::var(provider.api_key_env()).ok(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// `providers` section as written in YAML; every field may be left out
#[derive(Default, Deserialize)]
#[serde(default)]
struct ProviderOverrides {
    openrouter: ProviderOverride,
    groq: ProviderOverride,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ProviderOverride {
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ProviderOverride {
    /// Fill the gaps from the environment and the provider's built-in defaults
    fn resolve(self, provider: Provider) -> ProviderConfig {
        let defaults = ProviderConfig::for_provider(provider);
        ProviderConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            model: self.model.unwrap_or(defaults.model),
            api_key: self.api_key.or(defaults.api_key),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl From<ProviderOverrides> for ProvidersConfig {
    fn from(raw: ProviderOverrides) -> Self {
        Self {
            openrouter: raw.openrouter.resolve(Provider::OpenRouter),
            groq: raw.groq.resolve(Provider::Groq),
        }
    }
}

/// Embedding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible embeddings service
    #[serde(default = "default_embedding_url")]
    pub url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Must match the dimension the index was built with
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: usize,

    #[serde(default = "env_embedding_api_key")]
    pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: default_embedding_url(),
            model: default_embedding_model(),
            dimensions: default_embedding_dimensions(),
            api_key: env_embedding_api_key(),
        }
    }
}

fn default_embedding_url() -> String {
    std::env::var("CHEFRAG_EMBEDDING_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn env_embedding_api_key() -> Option<String> {
    std::env::var("CHEFRAG_EMBEDDING_API_KEY").ok()
}

fn default_embedding_model() -> String {
    std::env::var("CHEFRAG_EMBEDDING_MODEL")
        .unwrap_or_else(|_| "sentence-transformers/all-MiniLM-L6-v2".to_string())
}

fn default_embedding_dimensions() -> usize {
    384
}

/// Pinecone index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index name, used to look up the data-plane host when `host` is unset
    #[serde(default = "default_index_name")]
    pub name: String,

    /// Data-plane host (`https://<index>-<project>.svc.<env>.pinecone.io`)
    #[serde(default = "env_index_host")]
    pub host: Option<String>,

    /// Control-plane API root
    #[serde(default = "default_control_plane")]
    pub control_plane_url: String,

    #[serde(default = "env_index_api_key")]
    pub api_key: Option<String>,

    #[serde(default = "env_index_namespace")]
    pub namespace: Option<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: default_index_name(),
            host: env_index_host(),
            control_plane_url: default_control_plane(),
            api_key: env_index_api_key(),
            namespace: env_index_namespace(),
        }
    }
}

fn default_index_name() -> String {
    std::env::var("PINECONE_INDEX").unwrap_or_else(|_| "semantic-search".to_string())
}

fn env_index_host() -> Option<String> {
    std::env::var("PINECONE_INDEX_HOST").ok()
}

fn env_index_api_key() -> Option<String> {
    std::env::var("PINECONE_API_KEY").ok()
}

fn env_index_namespace() -> Option<String> {
    std::env::var("PINECONE_NAMESPACE").ok()
}

fn default_control_plane() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load config from an explicit path; a missing file yields defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Check that everything needed to answer with `provider` is present.
    ///
    /// The evaluation provider is always required as well.
    pub fn validate_for(&self, provider: Provider) -> Result<()> {
        let mut missing = Vec::new();

        for p in [provider, EVALUATION_PROVIDER] {
            let key_missing = self
                .providers
                .get(p)
                .api_key
                .as_deref()
                .map_or(true, str::is_empty);
            if key_missing && !missing.contains(&p.api_key_env()) {
                missing.push(p.api_key_env());
            }
        }

        if self.index.api_key.as_deref().map_or(true, str::is_empty) {
            missing.push("PINECONE_API_KEY");
        }

        if self.embedding.dimensions == 0 {
            return Err(ChefError::Config(
                "embedding.dimensions must be greater than zero".to_string(),
            ));
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ChefError::Config(format!(
                "missing credentials: {}",
                missing.join(", ")
            )))
        }
    }
}
