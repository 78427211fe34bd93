//! Question retrieval against the dish vector index
//!
//! The question is embedded, the index is asked for its nearest neighbours and
//! anything at or below [`MIN_RELEVANCE_SCORE`] is dropped. The index's own
//! ordering is kept as-is.

mod pinecone;

pub use pinecone::PineconeIndex;

use crate::error::{ChefError, Result};
use crate::llm::Embedder;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Matches must score strictly above this to be used as context
pub const MIN_RELEVANCE_SCORE: f32 = 0.2;

/// Number of neighbours requested from the index
pub const DEFAULT_TOP_K: usize = 5;

/// A single metadata value stored alongside a dish vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<String>),
}

impl MetadataValue {
    /// Null, blank text, `false`, zero and empty lists carry no information
    pub fn is_present(&self) -> bool {
        match self {
            MetadataValue::Null => false,
            MetadataValue::Bool(b) => *b,
            MetadataValue::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
            MetadataValue::Text(s) => !s.trim().is_empty(),
            MetadataValue::List(items) => !items.is_empty(),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Null => Ok(()),
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Number(n) => write!(f, "{}", n),
            MetadataValue::Text(s) => f.write_str(s),
            MetadataValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

/// Record fields keyed by name; sorted so rendering is stable
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A neighbour returned by the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Nearest-neighbour query interface of a vector index
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` matches in descending score order
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>>;
}

/// Keep only matches scoring strictly above [`MIN_RELEVANCE_SCORE`], in their original order
pub fn filter_matches(matches: Vec<RetrievalMatch>) -> Vec<RetrievalMatch> {
    matches
        .into_iter()
        .filter(|m| m.score > MIN_RELEVANCE_SCORE)
        .collect()
}

fn into_retrieval_error(err: ChefError) -> ChefError {
    match err {
        ChefError::Retrieval(_) => err,
        other => ChefError::Retrieval(other.to_string()),
    }
}

/// Embeds questions and queries the index
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Find context for `question`; an empty result is a valid answer
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<RetrievalMatch>> {
        let vector = self
            .embedder
            .embed(question)
            .await
            .map_err(into_retrieval_error)?;

        let matches = self
            .index
            .query(&vector, top_k, true)
            .await
            .map_err(into_retrieval_error)?;

        let returned = matches.len();
        let kept = filter_matches(matches);

        tracing::debug!(
            "Retrieved {} matches, {} above {}",
            returned,
            kept.len(),
            MIN_RELEVANCE_SCORE
        );

        Ok(kept)
    }
}
