//! HTTP-based embedder using an external embeddings service

use super::Embedder;
use crate::config::EmbeddingConfig;
use crate::error::{ChefError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Embedder that calls an OpenAI-compatible `/v1/embeddings` endpoint
pub struct HttpEmbedder {
    http_client: reqwest::Client,
    config: EmbeddingConfig,
}

impl HttpEmbedder {
    /// Create from configuration
    pub fn new(config: EmbeddingConfig, timeout_secs: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            config,
        })
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

fn first_embedding(response: EmbedResponse, expected_dims: usize) -> Result<Vec<f32>> {
    let embedding = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ChefError::Retrieval("No embedding returned".to_string()))?
        .embedding;

    if embedding.len() != expected_dims {
        return Err(ChefError::Retrieval(format!(
            "Embedding has {} dimensions, expected {}",
            embedding.len(),
            expected_dims
        )));
    }

    Ok(embedding)
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: &self.config.model,
            input: vec![text],
        };

        let url = format!("{}/v1/embeddings", self.config.url.trim_end_matches('/'));

        let mut req = self.http_client.post(&url).json(&request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req
            .send()
            .await
            .map_err(|e| ChefError::Retrieval(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChefError::Retrieval(format!(
                "Embedding service error (HTTP {}): {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| ChefError::Retrieval(format!("Bad embedding response: {}", e)))?;

        first_embedding(embed_response, self.config.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
