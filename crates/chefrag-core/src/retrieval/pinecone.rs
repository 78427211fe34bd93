//! Pinecone data-plane client

use super::{RetrievalMatch, VectorIndex};
use crate::config::IndexConfig;
use crate::error::{ChefError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_VERSION: &str = "2024-07";

/// Queries a Pinecone serverless or pod index over REST
pub struct PineconeIndex {
    http_client: reqwest::Client,
    host: String,
    api_key: String,
    namespace: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RetrievalMatch>,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

impl PineconeIndex {
    /// Connect to the index described by `config`.
    ///
    /// When no data-plane host is configured it is looked up once through the
    /// control plane by index name.
    pub async fn connect(config: &IndexConfig, timeout_secs: u64) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ChefError::Config("PINECONE_API_KEY is not set".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        let host = match config.host {
            Some(ref host) => normalize_host(host),
            None => describe_host(&http_client, config, &api_key).await?,
        };

        tracing::debug!("Using Pinecone index {} at {}", config.name, host);

        Ok(Self {
            http_client,
            host,
            api_key,
            namespace: config.namespace.clone(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

async fn describe_host(
    http_client: &reqwest::Client,
    config: &IndexConfig,
    api_key: &str,
) -> Result<String> {
    let url = format!(
        "{}/indexes/{}",
        config.control_plane_url.trim_end_matches('/'),
        config.name
    );

    let response = http_client
        .get(&url)
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
        .send()
        .await
        .map_err(|e| ChefError::Retrieval(format!("Index lookup failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ChefError::Retrieval(format!(
            "Index lookup for '{}' failed (HTTP {}): {}",
            config.name, status, body
        )));
    }

    let described: DescribeIndexResponse = response
        .json()
        .await
        .map_err(|e| ChefError::Retrieval(format!("Bad index description: {}", e)))?;

    Ok(normalize_host(&described.host))
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .http_client
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChefError::Retrieval(format!("Index query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChefError::Retrieval(format!(
                "Index query failed (HTTP {}): {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| ChefError::Retrieval(format!("Bad index response: {}", e)))?;

        Ok(parsed.matches)
    }
}
