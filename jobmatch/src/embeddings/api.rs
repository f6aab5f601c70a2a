use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{JobMatchError, Result};
use crate::http::send_with_retry;

/// Connection settings for an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// Client for OpenAI-compatible `/embeddings` endpoints.
#[derive(Clone)]
pub struct EmbeddingApiClient {
    client: Client,
    config: ApiConfig,
    url: String,
}

impl EmbeddingApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JobMatchError::Embedding(format!("Failed to create HTTP client: {e}")))?;
        let url = format!("{}/embeddings", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            config,
            url,
        })
    }

    /// Embed `texts` in one request, returning vectors in input order.
    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let response = send_with_retry(
            self.config.max_retries,
            || {
                let builder = self.client.post(&self.url).json(&request);
                match &self.config.api_key {
                    Some(api_key) => builder.bearer_auth(api_key),
                    None => builder,
                }
            },
            JobMatchError::Embedding,
        )
        .await?;

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| JobMatchError::Embedding(format!("Failed to parse response: {e}")))?;

        order_embeddings(body.data, texts.len())
    }
}

/// Restore input order when the provider reports per-item indices, and make
/// sure exactly one vector came back per input.
fn order_embeddings(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(JobMatchError::Embedding(format!(
            "Expected {expected} embeddings, received {}",
            data.len()
        )));
    }

    if data.iter().all(|d| d.index.is_some()) {
        data.sort_by_key(|d| d.index);
    }

    Ok(data.into_iter().map(|d| d.embedding).collect())
}
