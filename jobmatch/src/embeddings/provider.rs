use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};

use crate::config::{parse_provider_model, EmbeddingsConfig};
use crate::embeddings::api::{ApiConfig, EmbeddingApiClient};
use crate::embeddings::Embedder;
use crate::error::{JobMatchError, Result};
use crate::http::default_base_url;

#[derive(Clone)]
enum EmbeddingBackend {
    Local {
        model: Arc<Mutex<TextEmbedding>>,
        batch_size: usize,
    },
    Api {
        client: EmbeddingApiClient,
        batch_size: usize,
    },
}

/// Embedding model selected from configuration: a local fastembed model or
/// an OpenAI-compatible HTTP endpoint.
#[derive(Clone)]
pub struct EmbeddingProvider {
    backend: EmbeddingBackend,
    model_name: String,
}

impl EmbeddingProvider {
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        let (provider, model_name) = parse_provider_model(&config.model);

        if provider.eq_ignore_ascii_case("local") {
            Self::new_local(config, model_name)
        } else {
            Self::new_api(config, provider, model_name)
        }
    }

    fn new_local(config: &EmbeddingsConfig, model_name: &str) -> Result<Self> {
        let embedding_model = resolve_embedding_model(model_name);
        tracing::info!(model = model_name, "Loading local embedding model");
        let model = TextEmbedding::try_new(
            InitOptions::new(embedding_model).with_show_download_progress(true),
        )
        .map_err(|e| JobMatchError::Embedding(e.to_string()))?;

        Ok(Self {
            backend: EmbeddingBackend::Local {
                model: Arc::new(Mutex::new(model)),
                batch_size: config.batch_size.max(1),
            },
            model_name: model_name.to_string(),
        })
    }

    fn new_api(config: &EmbeddingsConfig, provider: &str, model_name: &str) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        let client = EmbeddingApiClient::new(ApiConfig {
            base_url,
            api_key: config.api_key.clone(),
            model: model_name.to_string(),
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        })?;
        tracing::info!(provider, model = model_name, "Using embeddings API");

        Ok(Self {
            backend: EmbeddingBackend::Api {
                client,
                batch_size: config.batch_size.max(1),
            },
            model_name: model_name.to_string(),
        })
    }

    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        match &self.backend {
            EmbeddingBackend::Local { model, batch_size } => {
                let model = Arc::clone(model);
                let batch_size = *batch_size;
                tokio::task::spawn_blocking(move || {
                    let mut model = model.lock().map_err(|e| {
                        JobMatchError::Embedding(format!("Embedding model lock poisoned: {e}"))
                    })?;
                    model
                        .embed(texts, Some(batch_size))
                        .map_err(|e| JobMatchError::Embedding(e.to_string()))
                })
                .await
                .map_err(|e| JobMatchError::Embedding(format!("Embedding worker failed: {e}")))?
            }
            EmbeddingBackend::Api { client, batch_size } => {
                let mut all_embeddings = Vec::with_capacity(texts.len());
                for batch in texts.chunks(*batch_size) {
                    let inputs = batch.iter().map(String::as_str).collect::<Vec<_>>();
                    let mut embedded = client.embed(&inputs).await?;
                    all_embeddings.append(&mut embedded);
                }
                Ok(all_embeddings)
            }
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingProvider {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        tracing::debug!(
            documents = texts.len(),
            model = %self.model_name,
            "Embedding job documents"
        );
        self.embed(texts.to_vec()).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| JobMatchError::Embedding("No embedding generated".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn resolve_embedding_model(model_name: &str) -> EmbeddingModel {
    match model_name {
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
        "BAAI/bge-large-en-v1.5" | "bge-large-en-v1.5" => EmbeddingModel::BGELargeENV15,
        "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
            EmbeddingModel::AllMiniLML6V2
        }
        "all-MiniLM-L12-v2" | "sentence-transformers/all-MiniLM-L12-v2" => {
            EmbeddingModel::AllMiniLML12V2
        }
        "nomic-embed-text-v1.5" | "nomic-ai/nomic-embed-text-v1.5" => {
            EmbeddingModel::NomicEmbedTextV15
        }
        other => {
            tracing::warn!(
                "Unknown local embedding model '{}', falling back to all-MiniLM-L6-v2",
                other
            );
            EmbeddingModel::AllMiniLML6V2
        }
    }
}
