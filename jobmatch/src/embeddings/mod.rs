//! Text embedding backends.
//!
//! The index and retriever only depend on [`Embedder`]; the same instance
//! must be used to embed the corpus and the queries run against it.

mod api;
mod provider;


use async_trait::async_trait;

use crate::error::Result;

pub use api::{ApiConfig, EmbeddingApiClient};
pub use provider::EmbeddingProvider;

/// Capability to turn text into fixed-dimension vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of documents, returning one vector per input in order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Identifier of the underlying model, used in logs.
    fn model_name(&self) -> &str;
}
