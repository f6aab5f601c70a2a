use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::embeddings::Embedder;
use crate::error::{JobMatchError, Result};
use crate::models::JobDocument;

/// Number of documents returned by a retrieval when the caller has no preference.
pub const DEFAULT_TOP_K: usize = 10;

/// Distance used to rank documents against a query; smaller is closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Squared Euclidean distance.
    #[default]
    L2,
    /// One minus cosine similarity.
    Cosine,
}

impl DistanceMetric {
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::L2 => a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum(),
            Self::Cosine => {
                let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    return 1.0;
                }
                1.0 - dot / (norm_a * norm_b)
            }
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "l2" | "euclidean" => Ok(Self::L2),
            "cosine" => Ok(Self::Cosine),
            other => Err(format!(
                "unknown distance metric '{other}' (expected l2 or cosine)"
            )),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L2 => write!(f, "l2"),
            Self::Cosine => write!(f, "cosine"),
        }
    }
}

/// A retrieved document together with its distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: JobDocument,
    pub distance: f32,
}

/// Brute-force nearest-neighbour index over embedded job documents.
///
/// Immutable once built. The embedder that produced the document vectors is
/// kept so queries are always embedded with the same model.
pub struct SimilarityIndex {
    documents: Vec<JobDocument>,
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
    metric: DistanceMetric,
    embedder: Arc<dyn Embedder>,
}

impl fmt::Debug for SimilarityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityIndex")
            .field("documents", &self.documents.len())
            .field("dimensions", &self.dimensions)
            .field("metric", &self.metric)
            .field("model", &self.embedder.model_name())
            .finish()
    }
}

impl SimilarityIndex {
    /// Embed every document in one batch and index the resulting vectors.
    pub async fn build(
        embedder: Arc<dyn Embedder>,
        documents: Vec<JobDocument>,
        metric: DistanceMetric,
    ) -> Result<Self> {
        if documents.is_empty() {
            return Err(JobMatchError::EmptyCorpus);
        }

        let contents = documents
            .iter()
            .map(|document| document.content.clone())
            .collect::<Vec<_>>();
        let vectors = embedder.embed_documents(&contents).await?;

        if vectors.len() != documents.len() {
            return Err(JobMatchError::Embedding(format!(
                "Embedder returned {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let dimensions = vectors.first().map(Vec::len).unwrap_or_default();
        if dimensions == 0 || vectors.iter().any(|v| v.len() != dimensions) {
            return Err(JobMatchError::Embedding(
                "Embedder returned vectors of inconsistent dimensions".to_string(),
            ));
        }

        tracing::info!(
            documents = documents.len(),
            dimensions,
            %metric,
            model = %embedder.model_name(),
            "Built job similarity index"
        );

        Ok(Self {
            documents,
            vectors,
            dimensions,
            metric,
            embedder,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The `k` nearest documents to `query` with their distances, best first.
    ///
    /// `k` is clamped to the corpus size; equal distances keep corpus order.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        let query_vector = self.embedder.embed_query(query).await?;
        if query_vector.len() != self.dimensions {
            return Err(JobMatchError::Embedding(format!(
                "Query embedding has {} dimensions, index expects {}",
                query_vector.len(),
                self.dimensions
            )));
        }

        let mut ranked = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, self.metric.distance(&query_vector, vector)))
            .collect::<Vec<_>>();
        // sort_by is stable, so ties stay in corpus order
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let k = k.min(self.documents.len());
        tracing::debug!(k, corpus = self.documents.len(), "Retrieved nearest job documents");

        Ok(ranked
            .into_iter()
            .take(k)
            .map(|(position, distance)| ScoredDocument {
                document: self.documents[position].clone(),
                distance,
            })
            .collect())
    }

    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<JobDocument>> {
        Ok(self
            .search(query, k)
            .await?
            .into_iter()
            .map(|scored| scored.document)
            .collect())
    }
}

/// Retrieve from an index that may not have been built yet.
pub async fn retrieve(
    index: Option<&SimilarityIndex>,
    query: &str,
    k: usize,
) -> Result<Vec<JobDocument>> {
    let index = index.ok_or(JobMatchError::IndexNotReady)?;
    index.retrieve(query, k).await
}
