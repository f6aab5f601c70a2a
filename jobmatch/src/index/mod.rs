//! Document projection, index construction and nearest-neighbour retrieval.

mod document;
mod similarity;

pub use document::{project, project_all};
pub use similarity::{retrieve, DistanceMetric, ScoredDocument, SimilarityIndex, DEFAULT_TOP_K};

use std::sync::Arc;

use crate::embeddings::Embedder;
use crate::error::Result;
use crate::models::JobRecord;

/// Project `records` into documents and build a fresh index over them.
///
/// Fails with [`crate::error::JobMatchError::EmptyCorpus`] when `records` is empty.
pub async fn build_index(
    embedder: Arc<dyn Embedder>,
    records: &[JobRecord],
    metric: DistanceMetric,
) -> Result<SimilarityIndex> {
    SimilarityIndex::build(embedder, project_all(records), metric).await
}
