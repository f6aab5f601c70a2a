use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::corpus::{normalize, JobSource};
use crate::embeddings::Embedder;
use crate::error::{JobMatchError, Result};
use crate::index::{build_index, SimilarityIndex};
use crate::llm::{prompts::job_recommendation_prompt, LlmProvider};
use crate::models::{JobDocument, JobRecord, ParseOutcome};
use crate::profile::truncate_chars;
use crate::recommend::parse_recommendation_outcome;

/// Outcome of one recommend action.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub outcome: ParseOutcome,
    /// Documents that were shown to the model, best match first.
    pub retrieved: Vec<JobDocument>,
}

/// Per-session pipeline state: the loaded corpus and the index built over it.
///
/// Sessions share nothing; concurrent users each own one.
pub struct JobSession {
    embedder: Arc<dyn Embedder>,
    retrieval: RetrievalConfig,
    corpus: Vec<JobRecord>,
    index: Option<SimilarityIndex>,
}

impl JobSession {
    pub fn new(embedder: Arc<dyn Embedder>, retrieval: RetrievalConfig) -> Self {
        Self {
            embedder,
            retrieval,
            corpus: Vec::new(),
            index: None,
        }
    }

    /// Normalize `source` and index it, replacing the current corpus.
    ///
    /// On error the previous corpus and index stay in place.
    pub async fn load_jobs(&mut self, source: JobSource) -> Result<usize> {
        let records = normalize(source)?;
        self.load_records(records).await
    }

    pub async fn load_records(&mut self, records: Vec<JobRecord>) -> Result<usize> {
        let index = build_index(Arc::clone(&self.embedder), &records, self.retrieval.metric).await?;

        tracing::info!(jobs = records.len(), indexed = index.len(), "Loaded job corpus");

        self.corpus = records;
        self.index = Some(index);

        Ok(self.corpus.len())
    }

    /// Nearest documents to `query`; `k` defaults to the configured top-k.
    pub async fn retrieve(&self, query: &str, k: Option<usize>) -> Result<Vec<JobDocument>> {
        let k = k.unwrap_or(self.retrieval.top_k);
        crate::index::retrieve(self.index.as_ref(), query, k).await
    }

    /// Render retrieved documents as the job listing handed to the model.
    pub fn retrieved_context(&self, documents: &[JobDocument]) -> String {
        let joined = documents
            .iter()
            .map(|document| document.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        truncate_chars(&joined, self.retrieval.max_context_chars).to_string()
    }

    /// Retrieve jobs for `profile`, ask the model to rank them and parse its
    /// answer.
    pub async fn recommend(
        &self,
        profile: &str,
        llm: &LlmProvider,
        k: Option<usize>,
    ) -> Result<Recommendation> {
        if profile.trim().is_empty() {
            return Err(JobMatchError::Validation(
                "Provide at least one of skills, experience, preferences or a resume".to_string(),
            ));
        }

        let retrieved = self.retrieve(profile, k).await?;
        let context = self.retrieved_context(&retrieved);
        let prompt = job_recommendation_prompt(profile, &context);

        tracing::info!(
            retrieved = retrieved.len(),
            context_chars = context.chars().count(),
            "Requesting job recommendations"
        );

        let raw = llm.complete(&prompt).await?;
        let outcome = parse_recommendation_outcome(&raw);

        match &outcome {
            ParseOutcome::Parsed(records) => {
                tracing::info!(recommendations = records.len(), "Parsed recommendations");
            }
            ParseOutcome::Unparseable { .. } => {
                tracing::warn!("Model returned output that could not be parsed as recommendations");
            }
        }

        Ok(Recommendation { outcome, retrieved })
    }
}
