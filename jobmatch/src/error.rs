use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobMatchError {
    #[error("CSV missing required column: {column}")]
    Schema { column: String },

    #[error("Cannot build an index over an empty job corpus")]
    EmptyCorpus,

    #[error("No job index has been built yet; load jobs first")]
    IndexNotReady,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Job search error: {0}")]
    JobSearch(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("API rate limit exceeded, retry after {retry_after:?} seconds")]
    ApiRateLimit { retry_after: Option<u64> },

    #[error("API authentication error: {0}")]
    ApiAuth(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },
}

impl JobMatchError {
    pub fn schema(column: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JobMatchError>;
