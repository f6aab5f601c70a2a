use serde::Deserialize;
use std::env;

use crate::index::DistanceMetric;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub embeddings: EmbeddingsConfig,
    pub retrieval: RetrievalConfig,
    pub profile: ProfileConfig,
    pub llm: Option<LlmConfig>,
    pub job_search: Option<JobSearchConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    pub model: String,
    pub batch_size: usize,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
    /// Upper bound on the retrieved-jobs text handed to the LLM.
    pub max_context_chars: usize,
    pub metric: DistanceMetric,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    pub max_resume_chars: usize,
}

/// LLM configuration for chat/completion models
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub temperature: Option<f32>,
}

/// External job-search provider used to populate the corpus on demand
#[derive(Debug, Clone, Deserialize)]
pub struct JobSearchConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub max_results: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            max_context_chars: 5000,
            metric: DistanceMetric::L2,
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            max_resume_chars: crate::profile::DEFAULT_MAX_RESUME_CHARS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embeddings: EmbeddingsConfig {
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "sentence-transformers/all-MiniLM-L6-v2".to_string()),
                batch_size: parse_env_or("EMBEDDING_BATCH_SIZE", 256),
                api_key: env::var("EMBEDDING_API_KEY").ok(),
                base_url: env::var("EMBEDDING_BASE_URL").ok(),
                timeout_secs: parse_env_or("EMBEDDING_TIMEOUT", 30),
                max_retries: parse_env_or("EMBEDDING_MAX_RETRIES", 3),
            },
            retrieval: RetrievalConfig {
                top_k: parse_env_or("RETRIEVAL_TOP_K", 10),
                max_context_chars: parse_env_or("RETRIEVAL_MAX_CONTEXT_CHARS", 5000),
                metric: parse_env_or("RETRIEVAL_METRIC", DistanceMetric::L2),
            },
            profile: ProfileConfig {
                max_resume_chars: parse_env_or(
                    "MAX_RESUME_CHARS",
                    crate::profile::DEFAULT_MAX_RESUME_CHARS,
                ),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 60),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 3),
                temperature: parse_env_opt("LLM_TEMPERATURE").or(Some(0.5)),
            }),
            job_search: env::var("JOB_SEARCH_URL").ok().map(|url| JobSearchConfig {
                url,
                api_key: env::var("JOB_SEARCH_API_KEY").ok(),
                timeout_secs: parse_env_or("JOB_SEARCH_TIMEOUT", 120),
                max_retries: parse_env_or("JOB_SEARCH_MAX_RETRIES", 2),
                max_results: parse_env_or("JOB_SEARCH_MAX_RESULTS", 50),
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known embedding providers that use OpenAI-compatible APIs
const KNOWN_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio", "local"];

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse a model name into (provider, model) tuple.
pub fn parse_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        // Check if prefix is a known provider
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to local provider
    ("local", model)
}

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}
