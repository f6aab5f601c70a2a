use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{JobMatchError, Result};
use crate::llm::api::LlmApiClient;

enum Backend {
    Ready(LlmApiClient),
    Unavailable(String),
}

/// Language model used to rank retrieved postings.
///
/// Constructing a provider never fails. A missing model, an unknown provider
/// without a base URL, or a hosted provider without an API key leaves it
/// unavailable, and [`LlmProvider::complete`] reports the reason.
pub struct LlmProvider {
    backend: Backend,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided (set LLM_MODEL)");
        };

        let (provider, _) = parse_llm_provider_model(&config.model);
        if provider.eq_ignore_ascii_case("local") && config.base_url.is_none() {
            return Self::unavailable(&format!(
                "Unknown provider in model: {} (set LLM_BASE_URL)",
                config.model
            ));
        }

        match LlmApiClient::new(config) {
            Ok(client) => Self {
                backend: Backend::Ready(client),
            },
            Err(error) => Self::unavailable(&error.to_string()),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: Backend::Unavailable(reason.to_string()),
        }
    }

    /// Why the provider cannot complete prompts, or `None` when it can.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            Backend::Ready(_) => None,
            Backend::Unavailable(reason) => Some(reason),
        }
    }

    /// Send a single-turn prompt and return the raw text of the reply.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        match &self.backend {
            Backend::Ready(client) => client.complete(prompt).await,
            Backend::Unavailable(reason) => Err(JobMatchError::LlmUnavailable(reason.clone())),
        }
    }
}
