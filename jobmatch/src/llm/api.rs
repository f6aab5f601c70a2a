use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};
use reqwest::StatusCode;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{JobMatchError, Result};
use crate::http::{default_base_url, retry_schedule, wait_before_retry};

/// Providers served from the local machine, which take no API key.
const KEYLESS_PROVIDERS: &[&str] = &["ollama", "lmstudio", "local"];

/// What to do with a failed completion attempt.
enum Failure {
    Retry(JobMatchError),
    Fatal(JobMatchError),
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub(crate) struct LlmApiClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    max_retries: u32,
}

impl LlmApiClient {
    pub(crate) fn new(config: &LlmConfig) -> Result<Self> {
        let (provider, model) = parse_llm_provider_model(&config.model);
        let provider = provider.to_lowercase();

        if !KEYLESS_PROVIDERS.contains(&provider.as_str()) && config.api_key.is_none() {
            return Err(JobMatchError::Llm(
                "API key required for this provider (set LLM_API_KEY)".to_string(),
            ));
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(&provider).to_string());
        let openai_config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(config.api_key.clone().unwrap_or_default());

        let timeout = Duration::from_secs(config.timeout_secs);
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JobMatchError::Llm(format!("Failed to create LLM HTTP client: {e}")))?;

        // async-openai retries 5xx internally; bound that by the request timeout.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(timeout),
            ..Default::default()
        };

        Ok(Self {
            client: Client::with_config(openai_config)
                .with_http_client(http_client)
                .with_backoff(backoff),
            model: model.to_string(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    pub(crate) async fn complete(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(JobMatchError::Validation(
                "Prompt cannot be empty".to_string(),
            ));
        }

        let request = self.build_request(prompt)?;
        let mut schedule = retry_schedule();
        let mut attempt = 0;

        loop {
            let error = match self.client.chat().create(request.clone()).await {
                Ok(response) => {
                    let content = extract_content(response)?;
                    tracing::debug!(model = %self.model, response_len = content.len(), "LLM completion received");
                    return Ok(content);
                }
                Err(error) => error,
            };

            match classify(error) {
                Failure::Retry(error) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, %error, "Retrying LLM completion");
                    wait_before_retry(&mut schedule).await;
                }
                Failure::Retry(error) | Failure::Fatal(error) => return Err(error),
            }
        }
    }

    fn build_request(&self, prompt: &str) -> Result<CreateChatCompletionRequest> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| JobMatchError::Validation(format!("Invalid user prompt: {e}")))?;

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(self.model.clone()).messages(vec![message.into()]);
        if let Some(temperature) = self.temperature {
            request.temperature(temperature);
        }

        request
            .build()
            .map_err(|e| JobMatchError::Validation(format!("Invalid LLM completion request: {e}")))
    }
}

fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| JobMatchError::Llm("LLM response contained no choices".to_string()))?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(JobMatchError::Llm(
            "LLM response contained empty content".to_string(),
        ));
    }

    Ok(content)
}

/// Sort an async-openai error into retryable and fatal failures.
///
/// Rate limits and authentication problems are fatal. Transport errors, 5xx
/// statuses and untyped API errors are retried.
fn classify(error: OpenAIError) -> Failure {
    match error {
        OpenAIError::Reqwest(e) => match e.status() {
            Some(StatusCode::TOO_MANY_REQUESTS) => {
                Failure::Fatal(JobMatchError::LlmRateLimit { retry_after: None })
            }
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => Failure::Fatal(
                JobMatchError::Llm(format!("LLM authentication failed: {e}")),
            ),
            Some(status) if !status.is_server_error() => {
                Failure::Fatal(JobMatchError::Llm(format!("LLM request failed: {e}")))
            }
            _ => Failure::Retry(JobMatchError::Llm(format!("LLM request failed: {e}"))),
        },
        OpenAIError::ApiError(e) => {
            let tags = ApiErrorTags::from(&e);
            if tags.is_rate_limit() {
                Failure::Fatal(JobMatchError::LlmRateLimit { retry_after: None })
            } else if tags.is_auth() {
                Failure::Fatal(JobMatchError::Llm(format!("LLM authentication failed: {e}")))
            } else if e.r#type.is_none() && e.code.is_none() {
                Failure::Retry(JobMatchError::Llm(format!("LLM API error: {e}")))
            } else {
                Failure::Fatal(JobMatchError::Llm(format!("LLM API error: {e}")))
            }
        }
        OpenAIError::JSONDeserialize(e) => Failure::Fatal(JobMatchError::Llm(format!(
            "Failed to parse LLM response: {e}"
        ))),
        OpenAIError::InvalidArgument(message) => Failure::Fatal(JobMatchError::Validation(message)),
        other => Failure::Fatal(JobMatchError::Llm(other.to_string())),
    }
}

/// Lower-cased message, type and code of a provider error body.
struct ApiErrorTags {
    message: String,
    kind: String,
    code: String,
}

impl From<&ApiError> for ApiErrorTags {
    fn from(error: &ApiError) -> Self {
        Self {
            message: error.message.to_lowercase(),
            kind: error.r#type.as_deref().unwrap_or_default().to_lowercase(),
            code: error.code.as_deref().unwrap_or_default().to_lowercase(),
        }
    }
}

impl ApiErrorTags {
    fn is_rate_limit(&self) -> bool {
        self.message.contains("rate limit")
            || self.message.contains("too many requests")
            || self.kind.contains("rate_limit")
            || self.code.contains("rate_limit")
            || self.code == "insufficient_quota"
    }

    fn is_auth(&self) -> bool {
        ["unauthorized", "forbidden", "authentication", "invalid api key"]
            .iter()
            .any(|needle| self.message.contains(needle))
            || self.code.contains("invalid_api_key")
            || self.code.contains("authentication")
            || self.kind.contains("authentication")
    }
}
