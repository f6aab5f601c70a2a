//! Retry plumbing shared by the HTTP collaborators (embeddings API, job search).

use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use reqwest::{RequestBuilder, Response, StatusCode};

use crate::error::{JobMatchError, Result};

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(100);
pub(crate) const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Base URL of an OpenAI-compatible provider when none is configured.
pub(crate) fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "lmstudio" => "http://localhost:1234/v1",
        _ => "https://api.openai.com/v1",
    }
}

/// Doubling delays from 100ms, capped at [`MAX_RETRY_DELAY`], without jitter.
pub(crate) fn retry_schedule() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_initial_interval(INITIAL_RETRY_DELAY)
        .with_multiplier(2.0)
        .with_randomization_factor(0.0)
        .with_max_interval(MAX_RETRY_DELAY)
        .with_max_elapsed_time(None)
        .build()
}

/// Sleep before the next attempt according to `schedule`.
pub(crate) async fn wait_before_retry(schedule: &mut ExponentialBackoff) {
    let delay = schedule.next_backoff().unwrap_or(MAX_RETRY_DELAY);
    tokio::time::sleep(delay).await;
}

/// Send the request built by `build` until it succeeds or `max_retries` is spent.
///
/// 429 and 5xx responses and transport failures are retried; 401/403 fail at
/// once with [`JobMatchError::ApiAuth`]; any other status fails at once.
/// `error` wraps messages in the caller's error variant.
pub(crate) async fn send_with_retry(
    max_retries: u32,
    build: impl Fn() -> RequestBuilder,
    error: fn(String) -> JobMatchError,
) -> Result<Response> {
    let mut schedule = retry_schedule();
    let mut last_error = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            wait_before_retry(&mut schedule).await;
        }

        let response = match build().send().await {
            Ok(response) => response,
            Err(e) => {
                last_error = Some(error(format!("Request failed: {e}")));
                continue;
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            tracing::warn!(attempt, ?retry_after, "Rate limited, retrying");
            last_error = Some(JobMatchError::ApiRateLimit { retry_after });
            continue;
        }

        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(JobMatchError::ApiAuth(body));
        }

        if status.is_server_error() {
            tracing::warn!(attempt, %status, "Server error, retrying");
            last_error = Some(error(format!("Server error {status}: {body}")));
            continue;
        }

        return Err(error(format!("API error {status}: {body}")));
    }

    Err(last_error.unwrap_or_else(|| error("Unknown error".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_retry_schedule_doubles_then_caps() {
        let mut schedule = retry_schedule();
        let delays = (0..12)
            .map(|_| schedule.next_backoff().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(delays[0], Duration::from_millis(100));
        assert_eq!(delays[1], Duration::from_millis(200));
        assert_eq!(delays[2], Duration::from_millis(400));
        assert!(delays.iter().all(|d| *d <= MAX_RETRY_DELAY));
        assert_eq!(delays[11], MAX_RETRY_DELAY);
    }

    #[test]
    fn test_retry_schedule_never_runs_out() {
        let mut schedule = retry_schedule();
        for _ in 0..1000 {
            assert!(schedule.next_backoff().unwrap() <= MAX_RETRY_DELAY);
        }
    }

    #[test]
    fn test_default_base_urls() {
        assert_eq!(default_base_url("OpenRouter"), "https://openrouter.ai/api/v1");
        assert_eq!(default_base_url("ollama"), "http://localhost:11434/v1");
        assert_eq!(default_base_url("anything-else"), "https://api.openai.com/v1");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad input"))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/thing", server.uri());
        let err = send_with_retry(3, || client.post(&url), JobMatchError::JobSearch)
            .await
            .unwrap_err();

        assert!(matches!(err, JobMatchError::JobSearch(ref msg) if msg.contains("422")));
    }

    #[tokio::test]
    async fn test_rate_limit_is_reported_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .expect(2)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/thing", server.uri());
        let err = send_with_retry(1, || client.post(&url), JobMatchError::Embedding)
            .await
            .unwrap_err();

        assert!(matches!(err, JobMatchError::ApiRateLimit { retry_after: Some(3) }));
    }
}
