use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::JobSearchConfig;
use crate::error::{JobMatchError, Result};
use crate::http::send_with_retry;
use crate::models::JobRecord;

// Provider field names differ between job boards; the first non-empty alias wins.
const TITLE_KEYS: &[&str] = &["title", "jobTitle", "job_title", "positionName"];
const COMPANY_KEYS: &[&str] = &["company", "companyName", "company_name", "employer_name"];
const DESCRIPTION_KEYS: &[&str] = &[
    "description",
    "descriptionText",
    "job_description",
    "snippet",
];
const LOCATION_KEYS: &[&str] = &["location", "jobLocation", "job_location", "job_city"];
const TYPE_KEYS: &[&str] = &[
    "type",
    "employmentType",
    "contractType",
    "job_employment_type",
];
const LINK_KEYS: &[&str] = &["link", "applyUrl", "jobUrl", "url", "job_apply_link"];
const EXPERIENCE_KEYS: &[&str] = &["experience", "experienceLevel", "seniorityLevel"];
const SKILLS_KEYS: &[&str] = &["skills", "job_required_skills"];
const SALARY_KEYS: &[&str] = &["salary", "salaryInfo", "job_salary"];

/// Keys under which providers commonly wrap their result array.
const RESULT_WRAPPER_KEYS: &[&str] = &["data", "items", "results", "jobs"];

/// Map one provider result item onto a [`JobRecord`].
///
/// Never fails: missing or unusable fields become empty strings.
pub fn record_from_search_item(item: &Value) -> JobRecord {
    JobRecord {
        title: lookup(item, TITLE_KEYS),
        company: lookup(item, COMPANY_KEYS),
        description: lookup(item, DESCRIPTION_KEYS),
        location: lookup(item, LOCATION_KEYS),
        job_type: lookup(item, TYPE_KEYS),
        link: lookup(item, LINK_KEYS),
        experience: lookup(item, EXPERIENCE_KEYS),
        skills: lookup(item, SKILLS_KEYS),
        salary: lookup(item, SALARY_KEYS),
    }
}

fn lookup(item: &Value, keys: &[&str]) -> String {
    let Some(object) = item.as_object() else {
        return String::new();
    };

    keys.iter()
        .filter_map(|key| object.get(*key))
        .map(value_to_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Render a loosely-typed JSON value as display text.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => String::new(),
    }
}

/// Pull the result list out of a provider response body.
pub fn extract_result_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut object) => RESULT_WRAPPER_KEYS
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Serialize)]
struct JobSearchRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    limit: usize,
}

/// HTTP client for an external job-search provider.
#[derive(Clone)]
pub struct JobSearchClient {
    client: Client,
    config: JobSearchConfig,
    url: Url,
}

impl JobSearchClient {
    pub fn new(config: JobSearchConfig) -> Result<Self> {
        let url = Url::parse(&config.url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JobMatchError::JobSearch(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            url,
        })
    }

    /// Search the provider and return its raw result items.
    pub async fn search(&self, query: &str, location: Option<&str>) -> Result<Vec<Value>> {
        if query.trim().is_empty() {
            return Err(JobMatchError::Validation(
                "Job search query cannot be empty".to_string(),
            ));
        }

        let request = JobSearchRequest {
            query: query.trim(),
            location: location.map(str::trim).filter(|l| !l.is_empty()),
            limit: self.config.max_results,
        };

        let response = send_with_retry(
            self.config.max_retries,
            || {
                let builder = self.client.post(self.url.clone()).json(&request);
                match &self.config.api_key {
                    Some(api_key) => builder.bearer_auth(api_key),
                    None => builder,
                }
            },
            JobMatchError::JobSearch,
        )
        .await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| JobMatchError::JobSearch(format!("Failed to parse response: {e}")))?;
        let mut items = extract_result_items(body);
        items.truncate(self.config.max_results);
        tracing::info!(query = %request.query, results = items.len(), "Job search completed");
        Ok(items)
    }
}
