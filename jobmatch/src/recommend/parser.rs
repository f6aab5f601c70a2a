use serde_json::Value;

use crate::corpus::value_to_text;
use crate::models::{ParseOutcome, RecommendationRecord};

const JOB_TITLE_KEY: &str = "Job Title";
const COMPANY_KEY: &str = "Company";
const MATCH_REASON_KEY: &str = "Match Reason";
const APPLY_LINK_KEY: &str = "Apply Link";

/// Interpret raw model output as a list of recommendations.
///
/// The whole text is tried as a JSON array first. Failing that (bad JSON or a
/// non-array top level), the span from the first `[` to the last `]` is tried
/// with the same array check. If neither yields an array the raw text is
/// handed back as [`ParseOutcome::Unparseable`].
pub fn parse_recommendation_outcome(raw: &str) -> ParseOutcome {
    let elements = match parse_array(raw.trim()) {
        Some(elements) => elements,
        None => match bracketed_span(raw).and_then(parse_array) {
            Some(elements) => {
                tracing::debug!("Recovered recommendation array from surrounding text");
                elements
            }
            None => {
                tracing::warn!(
                    raw_len = raw.len(),
                    preview = %raw.chars().take(100).collect::<String>(),
                    "Model output did not contain a JSON array"
                );
                return ParseOutcome::Unparseable {
                    raw: raw.to_string(),
                };
            }
        },
    };

    ParseOutcome::Parsed(elements.iter().filter_map(record_from_element).collect())
}

/// Best-effort parse that never fails: unparseable output yields no records.
///
/// An empty result is ambiguous between "nothing recommended" and "could not
/// parse"; use [`parse_recommendation_outcome`] to tell them apart.
pub fn parse_recommendations(raw: &str) -> Vec<RecommendationRecord> {
    parse_recommendation_outcome(raw).into_records()
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str(text) {
        Ok(Value::Array(elements)) => Some(elements),
        _ => None,
    }
}

fn bracketed_span(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (end > start).then(|| &raw[start..=end])
}

fn record_from_element(element: &Value) -> Option<RecommendationRecord> {
    let object = element.as_object()?;
    let field = |key: &str| object.get(key).map(value_to_text).unwrap_or_default();

    Some(RecommendationRecord {
        job_title: field(JOB_TITLE_KEY),
        company: field(COMPANY_KEY),
        match_reason: field(MATCH_REASON_KEY),
        apply_link: field(APPLY_LINK_KEY),
    })
}
