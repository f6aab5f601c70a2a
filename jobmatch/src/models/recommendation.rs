use serde::{Deserialize, Serialize};

/// One job recommendation extracted from model output.
///
/// Serialized with the same display keys the model is asked to produce, so
/// JSON and CSV exports line up with the prompt's schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    #[serde(rename = "Job Title", default)]
    pub job_title: String,
    #[serde(rename = "Company", default)]
    pub company: String,
    #[serde(rename = "Match Reason", default)]
    pub match_reason: String,
    #[serde(rename = "Apply Link", default)]
    pub apply_link: String,
}

impl RecommendationRecord {
    pub fn has_apply_link(&self) -> bool {
        !self.apply_link.trim().is_empty()
    }
}

/// Result of interpreting raw model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The output contained a JSON array (possibly empty).
    Parsed(Vec<RecommendationRecord>),
    /// No JSON array could be recovered; the raw text is kept for display.
    Unparseable { raw: String },
}

impl ParseOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn records(&self) -> &[RecommendationRecord] {
        match self {
            Self::Parsed(records) => records,
            Self::Unparseable { .. } => &[],
        }
    }

    pub fn into_records(self) -> Vec<RecommendationRecord> {
        match self {
            Self::Parsed(records) => records,
            Self::Unparseable { .. } => Vec::new(),
        }
    }
}
