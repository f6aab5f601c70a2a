use serde::{Deserialize, Serialize};

/// Canonical representation of one job posting.
///
/// Every field is always present; optional source columns default to the
/// empty string rather than being modelled as `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub job_type: String,
    pub link: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub salary: String,
}

/// Metadata carried alongside an embedded job document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub title: String,
    pub company: String,
    pub link: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary: String,
}

impl JobMetadata {
    /// Look up a metadata value by its field name.
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "company" => Some(&self.company),
            "link" => Some(&self.link),
            "location" => Some(&self.location),
            "type" => Some(&self.job_type),
            "salary" => Some(&self.salary),
            _ => None,
        }
    }
}

impl From<&JobRecord> for JobMetadata {
    fn from(record: &JobRecord) -> Self {
        Self {
            title: record.title.clone(),
            company: record.company.clone(),
            link: record.link.clone(),
            location: record.location.clone(),
            job_type: record.job_type.clone(),
            salary: record.salary.clone(),
        }
    }
}

/// Embeddable projection of a [`JobRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDocument {
    /// Pipe-delimited concatenation of the record's non-empty fields.
    pub content: String,
    pub metadata: JobMetadata,
}
