//! Job normalization: adapt tabular and search-provider job data into
//! canonical [`JobRecord`]s.

mod search;
mod table;

pub use search::{extract_result_items, record_from_search_item, JobSearchClient};
pub(crate) use search::value_to_text;
pub use table::JobTable;

use serde_json::Value;

use crate::error::{JobMatchError, Result};
use crate::models::JobRecord;

/// Columns a tabular source must provide.
pub const REQUIRED_COLUMNS: &[&str] = &["title", "company", "description", "link"];

/// Columns read when present; absent ones default to empty strings.
pub const OPTIONAL_COLUMNS: &[&str] = &["location", "type", "experience", "skills", "salary"];

/// Where a batch of loosely-typed job entries came from.
#[derive(Debug, Clone)]
pub enum JobSource {
    /// Row/column data such as an uploaded CSV.
    Table(JobTable),
    /// Result items returned by an external job-search provider.
    SearchResults(Vec<Value>),
}

/// Convert a job source into canonical records, preserving source order.
pub fn normalize(source: JobSource) -> Result<Vec<JobRecord>> {
    match source {
        JobSource::Table(table) => normalize_table(&table),
        JobSource::SearchResults(items) => Ok(normalize_search_results(&items)),
    }
}

/// Normalize a table. Fails with [`JobMatchError::Schema`] naming the first
/// required column that is absent.
pub fn normalize_table(table: &JobTable) -> Result<Vec<JobRecord>> {
    let mut required = [0usize; 4];
    for (slot, column) in required.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = table
            .column_index(column)
            .ok_or_else(|| JobMatchError::schema(*column))?;
    }
    let [title, company, description, link] = required;

    let location = table.column_index("location");
    let job_type = table.column_index("type");
    let experience = table.column_index("experience");
    let skills = table.column_index("skills");
    let salary = table.column_index("salary");

    let records = table
        .rows
        .iter()
        .map(|row| {
            let cell = |index: Option<usize>| {
                index
                    .and_then(|i| row.get(i))
                    .cloned()
                    .unwrap_or_default()
            };

            JobRecord {
                title: cell(Some(title)),
                company: cell(Some(company)),
                description: cell(Some(description)),
                location: cell(location),
                job_type: cell(job_type),
                link: cell(Some(link)),
                experience: cell(experience),
                skills: cell(skills),
                salary: cell(salary),
            }
        })
        .collect::<Vec<_>>();

    tracing::info!(jobs = records.len(), "Normalized tabular job source");
    Ok(records)
}

/// Normalize search-provider results. Absent fields are empty; never fails.
pub fn normalize_search_results(items: &[Value]) -> Vec<JobRecord> {
    let records = items
        .iter()
        .map(record_from_search_item)
        .collect::<Vec<_>>();

    tracing::info!(jobs = records.len(), "Normalized job search results");
    records
}

/// A small built-in corpus for trying the pipeline without a data source.
pub fn sample_jobs() -> Vec<JobRecord> {
    vec![
        JobRecord {
            title: "Data Analyst".to_string(),
            company: "ABC Corp".to_string(),
            description: "Work on dashboards and analytics. Requires Python, SQL, Tableau. Location: Bangalore. Remote possible.".to_string(),
            location: "Bangalore".to_string(),
            job_type: "Full-time".to_string(),
            link: "https://example.com/abc-analyst".to_string(),
            ..Default::default()
        },
        JobRecord {
            title: "Machine Learning Engineer".to_string(),
            company: "XYZ Tech".to_string(),
            description: "Design NLP pipelines using Python and TensorFlow. Location: Mumbai.".to_string(),
            location: "Mumbai".to_string(),
            job_type: "Full-time".to_string(),
            link: "https://example.com/xyz-ml".to_string(),
            ..Default::default()
        },
        JobRecord {
            title: "Business Analyst".to_string(),
            company: "QRS Solutions".to_string(),
            description: "Stakeholder analytics, SQL, Power BI. Location: Bangalore. Hybrid.".to_string(),
            location: "Bangalore".to_string(),
            job_type: "Hybrid".to_string(),
            link: "https://example.com/qrs-ba".to_string(),
            ..Default::default()
        },
    ]
}
