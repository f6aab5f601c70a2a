use crate::models::{JobDocument, JobMetadata, JobRecord};

const SEPARATOR: &str = " | ";

/// Project a record into its embeddable document.
///
/// Parts are emitted in a fixed order and empty fields are left out
/// entirely, so a record without a salary never produces a `Salary:` label.
pub fn project(record: &JobRecord) -> JobDocument {
    let labeled = |label: &str, value: &str| {
        if value.is_empty() {
            String::new()
        } else {
            format!("{label}: {value}")
        }
    };

    let parts = [
        record.title.clone(),
        record.company.clone(),
        record.description.clone(),
        labeled("Location", &record.location),
        labeled("Type", &record.job_type),
        labeled("Skills", &record.skills),
        labeled("Experience", &record.experience),
        labeled("Salary", &record.salary),
        labeled("Apply", &record.link),
    ];

    let content = parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    JobDocument {
        content,
        metadata: JobMetadata::from(record),
    }
}

pub fn project_all(records: &[JobRecord]) -> Vec<JobDocument> {
    records.iter().map(project).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_record() -> JobRecord {
        JobRecord {
            title: "Data Analyst".to_string(),
            company: "ABC Corp".to_string(),
            description: "Dashboards".to_string(),
            location: "Bangalore".to_string(),
            job_type: "Full-time".to_string(),
            link: "https://example.com/abc".to_string(),
            experience: "2 years".to_string(),
            skills: "SQL".to_string(),
            salary: "10 LPA".to_string(),
        }
    }

    #[test]
    fn test_project_full_record_in_fixed_order() {
        let document = project(&full_record());
        assert_eq!(
            document.content,
            "Data Analyst | ABC Corp | Dashboards | Location: Bangalore | Type: Full-time | \
             Skills: SQL | Experience: 2 years | Salary: 10 LPA | Apply: https://example.com/abc"
        );
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let record = JobRecord {
            salary: String::new(),
            experience: String::new(),
            ..full_record()
        };
        let document = project(&record);

        assert!(!document.content.contains("Salary:"));
        assert!(!document.content.contains("Experience:"));
        assert!(!document.content.contains("|  |"));
    }

    #[test]
    fn test_metadata_round_trips_record_fields() {
        let record = full_record();
        let metadata = project(&record).metadata;

        assert_eq!(metadata.title, record.title);
        assert_eq!(metadata.company, record.company);
        assert_eq!(metadata.link, record.link);
        assert_eq!(metadata.location, record.location);
        assert_eq!(metadata.job_type, record.job_type);
        assert_eq!(metadata.salary, record.salary);
    }

    #[test]
    fn test_all_empty_record_projects_to_empty_content() {
        let document = project(&JobRecord::default());
        assert_eq!(document.content, "");
        assert_eq!(document.metadata, JobMetadata::default());
    }

    #[test]
    fn test_title_only_record_has_content() {
        let record = JobRecord {
            title: "Rust Engineer".to_string(),
            ..Default::default()
        };
        assert_eq!(project(&record).content, "Rust Engineer");
    }
}
