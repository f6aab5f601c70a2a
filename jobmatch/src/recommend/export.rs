use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::RecommendationRecord;

const CSV_HEADERS: [&str; 4] = ["Job Title", "Company", "Match Reason", "Apply Link"];

/// Write recommendations as CSV with the display headers. The header row is
/// written even when there are no records.
pub fn write_recommendations_csv<W: Write>(
    writer: W,
    records: &[RecommendationRecord],
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;

    for record in records {
        csv_writer.write_record([
            record.job_title.as_str(),
            record.company.as_str(),
            record.match_reason.as_str(),
            record.apply_link.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn save_recommendations_csv(path: &Path, records: &[RecommendationRecord]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_recommendations_csv(file, records)?;
    tracing::info!(path = %path.display(), records = records.len(), "Saved recommendations");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_csv_has_display_headers_and_quotes_commas() {
        let records = vec![RecommendationRecord {
            job_title: "Data Analyst".to_string(),
            company: "ABC Corp".to_string(),
            match_reason: "Python, SQL".to_string(),
            apply_link: "https://example.com/abc".to_string(),
        }];

        let mut buffer = Vec::new();
        write_recommendations_csv(&mut buffer, &records).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Job Title,Company,Match Reason,Apply Link\n\
             Data Analyst,ABC Corp,\"Python, SQL\",https://example.com/abc\n"
        );
    }

    #[test]
    fn test_empty_csv_still_has_headers() {
        let mut buffer = Vec::new();
        write_recommendations_csv(&mut buffer, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Job Title,Company,Match Reason,Apply Link\n"
        );
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recommendations.csv");

        save_recommendations_csv(&path, &[RecommendationRecord::default()]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
    }
}
