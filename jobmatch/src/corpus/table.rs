use std::path::Path;

use crate::error::{JobMatchError, Result};

/// A header row plus data rows read from a tabular job source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl JobTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parse CSV bytes, auto-detecting the delimiter.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        // Strip BOM if present
        let bytes = strip_bom(bytes);

        if bytes.is_empty() {
            return Err(JobMatchError::Processing("Empty CSV file".to_string()));
        }

        let delimiter = detect_delimiter(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| JobMatchError::Processing(format!("Failed to read CSV headers: {e}")))?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(JobMatchError::Processing("CSV has no headers".to_string()));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| {
                JobMatchError::Processing(format!("Failed to read CSV record: {e}"))
            })?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }

        tracing::debug!(
            columns = headers.len(),
            rows = rows.len(),
            delimiter = %(delimiter as char).escape_default(),
            "Parsed job table"
        );

        Ok(Self { headers, rows })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_csv_bytes(&bytes)
    }

    /// Index of the column whose trimmed, lowercased header equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.trim().to_lowercase() == name)
    }
}

/// Strip UTF-8 BOM if present
fn strip_bom(bytes: &[u8]) -> &[u8] {
    if bytes.len() >= 3 && bytes[0..3] == [0xEF, 0xBB, 0xBF] {
        &bytes[3..]
    } else {
        bytes
    }
}

/// Try the common delimiters and keep the one producing the most consistent
/// multi-column layout.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let candidates = [b',', b';', b'\t'];
    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delimiter in &candidates {
        let score = evaluate_delimiter(bytes, delimiter);
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

fn evaluate_delimiter(bytes: &[u8], delimiter: u8) -> usize {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let mut column_counts: Vec<usize> = Vec::new();

    if let Ok(headers) = reader.headers() {
        column_counts.push(headers.len());
    }

    for record in reader.records().take(5).flatten() {
        column_counts.push(record.len());
    }

    let Some(&first_count) = column_counts.first() else {
        return 0;
    };

    let consistent = column_counts.iter().all(|&c| c == first_count);
    let has_multiple_columns = first_count > 1;

    if consistent && has_multiple_columns {
        first_count * 10
    } else if has_multiple_columns {
        first_count
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bom() {
        let with_bom = vec![0xEF, 0xBB, 0xBF, b'h', b'i'];
        assert_eq!(strip_bom(&with_bom), b"hi");
        assert_eq!(strip_bom(b"hi"), b"hi");
    }

    #[test]
    fn test_detect_delimiter_variants() {
        assert_eq!(detect_delimiter(b"title,company\nA,B"), b',');
        assert_eq!(detect_delimiter(b"title;company\nA;B"), b';');
        assert_eq!(detect_delimiter(b"title\tcompany\nA\tB"), b'\t');
    }

    #[test]
    fn test_from_csv_bytes_handles_quotes_and_ragged_rows() {
        let csv = b"Title, Company ,Description,Link\n\"Analyst, Senior\",ABC,\"Uses SQL\",https://x\nEngineer,XYZ\n";
        let table = JobTable::from_csv_bytes(csv).unwrap();

        assert_eq!(table.headers, vec!["Title", "Company", "Description", "Link"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "Analyst, Senior");
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn test_column_index_is_case_insensitive() {
        let table = JobTable::new(vec![" TITLE ".to_string(), "Link".to_string()], vec![]);
        assert_eq!(table.column_index("title"), Some(0));
        assert_eq!(table.column_index("link"), Some(1));
        assert_eq!(table.column_index("company"), None);
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        let err = JobTable::from_csv_bytes(b"").unwrap_err();
        assert!(matches!(err, JobMatchError::Processing(_)));
    }
}
