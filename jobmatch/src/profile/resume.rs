use std::path::Path;

use crate::error::{JobMatchError, Result};

/// Résumé file formats we can pull text out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Text,
}

impl ResumeFormat {
    /// Pick a format from the file extension; anything that is not `.pdf` is
    /// read as text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::Text,
        }
    }

    /// Detect a PDF from its `%PDF-` magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF-") {
            Some(Self::Pdf)
        } else {
            None
        }
    }
}

/// Extract plain text from résumé bytes.
pub fn extract_resume_text(bytes: &[u8], format: ResumeFormat) -> Result<String> {
    match format {
        ResumeFormat::Text => Ok(String::from_utf8_lossy(bytes).into_owned()),
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| JobMatchError::Processing(format!("PDF extraction failed: {e}"))),
    }
}

/// Read a résumé file, detecting PDFs by content before falling back to the
/// extension.
pub fn read_resume(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let format = ResumeFormat::sniff(&bytes).unwrap_or_else(|| ResumeFormat::from_path(path));

    let text = extract_resume_text(&bytes, format)?;
    tracing::info!(
        path = %path.display(),
        ?format,
        chars = text.chars().count(),
        "Extracted resume text"
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ResumeFormat::from_path(Path::new("cv.PDF")), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_path(Path::new("cv.txt")), ResumeFormat::Text);
        assert_eq!(ResumeFormat::from_path(Path::new("cv")), ResumeFormat::Text);
    }

    #[test]
    fn test_sniff_pdf_magic() {
        assert_eq!(ResumeFormat::sniff(b"%PDF-1.7\n..."), Some(ResumeFormat::Pdf));
        assert_eq!(ResumeFormat::sniff(b"Jane Doe"), None);
    }

    #[test]
    fn test_text_extraction_is_lossy_utf8() {
        let text = extract_resume_text(b"Jane \xFF Doe", ResumeFormat::Text).unwrap();
        assert_eq!(text, "Jane \u{FFFD} Doe");
    }

    #[test]
    fn test_invalid_pdf_is_processing_error() {
        let err = extract_resume_text(b"not a pdf", ResumeFormat::Pdf).unwrap_err();
        assert!(matches!(err, JobMatchError::Processing(ref msg) if msg.contains("PDF")));
    }

    #[test]
    fn test_read_resume_from_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Senior data analyst, 6 years of SQL").unwrap();

        let text = read_resume(file.path()).unwrap();
        assert_eq!(text, "Senior data analyst, 6 years of SQL");
    }

    #[test]
    fn test_read_missing_resume_is_io_error() {
        let err = read_resume(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, JobMatchError::Io(_)));
    }
}
