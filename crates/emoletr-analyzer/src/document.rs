//! Text extraction from stored documents
//!
//! The extractor trusts the [`DocumentKind`] it is given and never deletes
//! the file; scoped cleanup belongs to the caller. Both paths are blocking,
//! so async callers should run them on a blocking thread.

use crate::error::ExtractionError;
use crate::types::DocumentKind;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Extract the text content of the file at `path`
///
/// # Errors
///
/// - [`ExtractionError::Io`] / [`ExtractionError::Decode`] for unreadable or
///   non-UTF-8 plain text
/// - [`ExtractionError::Pdf`] when the PDF cannot be parsed or a page fails
/// - [`ExtractionError::NoText`] when the result is empty or whitespace only
pub fn extract(path: &Path, kind: DocumentKind) -> Result<String, ExtractionError> {
    let text = match kind {
        DocumentKind::PlainText => extract_plain_text(path)?,
        DocumentKind::Pdf => extract_pdf_text(path)?,
    };

    debug!("Extracted {} chars from {:?}", text.chars().count(), path);

    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(text)
}

fn extract_plain_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8(bytes)?)
}

/// Concatenate page texts in page order, aborting on the first failing page
fn extract_pdf_text(path: &Path) -> Result<String, ExtractionError> {
    let doc = Document::load(path).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let mut text = String::new();
    for page_num in doc.get_pages().into_keys() {
        let content = doc
            .extract_text(&[page_num])
            .map_err(|e| ExtractionError::Pdf(format!("page {}: {}", page_num, e)))?;
        text.push_str(&content);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_plain_text_is_returned_exactly() {
        let content = "Ma mère disait : « l'exil est une longue nuit ».\r\nDeuxième ligne\n";
        let file = write_temp(content.as_bytes());

        let text = extract(file.path(), DocumentKind::PlainText).unwrap();
        assert_eq!(text, content);
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let file = write_temp(&[0x66, 0x6f, 0xff, 0xfe, 0x6f]);
        let result = extract(file.path(), DocumentKind::PlainText);
        assert!(matches!(result, Err(ExtractionError::Decode(_))));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract(&dir.path().join("absent.txt"), DocumentKind::PlainText);
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }

    #[test]
    fn test_whitespace_only_text_is_no_text() {
        let file = write_temp(b"  \n\t  ");
        let result = extract(file.path(), DocumentKind::PlainText);
        assert!(matches!(result, Err(ExtractionError::NoText)));
    }

    #[test]
    fn test_garbage_pdf_fails() {
        let file = write_temp(b"this is not a pdf at all");
        let result = extract(file.path(), DocumentKind::Pdf);
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }

    #[test]
    fn test_kind_is_trusted_over_content() {
        // Plain text bytes declared as PDF go through the PDF path
        let file = write_temp(b"hello");
        assert!(extract(file.path(), DocumentKind::Pdf).is_err());
    }
}
