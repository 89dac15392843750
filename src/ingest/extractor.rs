//! PDF text extraction

use lopdf::Document;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Cannot read document {path}: {message}")]
    Unreadable { path: PathBuf, message: String },
}

/// Extract the full text of a PDF document.
///
/// Pages are visited in document order. Pages that carry no machine-readable
/// text (image-only scans, malformed content streams) contribute nothing and
/// are not an error. Page texts are joined with a newline and the result is
/// trimmed; the returned string is empty when no page yielded text.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let doc = Document::load(path).map_err(|e| ExtractError::Unreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        let Ok(text) = doc.extract_text(&[*page_number]) else {
            tracing::debug!("Skipping unparseable page {}", page_number);
            continue;
        };
        if !text.trim().is_empty() {
            pages.push(text);
        }
    }

    Ok(pages.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let result = extract_text(Path::new("/nonexistent/syllabus.pdf"));
        assert!(matches!(result, Err(ExtractError::Unreadable { .. })));
    }

    #[test]
    fn test_not_a_pdf() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.pdf");
        std::fs::write(&path, b"plain text, no PDF header").unwrap();

        let result = extract_text(&path);
        assert!(matches!(result, Err(ExtractError::Unreadable { .. })));
    }
}
