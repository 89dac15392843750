//! HTML-to-PDF export through an external converter
//!
//! The converter is any wkhtmltopdf-compatible binary: HTML on stdin, output
//! file as the last argument. Located by a configured path rather than a
//! hardcoded one.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to run converter {converter}: {message}")]
    Spawn { converter: PathBuf, message: String },

    #[error("Converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// PDF exporter wrapping an external HTML-to-PDF converter
pub struct PdfExporter {
    converter: PathBuf,
}

impl PdfExporter {
    pub fn new(converter: impl Into<PathBuf>) -> Self {
        Self {
            converter: converter.into(),
        }
    }

    /// Render `html` to a newly created temporary PDF file and return its path
    ///
    /// The file is not cleaned up here; ownership of deletion passes to the
    /// caller.
    pub fn export_to_pdf(&self, html: &str) -> Result<PathBuf, RenderError> {
        let tmp = tempfile::Builder::new()
            .prefix("kurso-")
            .suffix(".pdf")
            .tempfile()?;
        let (_, path) = tmp.keep().map_err(|e| RenderError::Io(e.error))?;

        match self.render_into(html, &path) {
            Ok(()) => Ok(path),
            Err(e) => {
                // Nothing useful was written; do not leak the temp file
                let _ = std::fs::remove_file(&path);
                Err(e)
            }
        }
    }

    fn render_into(&self, html: &str, output: &Path) -> Result<(), RenderError> {
        tracing::info!("Rendering PDF via {:?}", self.converter);

        let mut child = Command::new(&self.converter)
            .arg("--quiet")
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RenderError::Spawn {
                converter: self.converter.clone(),
                message: e.to_string(),
            })?;

        {
            let mut stdin = child.stdin.take().ok_or_else(|| RenderError::Spawn {
                converter: self.converter.clone(),
                message: "stdin unavailable".to_string(),
            })?;
            stdin.write_all(html.as_bytes())?;
        }

        let result = child.wait_with_output()?;
        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_converter() {
        let exporter = PdfExporter::new("/nonexistent/wkhtmltopdf");
        let result = exporter.export_to_pdf("<html><body>hi</body></html>");
        assert!(matches!(result, Err(RenderError::Spawn { .. })));
    }

    #[test]
    fn test_failed_render_cleans_up() {
        // `false` accepts no input and exits nonzero on every platform we ship to
        let exporter = PdfExporter::new("false");
        match exporter.export_to_pdf("<html></html>") {
            Err(RenderError::Failed { .. }) => {}
            Err(RenderError::Io(_)) => {} // stdin closed before the write
            other => panic!("Expected a render failure, got {:?}", other),
        }
    }
}
