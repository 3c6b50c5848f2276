use std::io::Write;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pdftotext not installed (poppler-utils)")]
    ToolMissing,
    #[error("pdftotext failed: {0}")]
    ToolFailed(String),
}

/// Abstraction over PDF text extraction.
/// Implementations accept raw PDF bytes and return the layout-preserving text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractError>;
}

// ── pdftotext backend ─────────────────────────────────────────────────────────

/// Shells out to `pdftotext -layout`, which preserves the column alignment the
/// statement line grammar depends on.
pub struct PdftotextExtractor;

#[async_trait]
impl TextExtractor for PdftotextExtractor {
    async fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractError> {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        file.write_all(pdf_bytes)?;
        file.flush()?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(file.path())
            .arg("-")
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractError::ToolMissing
                } else {
                    ExtractError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::ToolFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ── Mock backend (used for tests) ─────────────────────────────────────────────

/// Returns a pre-set string, so the pipeline can be tested without poppler
/// installed.
pub struct MockExtractor {
    pub text: String,
}

impl MockExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(self.text.clone())
    }
}
