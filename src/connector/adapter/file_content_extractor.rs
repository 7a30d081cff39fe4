use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::{acquire_scoped, ContentExtractor, OcrService, Recognition, ScopedAccess};
use crate::domain::{DomainError, FileKind};

/// Recognitions at or below this confidence are discarded.
pub const OCR_MIN_CONFIDENCE: f32 = 0.4;

const BLOCK_SEPARATOR: &str = "\n\n";

/// Reads text, PDF and image files from disk, each read bracketed by a
/// scoped-access grant.
pub struct FileContentExtractor {
    access: Arc<dyn ScopedAccess>,
    ocr: Arc<dyn OcrService>,
}

impl FileContentExtractor {
    pub fn new(access: Arc<dyn ScopedAccess>, ocr: Arc<dyn OcrService>) -> Self {
        Self { access, ocr }
    }

    async fn read_bytes(path: &Path) -> Result<Vec<u8>, DomainError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::unreadable(format!("{}: {}", path.display(), e)))
    }

    async fn extract_pdf(path: &Path) -> Result<String, DomainError> {
        let bytes = Self::read_bytes(path).await?;
        // pdf-extract is CPU bound and panics on some malformed files.
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })
        .await
        .map_err(|e| DomainError::unreadable(format!("{}: PDF parser crashed: {}", path.display(), e)))?
        .map_err(|e| DomainError::unreadable(format!("{}: {}", path.display(), e)))?;

        debug!("Extracted {} PDF pages from {}", pages.len(), path.display());
        join_pages(&pages)
            .ok_or_else(|| DomainError::unreadable(format!("{}: PDF has no text", path.display())))
    }
}

/// Joins non-empty page texts in order with blank lines.
pub fn join_pages(pages: &[String]) -> Option<String> {
    let pages: Vec<&str> = pages
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if pages.is_empty() {
        None
    } else {
        Some(pages.join(BLOCK_SEPARATOR))
    }
}

/// Keeps confident recognitions and joins them with blank lines.
pub fn join_recognitions(recognitions: &[Recognition]) -> Option<String> {
    let kept: Vec<&str> = recognitions
        .iter()
        .filter(|r| r.confidence > OCR_MIN_CONFIDENCE)
        .map(|r| r.text.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(BLOCK_SEPARATOR))
    }
}

#[async_trait]
impl ContentExtractor for FileContentExtractor {
    async fn extract(&self, path: &Path) -> Result<String, DomainError> {
        let kind = FileKind::from_path(path);
        if !kind.is_supported() {
            return Err(DomainError::unreadable(format!(
                "{}: unsupported file type",
                path.display()
            )));
        }

        let _guard = acquire_scoped(self.access.as_ref(), path)?;

        match kind {
            FileKind::Text => {
                let bytes = Self::read_bytes(path).await?;
                String::from_utf8(bytes)
                    .map_err(|_| DomainError::unreadable(format!("{}: not valid UTF-8", path.display())))
            }
            FileKind::Pdf => Self::extract_pdf(path).await,
            FileKind::Image => {
                let recognitions = self.ocr.recognize(path).await?;
                join_recognitions(&recognitions).ok_or_else(|| {
                    DomainError::unreadable(format!("{}: no confident OCR text", path.display()))
                })
            }
            FileKind::Unsupported => Err(DomainError::unreadable(format!(
                "{}: unsupported file type",
                path.display()
            ))),
        }
    }
}
