use std::path::Path;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Turns a file on disk into plain text.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Returns the extracted text, or [`DomainError::UnreadableFile`] when the
    /// type is unsupported or no text could be recovered.
    async fn extract(&self, path: &Path) -> Result<String, DomainError>;
}
