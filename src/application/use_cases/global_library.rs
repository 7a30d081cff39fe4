use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::{BookmarkStore, ContentExtractor, LibraryRefRepository};
use crate::domain::{BookmarkToken, DomainError, LibraryFileRef, CONTEXT_RULE};

/// The always-on library: files referenced by bookmark and re-read each time
/// their context is needed.
pub struct GlobalLibraryUseCase {
    refs: Arc<dyn LibraryRefRepository>,
    bookmarks: Arc<dyn BookmarkStore>,
    extractor: Arc<dyn ContentExtractor>,
}

impl GlobalLibraryUseCase {
    pub fn new(
        refs: Arc<dyn LibraryRefRepository>,
        bookmarks: Arc<dyn BookmarkStore>,
        extractor: Arc<dyn ContentExtractor>,
    ) -> Self {
        Self {
            refs,
            bookmarks,
            extractor,
        }
    }

    pub async fn add(&self, path: &Path) -> Result<LibraryFileRef, DomainError> {
        let token = self.bookmarks.create(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let file_ref = LibraryFileRef::new(token, name);
        self.refs.save(&file_ref).await?;
        info!("Added {} to the global library", file_ref.display_name());
        Ok(file_ref)
    }

    pub async fn remove(&self, token: &BookmarkToken) -> Result<bool, DomainError> {
        self.refs.delete(token).await
    }

    pub async fn list(&self) -> Result<Vec<LibraryFileRef>, DomainError> {
        self.refs.list().await
    }

    /// Re-reads every referenced file and joins the texts under headers.
    ///
    /// Stale bookmarks are followed with a warning. Files that no longer
    /// resolve or cannot be read are skipped.
    pub async fn context(&self) -> Result<String, DomainError> {
        let mut blocks = Vec::new();
        for file_ref in self.refs.list().await? {
            let resolved = match self.bookmarks.resolve(file_ref.token()) {
                Ok(resolved) => resolved,
                Err(e) => {
                    warn!("Cannot resolve {}: {}", file_ref.display_name(), e);
                    continue;
                }
            };
            if resolved.is_stale {
                warn!(
                    "Bookmark for {} is stale, now at {}",
                    file_ref.display_name(),
                    resolved.locator
                );
            }

            match self.extractor.extract(Path::new(&resolved.locator)).await {
                Ok(content) => blocks.push(format!("--- {} ---\n{}", file_ref.display_name(), content)),
                Err(e) => warn!("Cannot read {}: {}", file_ref.display_name(), e),
            }
        }
        Ok(blocks.join(CONTEXT_RULE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::{FsBookmarkStore, InMemoryLibraryRefRepository};
    use async_trait::async_trait;

    struct ReadText;

    #[async_trait]
    impl ContentExtractor for ReadText {
        async fn extract(&self, path: &Path) -> Result<String, DomainError> {
            Ok(tokio::fs::read_to_string(path).await?)
        }
    }

    fn library() -> GlobalLibraryUseCase {
        GlobalLibraryUseCase::new(
            Arc::new(InMemoryLibraryRefRepository::new()),
            Arc::new(FsBookmarkStore::new()),
            Arc::new(ReadText),
        )
    }

    #[tokio::test]
    async fn test_context_rereads_current_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.md");
        std::fs::write(&path, "first").unwrap();

        let library = library();
        library.add(&path).await.unwrap();
        std::fs::write(&path, "second").unwrap();

        assert_eq!(library.context().await.unwrap(), "--- ref.md ---\nsecond");
    }

    #[tokio::test]
    async fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("kept.md");
        let gone = dir.path().join("gone.md");
        std::fs::write(&kept, "kept").unwrap();
        std::fs::write(&gone, "gone").unwrap();

        let library = library();
        library.add(&kept).await.unwrap();
        library.add(&gone).await.unwrap();
        std::fs::remove_file(&gone).unwrap();

        assert_eq!(library.context().await.unwrap(), "--- kept.md ---\nkept");
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.md");
        std::fs::write(&path, "x").unwrap();

        let library = library();
        let file_ref = library.add(&path).await.unwrap();
        assert!(library.remove(file_ref.token()).await.unwrap());
        assert!(library.list().await.unwrap().is_empty());
    }
}
