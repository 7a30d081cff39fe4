use std::path::Path;

use crate::domain::{BookmarkToken, DomainError, ResolvedBookmark};

/// Creates and resolves durable references to files outside our control.
pub trait BookmarkStore: Send + Sync {
    fn create(&self, path: &Path) -> Result<BookmarkToken, DomainError>;

    /// Resolves a token back to a readable locator. A token whose file has
    /// been moved may still resolve, flagged as stale.
    fn resolve(&self, token: &BookmarkToken) -> Result<ResolvedBookmark, DomainError>;
}
