use async_trait::async_trait;

use crate::domain::{BookmarkToken, DomainError, LibraryFileRef};

/// Storage for the always-on global library. The token is the identity.
#[async_trait]
pub trait LibraryRefRepository: Send + Sync {
    /// Inserts or replaces the reference with the same token.
    async fn save(&self, file_ref: &LibraryFileRef) -> Result<(), DomainError>;

    async fn delete(&self, token: &BookmarkToken) -> Result<bool, DomainError>;

    /// All references ordered by the time they were added.
    async fn list(&self) -> Result<Vec<LibraryFileRef>, DomainError>;
}
