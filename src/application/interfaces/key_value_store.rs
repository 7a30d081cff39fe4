use async_trait::async_trait;

use crate::domain::DomainError;

/// Small named blobs of application state (e.g. the saved project list).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn save(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
