use async_trait::async_trait;

use crate::domain::{ChatRequest, DomainError};

/// A language-model backend reachable over the network.
///
/// Implementors own transport and wire format; the router only hands them a
/// fully assembled [`ChatRequest`].
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns the raw generated text.
    async fn chat(&self, request: &ChatRequest) -> Result<String, DomainError>;
}

/// Discovery of models installed on the local backend.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>, DomainError>;
}
