use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{canonical_identity, IndexRepository};
use crate::domain::{ChunkHit, DomainError, SearchQuery};

/// Number of chunks returned when a scoped search matches nothing.
pub const FALLBACK_LIMIT: usize = 5;

/// Scoped substring retrieval over the index.
pub struct SearchChunksUseCase {
    index: Arc<dyn IndexRepository>,
}

impl SearchChunksUseCase {
    pub fn new(index: Arc<dyn IndexRepository>) -> Self {
        Self { index }
    }

    /// Returns chunks of in-scope files containing the query.
    ///
    /// An empty scope means "no context" and yields nothing. A non-empty
    /// scope with no match yields a preview of the first chunks instead, so
    /// callers always have something to work with.
    pub async fn execute(&self, query: &SearchQuery) -> Result<Vec<ChunkHit>, DomainError> {
        if !query.has_scope() {
            debug!("Empty scope, skipping retrieval");
            return Ok(Vec::new());
        }

        let scope = normalize_scope(query.scope());
        let hits = self.index.search_substring(query.query(), &scope).await?;
        if !hits.is_empty() {
            info!("Found {} chunks matching '{}'", hits.len(), query.query());
            return Ok(hits);
        }

        let preview = self.index.preview(&scope, FALLBACK_LIMIT).await?;
        info!(
            "No chunks matched '{}', returning {} preview chunks",
            query.query(),
            preview.len()
        );
        Ok(preview)
    }
}

/// Canonicalizes scope entries the same way identities are built, dropping
/// duplicates while keeping first-seen order.
fn normalize_scope(scope: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(scope.len());
    for entry in scope {
        let identity = canonical_identity(Path::new(entry));
        if !normalized.contains(&identity) {
            normalized.push(identity);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::InMemoryIndexRepository;
    use crate::domain::IndexedFile;

    async fn seeded() -> (Arc<InMemoryIndexRepository>, SearchChunksUseCase) {
        let repo = Arc::new(InMemoryIndexRepository::new());
        let texts: Vec<String> = (0..7).map(|i| format!("qualifying line {}", i)).collect();
        repo.reindex(&IndexedFile::new("/virtual/a.txt", "a.txt", ""), &texts)
            .await
            .unwrap();
        repo.reindex(
            &IndexedFile::new("/virtual/b.txt", "b.txt", ""),
            &["World is great".to_string()],
        )
        .await
        .unwrap();
        let use_case = SearchChunksUseCase::new(repo.clone());
        (repo, use_case)
    }

    #[tokio::test]
    async fn test_primary_match() {
        let (_, use_case) = seeded().await;
        let query = SearchQuery::new("world").with_scope(vec!["/virtual/b.txt".into()]);

        let hits = use_case.execute(&query).await.unwrap();
        assert_eq!(hits, vec![ChunkHit::new("World is great", "b.txt", 0)]);
    }

    #[tokio::test]
    async fn test_fallback_caps_at_five_in_sequence_order() {
        let (_, use_case) = seeded().await;
        let query = SearchQuery::new("zzz").with_scope(vec!["/virtual/a.txt".into()]);

        let hits = use_case.execute(&query).await.unwrap();
        let indices: Vec<u32> = hits.iter().map(|h| h.chunk_index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_empty_scope_returns_nothing() {
        let (_, use_case) = seeded().await;
        let hits = use_case.execute(&SearchQuery::new("world")).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_never_leaves_scope() {
        let (_, use_case) = seeded().await;
        let query = SearchQuery::new("line").with_scope(vec!["/virtual/b.txt".into()]);

        // "line" only occurs in a.txt, so this is a fallback over b.txt alone.
        let hits = use_case.execute(&query).await.unwrap();
        assert!(hits.iter().all(|h| h.file_name() == "b.txt"));
    }
}
