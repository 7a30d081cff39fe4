use async_trait::async_trait;

use crate::domain::{Chunk, ChunkHit, DomainError, IndexedFile};

/// Persistent mapping from file identity to its ordered chunks.
#[async_trait]
pub trait IndexRepository: Send + Sync {
    /// Atomically replaces any entry for `file.identity()` with `file` and
    /// `chunks`, numbered 0..N-1 in slice order.
    ///
    /// An empty `chunks` slice removes the prior entry and inserts nothing.
    async fn reindex(&self, file: &IndexedFile, chunks: &[String]) -> Result<(), DomainError>;

    async fn find_by_identity(&self, identity: &str) -> Result<Option<IndexedFile>, DomainError>;

    /// Deletes a file and its chunks. Returns whether an entry existed.
    async fn remove(&self, identity: &str) -> Result<bool, DomainError>;

    async fn list(&self) -> Result<Vec<IndexedFile>, DomainError>;

    /// Chunks of one file ordered by sequence index.
    async fn chunks_for(&self, identity: &str) -> Result<Vec<Chunk>, DomainError>;

    /// Case-insensitive substring match restricted to files in `scope`.
    async fn search_substring(
        &self,
        query: &str,
        scope: &[String],
    ) -> Result<Vec<ChunkHit>, DomainError>;

    /// The first `limit` chunks across `scope`, by sequence index then identity.
    async fn preview(&self, scope: &[String], limit: usize) -> Result<Vec<ChunkHit>, DomainError>;

    async fn count_chunks(&self) -> Result<u64, DomainError>;
}
