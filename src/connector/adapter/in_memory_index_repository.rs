use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::IndexRepository;
use crate::domain::{Chunk, ChunkHit, DomainError, IndexedFile};

struct Entry {
    file: IndexedFile,
    chunks: Vec<String>,
}

/// Per-character lower-casing with no context rules, matching DuckDB `lower`.
fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Index kept in process memory. Each replacement runs inside one write
/// section, so readers never see a half-replaced file.
pub struct InMemoryIndexRepository {
    entries: Arc<RwLock<BTreeMap<String, Entry>>>,
}

impl InMemoryIndexRepository {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for InMemoryIndexRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexRepository for InMemoryIndexRepository {
    async fn reindex(&self, file: &IndexedFile, chunks: &[String]) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.remove(file.identity());
        if !chunks.is_empty() {
            entries.insert(
                file.identity().to_string(),
                Entry {
                    file: file.clone(),
                    chunks: chunks.to_vec(),
                },
            );
        }
        debug!("Replaced {} with {} chunks in memory", file.identity(), chunks.len());
        Ok(())
    }

    async fn find_by_identity(&self, identity: &str) -> Result<Option<IndexedFile>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.get(identity).map(|e| e.file.clone()))
    }

    async fn remove(&self, identity: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(identity).is_some())
    }

    async fn list(&self) -> Result<Vec<IndexedFile>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.values().map(|e| e.file.clone()).collect())
    }

    async fn chunks_for(&self, identity: &str) -> Result<Vec<Chunk>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(identity)
            .map(|e| Chunk::sequence_for(identity, &e.chunks))
            .unwrap_or_default())
    }

    async fn search_substring(
        &self,
        query: &str,
        scope: &[String],
    ) -> Result<Vec<ChunkHit>, DomainError> {
        let needle = fold_case(query);
        let entries = self.entries.read().await;
        let scope: BTreeSet<&String> = scope.iter().collect();

        let mut hits = Vec::new();
        for identity in scope {
            let Some(entry) = entries.get(identity) else {
                continue;
            };
            for (i, text) in entry.chunks.iter().enumerate() {
                if fold_case(text).contains(&needle) {
                    hits.push(ChunkHit::new(text.clone(), entry.file.display_name(), i as u32));
                }
            }
        }
        Ok(hits)
    }

    async fn preview(&self, scope: &[String], limit: usize) -> Result<Vec<ChunkHit>, DomainError> {
        let entries = self.entries.read().await;

        let mut candidates: Vec<(u32, &str, &Entry)> = Vec::new();
        for identity in scope {
            if let Some(entry) = entries.get(identity) {
                for i in 0..entry.chunks.len() {
                    candidates.push((i as u32, identity.as_str(), entry));
                }
            }
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        candidates.dedup_by(|a, b| a.0 == b.0 && a.1 == b.1);

        Ok(candidates
            .into_iter()
            .take(limit)
            .map(|(i, _, entry)| {
                ChunkHit::new(entry.chunks[i as usize].clone(), entry.file.display_name(), i)
            })
            .collect())
    }

    async fn count_chunks(&self) -> Result<u64, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.values().map(|e| e.chunks.len() as u64).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(identity: &str) -> IndexedFile {
        IndexedFile::new(identity, identity.trim_start_matches('/'), "")
    }

    #[tokio::test]
    async fn test_reindex_replaces_previous_version() {
        let repo = InMemoryIndexRepository::new();
        let f = file("/a.txt");
        repo.reindex(&f, &["World is great".into(), "Second qualifying".into()])
            .await
            .unwrap();
        repo.reindex(&f, &["Another qualifying line here".into()])
            .await
            .unwrap();

        let chunks = repo.chunks_for("/a.txt").await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sequence_index, 0);
        assert_eq!(chunks[0].text, "Another qualifying line here");
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_scoped() {
        let repo = InMemoryIndexRepository::new();
        repo.reindex(&file("/a.txt"), &["World is great".into()]).await.unwrap();
        repo.reindex(&file("/b.txt"), &["The WORLD is round".into()]).await.unwrap();

        let hits = repo
            .search_substring("world", &["/a.txt".to_string()])
            .await
            .unwrap();
        assert_eq!(hits, vec![ChunkHit::new("World is great", "a.txt", 0)]);
    }

    #[tokio::test]
    async fn test_search_folds_case_per_character() {
        let repo = InMemoryIndexRepository::new();
        repo.reindex(&file("/greek.txt"), &["Η ΟΔΟΣΤΡΩΜΑ είναι νέο".into()])
            .await
            .unwrap();

        // Final-sigma rules would lower the query to "οδος" and miss the text.
        let hits = repo
            .search_substring("ΟΔΟΣ", &["/greek.txt".to_string()])
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_search_ignores_repeated_scope_entries() {
        let repo = InMemoryIndexRepository::new();
        repo.reindex(&file("/a.txt"), &["World is great".into()]).await.unwrap();

        let scope = vec!["/a.txt".to_string(), "/a.txt".to_string()];
        let hits = repo.search_substring("world", &scope).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_preview_orders_by_sequence_then_identity() {
        let repo = InMemoryIndexRepository::new();
        let texts: Vec<String> = (0..4).map(|i| format!("chunk number {}", i)).collect();
        repo.reindex(&file("/b.txt"), &texts).await.unwrap();
        repo.reindex(&file("/a.txt"), &texts).await.unwrap();

        let scope = vec!["/b.txt".to_string(), "/a.txt".to_string()];
        let hits = repo.preview(&scope, 5).await.unwrap();

        let order: Vec<String> = hits.iter().map(|h| h.display_line()).collect();
        assert_eq!(order, vec!["a.txt#0", "b.txt#0", "a.txt#1", "b.txt#1", "a.txt#2"]);
    }
}
