use std::sync::Arc;

use docpilot::{chunk_text, ChunkHit, IndexRepository, IndexedFile, SearchChunksUseCase, SearchQuery};
use docpilot::connector::adapter::{DuckdbIndexRepository, InMemoryIndexRepository};
use tempfile::tempdir;

const NOTES: &str = "/docs/notes.md";

fn file(identity: &str, content: &str) -> IndexedFile {
    let name = identity.rsplit('/').next().unwrap_or(identity);
    IndexedFile::new(identity, name, content)
}

async fn index_text(repo: &dyn IndexRepository, identity: &str, content: &str) {
    let chunks = chunk_text(content);
    repo.reindex(&file(identity, content), &chunks)
        .await
        .expect("reindex");
}

#[tokio::test]
async fn duckdb_index_replaces_chunks_on_reindex() {
    let dir = tempdir().expect("tempdir");
    let repo = DuckdbIndexRepository::new(&dir.path().join("docpilot.duckdb")).expect("duckdb init");

    index_text(&repo, NOTES, "Hello\n\nWorld is great\n\nShort\n").await;
    let chunks = repo.chunks_for(NOTES).await.expect("chunks_for");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "World is great");

    index_text(&repo, NOTES, "Another qualifying line here\n").await;
    let chunks = repo.chunks_for(NOTES).await.expect("chunks_for");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Another qualifying line here");
    assert_eq!(chunks[0].sequence_index, 0);

    assert_eq!(repo.list().await.expect("list").len(), 1);
    assert_eq!(repo.count_chunks().await.expect("count"), 1);
}

#[tokio::test]
async fn duckdb_index_sequence_is_contiguous() {
    let repo = DuckdbIndexRepository::in_memory().expect("duckdb init");
    index_text(
        &repo,
        NOTES,
        "first qualifying line\nsecond qualifying line\nshort\nthird qualifying line\n",
    )
    .await;

    let seqs: Vec<u32> = repo
        .chunks_for(NOTES)
        .await
        .expect("chunks_for")
        .iter()
        .map(|c| c.sequence_index)
        .collect();
    assert_eq!(seqs, vec![0, 1, 2]);
}

#[tokio::test]
async fn duckdb_index_empty_reindex_drops_entry() {
    let repo = DuckdbIndexRepository::in_memory().expect("duckdb init");
    index_text(&repo, NOTES, "World is great\n").await;

    repo.reindex(&file(NOTES, ""), &[]).await.expect("reindex");

    assert!(repo.find_by_identity(NOTES).await.expect("find").is_none());
    assert!(repo.chunks_for(NOTES).await.expect("chunks_for").is_empty());
}

#[tokio::test]
async fn duckdb_index_substring_search_is_scoped_and_case_insensitive() {
    let repo = DuckdbIndexRepository::in_memory().expect("duckdb init");
    index_text(&repo, NOTES, "World is great\n").await;
    index_text(&repo, "/docs/other.md", "The world is round\n").await;

    let hits = repo
        .search_substring("WORLD", &[NOTES.to_string()])
        .await
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text(), "World is great");
    assert_eq!(hits[0].file_name(), "notes.md");
    assert_eq!(hits[0].chunk_index(), 0);

    let none = repo.search_substring("world", &[]).await.expect("search");
    assert!(none.is_empty());
}

#[tokio::test]
async fn duckdb_index_remove_reports_presence() {
    let repo = DuckdbIndexRepository::in_memory().expect("duckdb init");
    index_text(&repo, NOTES, "World is great\n").await;

    assert!(repo.remove(NOTES).await.expect("remove"));
    assert!(!repo.remove(NOTES).await.expect("remove"));
    assert_eq!(repo.count_chunks().await.expect("count"), 0);
}

#[tokio::test]
async fn search_returns_match_then_falls_back_to_preview() {
    let repo = Arc::new(DuckdbIndexRepository::in_memory().expect("duckdb init"));
    index_text(repo.as_ref(), NOTES, "Hello\n\nWorld is great\n\nShort\n").await;
    let use_case = SearchChunksUseCase::new(repo.clone());

    let query = SearchQuery::new("World").with_scope(vec![NOTES.to_string()]);
    let hits = use_case.execute(&query).await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text(), "World is great");
    assert_eq!(hits[0].chunk_index(), 0);

    let query = SearchQuery::new("zzz").with_scope(vec![NOTES.to_string()]);
    let hits = use_case.execute(&query).await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text(), "World is great");
}

#[tokio::test]
async fn fallback_preview_is_capped_and_sequence_ordered() {
    let repo = Arc::new(DuckdbIndexRepository::in_memory().expect("duckdb init"));
    let long: String = (0..8)
        .map(|i| format!("qualifying line number {}\n", i))
        .collect();
    index_text(repo.as_ref(), "/docs/a.md", &long).await;
    index_text(repo.as_ref(), "/docs/b.md", &long).await;
    let use_case = SearchChunksUseCase::new(repo.clone());

    let query = SearchQuery::new("zzz").with_scope(vec!["/docs/a.md".to_string(), "/docs/b.md".to_string()]);
    let hits = use_case.execute(&query).await.expect("search");

    assert_eq!(hits.len(), 5);
    let order: Vec<(u32, &str)> = hits.iter().map(|h| (h.chunk_index(), h.file_name())).collect();
    assert_eq!(
        order,
        vec![(0, "a.md"), (0, "b.md"), (1, "a.md"), (1, "b.md"), (2, "a.md")]
    );
}

#[tokio::test]
async fn search_without_scope_returns_nothing() {
    let repo = Arc::new(DuckdbIndexRepository::in_memory().expect("duckdb init"));
    index_text(repo.as_ref(), NOTES, "World is great\n").await;
    let use_case = SearchChunksUseCase::new(repo);

    let hits = use_case
        .execute(&SearchQuery::new("World"))
        .await
        .expect("search");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn duckdb_index_search_folds_non_ascii_case() {
    let repo = DuckdbIndexRepository::in_memory().expect("duckdb init");
    index_text(&repo, "/docs/trip.md", "Trip to İstanbul in May\n").await;
    index_text(&repo, "/docs/greek.md", "Η ΟΔΟΣ είναι μεγάλη\n").await;
    let scope = vec!["/docs/greek.md".to_string(), "/docs/trip.md".to_string()];

    let hits = repo.search_substring("İstanbul", &scope).await.expect("search");
    assert_eq!(hits, vec![ChunkHit::new("Trip to İstanbul in May", "trip.md", 0)]);

    let hits = repo.search_substring("ΟΔΟΣ", &scope).await.expect("search");
    assert_eq!(hits, vec![ChunkHit::new("Η ΟΔΟΣ είναι μεγάλη", "greek.md", 0)]);

    let hits = repo.search_substring("οδοσ", &scope).await.expect("search");
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn index_adapters_agree_on_search_and_preview() {
    let corpus = [
        ("/docs/b.md", "The WORLD is round\nnothing relevant here\n"),
        ("/docs/a.md", "World is great\n\nShort\nworldwide shipping soon\n"),
        ("/docs/trip.md", "Trip to İstanbul in May\nΗ ΟΔΟΣ είναι μεγάλη\n"),
        ("/docs/outside.md", "World outside the scope\n"),
    ];
    let scope: Vec<String> = ["/docs/b.md", "/docs/trip.md", "/docs/a.md", "/docs/a.md"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let adapters: Vec<Arc<dyn IndexRepository>> = vec![
        Arc::new(InMemoryIndexRepository::new()),
        Arc::new(DuckdbIndexRepository::in_memory().expect("duckdb init")),
    ];
    for repo in &adapters {
        for (identity, content) in corpus {
            index_text(repo.as_ref(), identity, content).await;
        }
    }

    for query in ["world", "WORLD", "İstanbul", "ΟΔΟΣ", "μεγάλη", "zzz"] {
        let memory = adapters[0].search_substring(query, &scope).await.expect("search");
        let duckdb = adapters[1].search_substring(query, &scope).await.expect("search");
        assert_eq!(memory, duckdb, "search for {:?}", query);
    }

    let world = adapters[1].search_substring("world", &scope).await.expect("search");
    let found: Vec<(&str, u32)> = world.iter().map(|h| (h.file_name(), h.chunk_index())).collect();
    assert_eq!(found, vec![("a.md", 0), ("a.md", 1), ("b.md", 0)]);

    let memory = adapters[0].preview(&scope, 5).await.expect("preview");
    let duckdb = adapters[1].preview(&scope, 5).await.expect("preview");
    assert_eq!(memory, duckdb);
}
