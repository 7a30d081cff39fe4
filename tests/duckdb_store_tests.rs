use std::sync::Arc;

use docpilot::application::{LibraryRefRepository, QuizRepository, PROJECTS_KEY};
use docpilot::connector::adapter::{
    DuckdbConversationRepository, DuckdbIndexRepository, DuckdbKeyValueStore,
    DuckdbLibraryRefRepository, DuckdbQuizRepository, FileContentExtractor, PathScopedAccess,
    TesseractOcr,
};
use docpilot::domain::{BookmarkToken, LibraryFileRef, Role};
use docpilot::{
    ContentExtractor, Conversation, ConversationRepository, KeyValueStore, LibraryUseCase, Message,
    Quiz,
};
use tempfile::tempdir;

fn extractor() -> Arc<dyn ContentExtractor> {
    Arc::new(FileContentExtractor::new(
        Arc::new(PathScopedAccess::new()),
        Arc::new(TesseractOcr::new("tesseract")),
    ))
}

#[tokio::test]
async fn duckdb_conversation_roundtrip_keeps_message_order_and_lists() {
    let index = DuckdbIndexRepository::in_memory().expect("duckdb init");
    let repo = DuckdbConversationRepository::with_connection(index.shared_connection())
        .await
        .expect("conversation init");

    let conversation = Conversation::new("Photosynthesis");
    repo.save(&conversation).await.expect("save");

    let question = Message::new(Role::User, "What is chlorophyll?")
        .with_attachments(vec!["/docs/bio.pdf".to_string()]);
    let answer = Message::new(Role::Assistant, "A pigment.")
        .with_sources(vec!["bio.pdf".to_string()]);
    repo.append_message(conversation.id(), &question).await.expect("append");
    repo.append_message(conversation.id(), &answer).await.expect("append");

    let loaded = repo
        .fetch(conversation.id())
        .await
        .expect("fetch")
        .expect("conversation exists");
    assert_eq!(loaded.title(), "Photosynthesis");
    let contents: Vec<&str> = loaded.messages().iter().map(|m| m.content()).collect();
    assert_eq!(contents[1..], ["What is chlorophyll?", "A pigment."]);
    assert_eq!(loaded.messages()[1].attachments(), ["/docs/bio.pdf".to_string()]);
    assert_eq!(loaded.messages()[2].sources(), ["bio.pdf".to_string()]);

    assert_eq!(repo.list().await.expect("list").len(), 1);
    assert!(repo.fetch("missing").await.expect("fetch").is_none());
}

#[tokio::test]
async fn duckdb_conversation_corrupt_sources_is_persistence_failure() {
    let index = DuckdbIndexRepository::in_memory().expect("duckdb init");
    let conn = index.shared_connection();
    let repo = DuckdbConversationRepository::with_connection(Arc::clone(&conn))
        .await
        .expect("conversation init");

    let conversation = Conversation::new("Broken");
    repo.save(&conversation).await.expect("save");

    {
        let guard = conn.lock().await;
        guard
            .execute(
                "UPDATE messages SET sources = 'not json' WHERE conversation_id = ?",
                duckdb::params![conversation.id()],
            )
            .expect("corrupt column");
    }

    let err = repo.fetch(conversation.id()).await.unwrap_err();
    assert!(err.is_persistence_failure(), "got {:?}", err);
}

#[tokio::test]
async fn duckdb_conversation_empty_sources_are_not_corrupt() {
    let index = DuckdbIndexRepository::in_memory().expect("duckdb init");
    let repo = DuckdbConversationRepository::with_connection(index.shared_connection())
        .await
        .expect("conversation init");

    let conversation = Conversation::new("Plain");
    repo.save(&conversation).await.expect("save");
    let loaded = repo
        .fetch(conversation.id())
        .await
        .expect("fetch")
        .expect("conversation exists");
    assert!(loaded.messages()[0].sources().is_empty());
}

#[tokio::test]
async fn library_projects_survive_reopening_the_database() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("docpilot.duckdb");
    let doc = dir.path().join("reading.md");
    std::fs::write(&doc, "Chapter one covers the basics\n").expect("write doc");

    let project_id = {
        let index = DuckdbIndexRepository::new(&db_path).expect("duckdb init");
        let store = DuckdbKeyValueStore::with_connection(index.shared_connection())
            .await
            .expect("kv init");
        let library = LibraryUseCase::new(Arc::new(store), extractor());

        let project = library.create("Biology").await.expect("create");
        library.activate(project.id()).await.expect("activate");
        library.add_file("Biology", &doc).await.expect("add file");
        project.id().to_string()
    };

    let index = DuckdbIndexRepository::new(&db_path).expect("duckdb reopen");
    let store = Arc::new(
        DuckdbKeyValueStore::with_connection(index.shared_connection())
            .await
            .expect("kv init"),
    );
    assert!(store.fetch(PROJECTS_KEY).await.expect("fetch").is_some());

    let library = LibraryUseCase::new(store, extractor());
    let projects = library.list().await.expect("list");
    assert_eq!(projects.len(), 2);
    let active: Vec<_> = projects.iter().filter(|p| p.is_active()).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id(), project_id);

    let context = library.active_context().await.expect("context");
    assert_eq!(context, "--- reading.md ---\nChapter one covers the basics\n");
}

#[tokio::test]
async fn duckdb_library_refs_roundtrip_binary_tokens() {
    let index = DuckdbIndexRepository::in_memory().expect("duckdb init");
    let repo = DuckdbLibraryRefRepository::with_connection(index.shared_connection())
        .await
        .expect("refs init");

    let token = BookmarkToken::new(vec![0, 159, 146, 150, 255]);
    repo.save(&LibraryFileRef::new(token.clone(), "syllabus.pdf"))
        .await
        .expect("save");

    let refs = repo.list().await.expect("list");
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].token(), &token);
    assert_eq!(refs[0].display_name(), "syllabus.pdf");

    assert!(repo.delete(&token).await.expect("delete"));
    assert!(!repo.delete(&token).await.expect("delete"));
}

#[tokio::test]
async fn duckdb_quizzes_roundtrip() {
    let index = DuckdbIndexRepository::in_memory().expect("duckdb init");
    let repo = DuckdbQuizRepository::with_connection(index.shared_connection())
        .await
        .expect("quiz init");

    let quiz = Quiz::decode(
        r#"{"quiz_name": "Cells", "questions": [
            {"question": "Powerhouse?", "options": ["Nucleus", "Mitochondria"], "correct_index": 1, "explanation": "ATP"}
        ]}"#,
    )
    .expect("decode");
    repo.save(&quiz).await.expect("save");

    let quizzes = repo.list().await.expect("list");
    assert_eq!(quizzes, vec![quiz]);
}
