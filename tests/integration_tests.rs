use std::path::{Path, PathBuf};

use docpilot::application::{AskRequest, ProviderRouter};
use docpilot::{Commands, Container, ContainerConfig, Mode, ProjectCommand, ProviderConfig, Router};
use serde_json::json;
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An in-memory container whose local backend is `ollama`.
async fn container(data_dir: &Path, ollama: &MockServer) -> Container {
    let config = ContainerConfig {
        data_dir: data_dir.to_string_lossy().to_string(),
        memory_storage: true,
        jobs: 2,
        provider: ProviderConfig::new("ollama", "llama3.2"),
        openai_base_url: "http://127.0.0.1:9".to_string(),
        anthropic_base_url: "http://127.0.0.1:9".to_string(),
        ollama_base_url: ollama.uri(),
    };
    Container::new(config).await.expect("container")
}

async fn ollama_replying(status: u16, reply: &str) -> MockServer {
    let server = MockServer::start().await;
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({ "response": reply }))
    } else {
        ResponseTemplate::new(status).set_body_string(reply)
    };
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

fn write_notes(dir: &TempDir) -> PathBuf {
    let notes = dir.path().join("notes.md");
    std::fs::write(&notes, "Hello\n\nWorld is great\n\nShort\n").expect("write notes");
    notes
}

#[test]
fn empty_primary_credential_resolves_local() {
    let config = ProviderConfig::new("openai", "gpt-4o-mini").with_credential("openai", "");
    assert_eq!(ProviderRouter::resolve_mode(&config), Mode::Local);
}

#[tokio::test]
async fn index_then_search_through_the_router() {
    let dir = tempdir().expect("tempdir");
    let notes = write_notes(&dir);
    let ollama = ollama_replying(200, "unused").await;
    let container = container(dir.path(), &ollama).await;
    let router = Router::new(&container);

    let output = router
        .route(Commands::Index {
            paths: vec![dir.path().to_path_buf()],
        })
        .await
        .expect("index");
    assert!(output.starts_with("Indexed 1 files (1 chunks)"), "{}", output);

    let output = router
        .route(Commands::Search {
            query: "world".to_string(),
            scope: vec![notes.clone()],
        })
        .await
        .expect("search");
    assert!(output.contains("notes.md#0  World is great"), "{}", output);

    let output = router
        .route(Commands::Search {
            query: "World".to_string(),
            scope: Vec::new(),
        })
        .await
        .expect("search");
    assert_eq!(output, "No results found.");
}

#[tokio::test]
async fn unreadable_file_drops_its_previous_entry() {
    let dir = tempdir().expect("tempdir");
    let notes = write_notes(&dir);
    let ollama = ollama_replying(200, "unused").await;
    let container = container(dir.path(), &ollama).await;
    let index = container.index_use_case();

    let report = index.execute(&[notes.clone()]).await.expect("index");
    assert_eq!(report.total_chunks(), 1);

    std::fs::write(&notes, [0xff, 0xfe, 0x00, 0x80]).expect("overwrite notes");
    let report = index.execute(&[notes.clone()]).await.expect("index");
    assert_eq!(report.unreadable.len(), 1);

    let repo = container.index_repository();
    assert!(repo.list().await.expect("list").is_empty());
    assert_eq!(repo.count_chunks().await.expect("count"), 0);
}

#[tokio::test]
async fn file_without_qualifying_lines_is_reported_as_empty() {
    let dir = tempdir().expect("tempdir");
    let notes = write_notes(&dir);
    std::fs::write(dir.path().join("tiny.txt"), "tiny\n").expect("write tiny");
    let ollama = ollama_replying(200, "unused").await;
    let container = container(dir.path(), &ollama).await;
    let router = Router::new(&container);

    let output = router
        .route(Commands::Index {
            paths: vec![dir.path().to_path_buf()],
        })
        .await
        .expect("index");
    assert!(output.starts_with("Indexed 1 files (1 chunks)"), "{}", output);
    assert!(output.contains("No qualifying lines (1):"), "{}", output);
    assert!(output.contains("tiny.txt"), "{}", output);

    let files = container.index_repository().list().await.expect("list");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].display_name(), notes.file_name().and_then(|n| n.to_str()).unwrap_or(""));
}

#[tokio::test]
async fn ask_records_provider_failure_as_assistant_message() {
    let dir = tempdir().expect("tempdir");
    let notes = write_notes(&dir);
    let ollama = ollama_replying(500, "model crashed").await;
    let container = container(dir.path(), &ollama).await;
    container
        .index_use_case()
        .execute(&[notes.clone()])
        .await
        .expect("index");

    let chat = container.chat_use_case();
    let outcome = chat
        .ask(AskRequest {
            question: "What is great?".to_string(),
            scope: vec![notes.to_string_lossy().to_string()],
            ..Default::default()
        })
        .await
        .expect("ask");

    assert!(outcome.reply.content().starts_with("Error:"), "{}", outcome.reply.content());
    assert!(outcome.reply.content().contains("500"));

    let conversation = chat.fetch(&outcome.conversation_id).await.expect("fetch");
    assert_eq!(conversation.messages().len(), 3);
    assert_eq!(conversation.messages()[1].content(), "What is great?");
}

#[tokio::test]
async fn ask_answers_with_retrieved_sources() {
    let dir = tempdir().expect("tempdir");
    let notes = write_notes(&dir);
    let ollama = ollama_replying(200, "  The world is great.  ").await;
    let container = container(dir.path(), &ollama).await;
    container
        .index_use_case()
        .execute(&[notes.clone()])
        .await
        .expect("index");

    let chat = container.chat_use_case();
    let first = chat
        .ask(AskRequest {
            question: "What is great?".to_string(),
            scope: vec![notes.to_string_lossy().to_string()],
            ..Default::default()
        })
        .await
        .expect("ask");
    assert_eq!(first.reply.content(), "The world is great.");
    assert_eq!(first.reply.sources(), ["notes.md".to_string()]);

    let second = chat
        .ask(AskRequest {
            question: "Anything else?".to_string(),
            conversation_id: Some(first.conversation_id.clone()),
            ..Default::default()
        })
        .await
        .expect("ask");
    assert_eq!(second.conversation_id, first.conversation_id);

    let conversation = chat.fetch(&first.conversation_id).await.expect("fetch");
    assert_eq!(conversation.messages().len(), 5);
}

#[tokio::test]
async fn exam_with_undecodable_reply_saves_nothing() {
    let dir = tempdir().expect("tempdir");
    let notes = write_notes(&dir);
    let ollama = ollama_replying(200, "{\"title\": \"not a quiz\"}").await;
    let container = container(dir.path(), &ollama).await;
    let router = Router::new(&container);

    router
        .route(Commands::Project(ProjectCommand::AddFile {
            project: "My Library".to_string(),
            path: notes,
        }))
        .await
        .expect("add file");

    let err = router
        .route(Commands::Exam { project: None })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Structured decode failure"), "{}", err);

    let output = router.route(Commands::Quizzes).await.expect("quizzes");
    assert_eq!(output, "No saved exams.");
}

#[tokio::test]
async fn exam_is_saved_after_decoding() {
    let dir = tempdir().expect("tempdir");
    let notes = write_notes(&dir);
    let quiz = json!({
        "quiz_name": "World facts",
        "questions": [{
            "question": "How is the world?",
            "options": ["Flat", "Great"],
            "correct_index": 1,
            "explanation": "The notes say so."
        }]
    });
    let ollama = ollama_replying(200, &format!("```json\n{}\n```", quiz)).await;
    let container = container(dir.path(), &ollama).await;
    let router = Router::new(&container);

    router
        .route(Commands::Project(ProjectCommand::AddFile {
            project: "My Library".to_string(),
            path: notes,
        }))
        .await
        .expect("add file");

    let output = router
        .route(Commands::Exam { project: Some("My Library".to_string()) })
        .await
        .expect("exam");
    assert!(output.starts_with("World facts"), "{}", output);
    assert!(output.contains("* b) Great"), "{}", output);

    let output = router.route(Commands::Quizzes).await.expect("quizzes");
    assert!(output.contains("World facts (1 questions)"), "{}", output);
}

#[tokio::test]
async fn exam_without_material_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let ollama = ollama_replying(200, "unused").await;
    let container = container(dir.path(), &ollama).await;

    let err = container.study_use_case().exam(None).await.unwrap_err();
    assert!(matches!(err, docpilot::DomainError::InvalidInput(_)), "got {:?}", err);
}
