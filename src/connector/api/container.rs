use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    BookmarkStore, ChatBackend, ChatSessionUseCase, ContentExtractor, ConversationRepository,
    GlobalLibraryUseCase, IndexFilesUseCase, IndexRepository, IndexWriter, KeyValueStore,
    LibraryRefRepository, LibraryUseCase, ModelCatalog, ProviderRouter, QuizRepository,
    SearchChunksUseCase, StudyToolsUseCase,
};
use crate::connector::adapter::{
    AnthropicClient, DuckdbConversationRepository, DuckdbIndexRepository, DuckdbKeyValueStore,
    DuckdbLibraryRefRepository, DuckdbQuizRepository, FileContentExtractor, FsBookmarkStore,
    InMemoryConversationRepository, InMemoryIndexRepository, InMemoryKeyValueStore,
    InMemoryLibraryRefRepository, InMemoryQuizRepository, OllamaClient, OpenAiClient,
    PathScopedAccess, TesseractOcr,
};
use crate::domain::ProviderConfig;

pub const DATABASE_FILE: &str = "docpilot.duckdb";

pub struct ContainerConfig {
    pub data_dir: String,
    /// Keep everything in process memory instead of the DuckDB file.
    pub memory_storage: bool,
    /// Files extracted in parallel while indexing.
    pub jobs: usize,
    pub provider: ProviderConfig,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub ollama_base_url: String,
}

impl ContainerConfig {
    /// Provider selection and endpoints from the environment, with local-first
    /// defaults.
    pub fn from_env(data_dir: impl Into<String>, memory_storage: bool, jobs: usize) -> Self {
        let env_or = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
        Self {
            data_dir: data_dir.into(),
            memory_storage,
            jobs,
            provider: ProviderConfig::from_env(),
            openai_base_url: env_or("OPENAI_BASE_URL", crate::connector::adapter::OPENAI_DEFAULT_BASE_URL),
            anthropic_base_url: env_or(
                "ANTHROPIC_BASE_URL",
                crate::connector::adapter::ANTHROPIC_DEFAULT_BASE_URL,
            ),
            ollama_base_url: env_or("OLLAMA_BASE_URL", crate::connector::adapter::OLLAMA_DEFAULT_BASE_URL),
        }
    }
}

/// Constructs every adapter once and hands out use cases wired to them.
pub struct Container {
    index_repo: Arc<dyn IndexRepository>,
    index_writer: IndexWriter,
    extractor: Arc<dyn ContentExtractor>,
    conversations: Arc<dyn ConversationRepository>,
    quizzes: Arc<dyn QuizRepository>,
    library: Arc<LibraryUseCase>,
    global_library: Arc<GlobalLibraryUseCase>,
    router: Arc<ProviderRouter>,
    config: ContainerConfig,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        let db_path = PathBuf::from(&config.data_dir).join(DATABASE_FILE);

        #[allow(clippy::type_complexity)]
        let (index_repo, kv_store, library_refs, conversations, quizzes): (
            Arc<dyn IndexRepository>,
            Arc<dyn KeyValueStore>,
            Arc<dyn LibraryRefRepository>,
            Arc<dyn ConversationRepository>,
            Arc<dyn QuizRepository>,
        ) = if config.memory_storage {
            debug!("Using in-memory storage");
            (
                Arc::new(InMemoryIndexRepository::new()),
                Arc::new(InMemoryKeyValueStore::new()),
                Arc::new(InMemoryLibraryRefRepository::new()),
                Arc::new(InMemoryConversationRepository::new()),
                Arc::new(InMemoryQuizRepository::new()),
            )
        } else {
            debug!("Using DuckDB storage at {:?}", db_path);
            let index = DuckdbIndexRepository::new(&db_path)?;
            // Share the connection with all adapters
            let shared_conn = index.shared_connection();
            (
                Arc::new(index),
                Arc::new(DuckdbKeyValueStore::with_connection(Arc::clone(&shared_conn)).await?),
                Arc::new(DuckdbLibraryRefRepository::with_connection(Arc::clone(&shared_conn)).await?),
                Arc::new(DuckdbConversationRepository::with_connection(Arc::clone(&shared_conn)).await?),
                Arc::new(DuckdbQuizRepository::with_connection(shared_conn).await?),
            )
        };

        let extractor: Arc<dyn ContentExtractor> = Arc::new(FileContentExtractor::new(
            Arc::new(PathScopedAccess::new()),
            Arc::new(TesseractOcr::from_env()),
        ));
        let bookmarks: Arc<dyn BookmarkStore> = Arc::new(FsBookmarkStore::new());

        let ollama = Arc::new(OllamaClient::new(&config.ollama_base_url));
        let router = Arc::new(ProviderRouter::new(
            config.provider.clone(),
            Arc::new(OpenAiClient::new(&config.openai_base_url)) as Arc<dyn ChatBackend>,
            Arc::new(AnthropicClient::new(&config.anthropic_base_url)) as Arc<dyn ChatBackend>,
            ollama.clone() as Arc<dyn ChatBackend>,
            ollama as Arc<dyn ModelCatalog>,
        ));

        let library = Arc::new(LibraryUseCase::new(kv_store, extractor.clone()));
        let global_library = Arc::new(GlobalLibraryUseCase::new(
            library_refs,
            bookmarks,
            extractor.clone(),
        ));
        let index_writer = IndexWriter::spawn(index_repo.clone());

        Ok(Self {
            index_repo,
            index_writer,
            extractor,
            conversations,
            quizzes,
            library,
            global_library,
            router,
            config,
        })
    }

    pub fn index_use_case(&self) -> IndexFilesUseCase {
        IndexFilesUseCase::new(
            self.extractor.clone(),
            self.index_writer.clone(),
            self.config.jobs,
        )
    }

    pub fn search_use_case(&self) -> SearchChunksUseCase {
        SearchChunksUseCase::new(self.index_repo.clone())
    }

    pub fn chat_use_case(&self) -> ChatSessionUseCase {
        ChatSessionUseCase::new(
            self.conversations.clone(),
            Arc::new(self.search_use_case()),
            self.library.clone(),
            self.global_library.clone(),
            self.extractor.clone(),
            self.router.clone(),
        )
    }

    pub fn study_use_case(&self) -> StudyToolsUseCase {
        StudyToolsUseCase::new(
            self.router.clone(),
            self.library.clone(),
            self.conversations.clone(),
            self.quizzes.clone(),
            self.extractor.clone(),
        )
    }

    pub fn index_repository(&self) -> Arc<dyn IndexRepository> {
        self.index_repo.clone()
    }

    pub fn library(&self) -> Arc<LibraryUseCase> {
        self.library.clone()
    }

    pub fn global_library(&self) -> Arc<GlobalLibraryUseCase> {
        self.global_library.clone()
    }

    pub fn router(&self) -> Arc<ProviderRouter> {
        self.router.clone()
    }

    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }

    pub fn memory_storage(&self) -> bool {
        self.config.memory_storage
    }
}
