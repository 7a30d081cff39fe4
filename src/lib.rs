pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::{Commands, LibraryCommand, ProjectCommand};

pub use application::{
    ChatBackend, ContentExtractor, ConversationRepository, IndexRepository, KeyValueStore,
    ChatSessionUseCase, GlobalLibraryUseCase, IndexFilesUseCase, LibraryUseCase, ProviderRouter,
    SearchChunksUseCase, StudyToolsUseCase,
};

pub use connector::{Container, ContainerConfig, Router};

pub use domain::{
    chunk_text, ChunkHit, Conversation, DomainError, IndexedFile, Message, Mode, Project,
    ProviderConfig, ProviderKind, Quiz, SearchQuery,
};
