use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::application::{
    ContentExtractor, ConversationRepository, LibraryUseCase, ProviderRouter, QuizRepository,
};
use crate::domain::{DomainError, Quiz};

/// Summaries, notebooks, exams and timelines built on the provider router.
pub struct StudyToolsUseCase {
    router: Arc<ProviderRouter>,
    library: Arc<LibraryUseCase>,
    conversations: Arc<dyn ConversationRepository>,
    quizzes: Arc<dyn QuizRepository>,
    extractor: Arc<dyn ContentExtractor>,
}

impl StudyToolsUseCase {
    pub fn new(
        router: Arc<ProviderRouter>,
        library: Arc<LibraryUseCase>,
        conversations: Arc<dyn ConversationRepository>,
        quizzes: Arc<dyn QuizRepository>,
        extractor: Arc<dyn ContentExtractor>,
    ) -> Self {
        Self {
            router,
            library,
            conversations,
            quizzes,
            extractor,
        }
    }

    pub async fn summarize(&self, path: &Path) -> Result<String, DomainError> {
        let document = self.extractor.extract(path).await?;
        self.router.summarize(&document).await
    }

    pub async fn notebook(&self, conversation_id: &str) -> Result<String, DomainError> {
        let conversation = self
            .conversations
            .fetch(conversation_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("conversation {}", conversation_id)))?;
        self.router.notebook(&conversation.transcript()).await
    }

    pub async fn timeline(&self, project: Option<&str>) -> Result<String, DomainError> {
        let material = self.material(project).await?;
        self.router.timeline(&material).await
    }

    /// Generates an exam from project material and saves it. A reply that
    /// fails to decode leaves nothing behind.
    pub async fn exam(&self, project: Option<&str>) -> Result<Quiz, DomainError> {
        let material = self.material(project).await?;
        let quiz = self.router.exam(&material).await?;
        self.quizzes.save(&quiz).await?;
        info!("Saved quiz {}", quiz.id());
        Ok(quiz)
    }

    pub async fn quizzes(&self) -> Result<Vec<Quiz>, DomainError> {
        self.quizzes.list().await
    }

    async fn material(&self, project: Option<&str>) -> Result<String, DomainError> {
        let material = match project {
            Some(project) => self.library.project_context(project).await?,
            None => self.library.active_context().await?,
        };
        if material.trim().is_empty() {
            return Err(DomainError::invalid_input(
                "No project material; add files to a project first",
            ));
        }
        Ok(material)
    }
}
