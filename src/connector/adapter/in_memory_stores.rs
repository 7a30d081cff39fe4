use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::{ConversationRepository, KeyValueStore, LibraryRefRepository, QuizRepository};
use crate::domain::{BookmarkToken, Conversation, DomainError, LibraryFileRef, Message, Quiz};

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn fetch(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.values.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLibraryRefRepository {
    refs: Arc<Mutex<Vec<LibraryFileRef>>>,
}

impl InMemoryLibraryRefRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LibraryRefRepository for InMemoryLibraryRefRepository {
    async fn save(&self, file_ref: &LibraryFileRef) -> Result<(), DomainError> {
        let mut refs = self.refs.lock().await;
        match refs.iter_mut().find(|r| r.token() == file_ref.token()) {
            Some(existing) => *existing = file_ref.clone(),
            None => refs.push(file_ref.clone()),
        }
        Ok(())
    }

    async fn delete(&self, token: &BookmarkToken) -> Result<bool, DomainError> {
        let mut refs = self.refs.lock().await;
        let before = refs.len();
        refs.retain(|r| r.token() != token);
        Ok(refs.len() != before)
    }

    async fn list(&self) -> Result<Vec<LibraryFileRef>, DomainError> {
        Ok(self.refs.lock().await.clone())
    }
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: Arc<Mutex<Vec<Conversation>>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        let mut conversations = self.conversations.lock().await;
        match conversations.iter_mut().find(|c| c.id() == conversation.id()) {
            Some(existing) => *existing = conversation.clone(),
            None => conversations.push(conversation.clone()),
        }
        Ok(())
    }

    async fn append_message(&self, conversation_id: &str, message: &Message) -> Result<(), DomainError> {
        let mut conversations = self.conversations.lock().await;
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id() == conversation_id)
            .ok_or_else(|| DomainError::not_found(format!("conversation {}", conversation_id)))?;
        conversation.push(message.clone());
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<Option<Conversation>, DomainError> {
        let conversations = self.conversations.lock().await;
        Ok(conversations.iter().find(|c| c.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Conversation>, DomainError> {
        let mut conversations = self.conversations.lock().await.clone();
        conversations.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then_with(|| a.id().cmp(b.id())));
        Ok(conversations)
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<Mutex<Vec<Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn save(&self, quiz: &Quiz) -> Result<(), DomainError> {
        self.quizzes.lock().await.push(quiz.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Quiz>, DomainError> {
        let mut quizzes = self.quizzes.lock().await.clone();
        quizzes.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then_with(|| a.id().cmp(b.id())));
        Ok(quizzes)
    }
}
