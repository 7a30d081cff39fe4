use async_trait::async_trait;

use crate::domain::{Conversation, DomainError, Message};

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Inserts the conversation and all of its messages.
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError>;

    async fn append_message(&self, conversation_id: &str, message: &Message) -> Result<(), DomainError>;

    async fn fetch(&self, id: &str) -> Result<Option<Conversation>, DomainError>;

    /// All conversations, newest first, with their messages.
    async fn list(&self) -> Result<Vec<Conversation>, DomainError>;
}
