use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{current_timestamp, ChatMessage, Role};

/// A persisted chat turn.
///
/// `sources` and `attachments` are always held decoded; adapters serialize
/// them at the persistence edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    id: String,
    role: Role,
    content: String,
    created_at: i64,
    sources: Vec<String>,
    attachments: Vec<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: current_timestamp(),
            sources: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn reconstitute(
        id: String,
        role: Role,
        content: String,
        created_at: i64,
        sources: Vec<String>,
        attachments: Vec<String>,
    ) -> Self {
        Self {
            id,
            role,
            content,
            created_at,
            sources,
            attachments,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    id: String,
    title: String,
    created_at: i64,
    messages: Vec<Message>,
}

impl Conversation {
    /// Starts a conversation seeded with the assistant greeting.
    pub fn new(title: impl Into<String>) -> Self {
        let greeting = ChatMessage::greeting();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: current_timestamp(),
            messages: vec![Message::new(greeting.role, greeting.content)],
        }
    }

    pub fn reconstitute(id: String, title: String, created_at: i64, messages: Vec<Message>) -> Self {
        Self {
            id,
            title,
            created_at,
            messages,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(Message::to_chat_message).collect()
    }

    /// Plain transcript, one `role: content` paragraph per turn.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role().as_str(), m.content()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
