use std::path::PathBuf;

use anyhow::Result;

use crate::application::{canonical_identity, AskRequest};
use crate::domain::Conversation;

use super::super::Container;

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(
        &self,
        question: String,
        scope: Vec<PathBuf>,
        attachments: Vec<PathBuf>,
        conversation_id: Option<String>,
    ) -> Result<String> {
        let request = AskRequest {
            question,
            scope: scope.iter().map(|p| canonical_identity(p)).collect(),
            attachments,
            conversation_id,
        };

        let use_case = self.container.chat_use_case();
        let outcome = use_case.ask(request).await?;

        let mut output = outcome.reply.content().to_string();
        if !outcome.reply.sources().is_empty() {
            output.push_str(&format!("\n\nSources: {}", outcome.reply.sources().join(", ")));
        }
        output.push_str(&format!("\n\n[conversation {}]", outcome.conversation_id));
        Ok(output)
    }

    pub async fn list(&self) -> Result<String> {
        let use_case = self.container.chat_use_case();
        let conversations = use_case.list().await?;

        Ok(self.format_conversations(&conversations))
    }

    fn format_conversations(&self, conversations: &[Conversation]) -> String {
        if conversations.is_empty() {
            return "No conversations yet.".to_string();
        }

        let mut output = String::new();
        for conversation in conversations {
            output.push_str(&format!(
                "{}  {} ({} messages)\n",
                conversation.id(),
                conversation.title(),
                conversation.messages().len()
            ));
        }
        output.trim_end().to_string()
    }
}
