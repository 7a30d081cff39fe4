use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{
    canonical_identity, ContentExtractor, ConversationRepository, GlobalLibraryUseCase,
    LibraryUseCase, ProviderRouter, SearchChunksUseCase, CHAT_PROMPT,
};
use crate::domain::{
    format_hits_as_context, Conversation, DomainError, Message, Role, SearchQuery, CONTEXT_RULE,
};

const TITLE_CHARS: usize = 60;

/// One question asked within a conversation.
#[derive(Debug, Clone, Default)]
pub struct AskRequest {
    pub question: String,
    /// Index identities retrieval is restricted to.
    pub scope: Vec<String>,
    /// Files read directly into context; when present, retrieval is skipped.
    pub attachments: Vec<PathBuf>,
    /// Continue this conversation instead of starting a new one.
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AskOutcome {
    pub conversation_id: String,
    pub reply: Message,
}

/// Runs a conversation turn: records the question, assembles context from
/// attachments or retrieval plus both libraries, and records the reply.
///
/// A provider failure does not end the session; it is recorded as one
/// assistant message starting with `Error:`.
pub struct ChatSessionUseCase {
    conversations: Arc<dyn ConversationRepository>,
    retriever: Arc<SearchChunksUseCase>,
    library: Arc<LibraryUseCase>,
    global_library: Arc<GlobalLibraryUseCase>,
    extractor: Arc<dyn ContentExtractor>,
    router: Arc<ProviderRouter>,
}

impl ChatSessionUseCase {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        retriever: Arc<SearchChunksUseCase>,
        library: Arc<LibraryUseCase>,
        global_library: Arc<GlobalLibraryUseCase>,
        extractor: Arc<dyn ContentExtractor>,
        router: Arc<ProviderRouter>,
    ) -> Self {
        Self {
            conversations,
            retriever,
            library,
            global_library,
            extractor,
            router,
        }
    }

    pub async fn ask(&self, request: AskRequest) -> Result<AskOutcome, DomainError> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(DomainError::invalid_input("Question must not be empty"));
        }

        let mut conversation = self.open_conversation(request.conversation_id.as_deref(), question).await?;

        let attachments: Vec<String> = request
            .attachments
            .iter()
            .map(|p| canonical_identity(p))
            .collect();
        let user_message = Message::new(Role::User, question).with_attachments(attachments);
        self.conversations
            .append_message(conversation.id(), &user_message)
            .await?;
        conversation.push(user_message);

        let (context, sources) = self.assemble_context(question, &request).await?;
        debug!("Assembled {} bytes of context from {} sources", context.len(), sources.len());

        let reply = match self
            .router
            .generate_for(CHAT_PROMPT, &context, &conversation.history())
            .await
        {
            Ok(text) => Message::new(Role::Assistant, text).with_sources(sources),
            Err(e) => {
                warn!("Provider call failed: {}", e);
                Message::new(Role::Assistant, format!("Error: {}", e))
            }
        };

        self.conversations
            .append_message(conversation.id(), &reply)
            .await?;
        info!("Answered in conversation {}", conversation.id());

        Ok(AskOutcome {
            conversation_id: conversation.id().to_string(),
            reply,
        })
    }

    pub async fn list(&self) -> Result<Vec<Conversation>, DomainError> {
        self.conversations.list().await
    }

    pub async fn fetch(&self, id: &str) -> Result<Conversation, DomainError> {
        self.conversations
            .fetch(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("conversation {}", id)))
    }

    async fn open_conversation(&self, id: Option<&str>, question: &str) -> Result<Conversation, DomainError> {
        if let Some(id) = id {
            return self.fetch(id).await;
        }
        let title: String = question.chars().take(TITLE_CHARS).collect();
        let conversation = Conversation::new(title);
        self.conversations.save(&conversation).await?;
        debug!("Started conversation {}", conversation.id());
        Ok(conversation)
    }

    /// Returns the joined context and the names of the files it drew on.
    async fn assemble_context(
        &self,
        question: &str,
        request: &AskRequest,
    ) -> Result<(String, Vec<String>), DomainError> {
        let mut sections = Vec::new();
        let mut sources = Vec::new();

        if request.attachments.is_empty() {
            let query = SearchQuery::new(question).with_scope(request.scope.clone());
            let hits = self.retriever.execute(&query).await?;
            for hit in &hits {
                if !sources.iter().any(|s| s == hit.file_name()) {
                    sources.push(hit.file_name().to_string());
                }
            }
            if !hits.is_empty() {
                sections.push(format_hits_as_context(&hits));
            }
        } else {
            for path in &request.attachments {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.to_string_lossy().to_string());
                match self.extractor.extract(path).await {
                    Ok(content) => {
                        sections.push(format!("--- {} ---\n{}", name, content));
                        sources.push(name);
                    }
                    Err(e) => warn!("Skipping attachment {}: {}", path.display(), e),
                }
            }
        }

        let project_context = self.library.active_context().await?;
        if !project_context.is_empty() {
            sections.push(project_context);
        }
        let global_context = self.global_library.context().await?;
        if !global_context.is_empty() {
            sections.push(global_context);
        }

        Ok((sections.join(CONTEXT_RULE), sources))
    }
}
