use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ChatBackend, ModelCatalog};
use crate::domain::{
    ChatMessage, ChatRequest, DomainError, Mode, ProviderConfig, ProviderKind, Quiz, DEFAULT_MODEL,
};

pub const CHAT_PROMPT: &str = "You are a helpful assistant that answers questions about the user's \
documents. Use the provided context when it is relevant and say so when it does not contain the answer.";

pub const SUMMARY_PROMPT: &str = "You summarize documents. Write a short overview of the document: \
its purpose, its main points and any conclusions. Use plain prose.";

pub const NOTEBOOK_PROMPT: &str = "You turn chat transcripts into study notes. Rewrite the conversation \
as a structured notebook with headings and bullet points, keeping every fact that was established.";

pub const EXAM_PROMPT: &str = "You write multiple-choice exams from reference material. Reply with JSON \
only, no prose, in exactly this shape: {\"quiz_name\": string, \"questions\": [{\"question\": string, \
\"options\": [string], \"correct_index\": number, \"explanation\": string}]}. correct_index is the \
zero-based index of the right option.";

pub const TIMELINE_PROMPT: &str = "You extract timelines. List every dated event in the material in \
chronological order, one per line, formatted as `DATE - event`.";

/// Chooses a language-model backend from the provider configuration and
/// sends assembled conversations to it.
///
/// Only the primary cloud provider takes part in [`Mode`] resolution. A
/// secondary cloud provider is still reached through its own client by
/// [`ProviderRouter::generate_for`], even though its mode resolves to local.
pub struct ProviderRouter {
    config: ProviderConfig,
    primary: Arc<dyn ChatBackend>,
    secondary: Arc<dyn ChatBackend>,
    local: Arc<dyn ChatBackend>,
    catalog: Arc<dyn ModelCatalog>,
}

impl ProviderRouter {
    pub fn new(
        config: ProviderConfig,
        primary: Arc<dyn ChatBackend>,
        secondary: Arc<dyn ChatBackend>,
        local: Arc<dyn ChatBackend>,
        catalog: Arc<dyn ModelCatalog>,
    ) -> Self {
        Self {
            config,
            primary,
            secondary,
            local,
            catalog,
        }
    }

    /// Remote only when the primary cloud provider is selected and has a
    /// non-blank credential.
    pub fn resolve_mode(config: &ProviderConfig) -> Mode {
        match config.provider_kind() {
            Some(ProviderKind::OpenAi) if config.credential(ProviderKind::OpenAi).is_some() => {
                Mode::Remote
            }
            _ => Mode::Local,
        }
    }

    pub fn mode(&self) -> Mode {
        Self::resolve_mode(&self.config)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Sends the assembled conversation to the backend for `mode` and
    /// returns the trimmed reply.
    pub async fn generate(
        &self,
        mode: Mode,
        system_prompt: &str,
        user_context: &str,
        history: &[ChatMessage],
    ) -> Result<String, DomainError> {
        let messages = assemble_messages(system_prompt, user_context, history);
        let request = match mode {
            Mode::Remote => ChatRequest {
                model: self.config.model().to_string(),
                messages,
                credential: self.config.credential(ProviderKind::OpenAi).map(str::to_string),
            },
            Mode::Local => ChatRequest {
                model: self.local_model().to_string(),
                messages,
                credential: None,
            },
        };
        let backend = match mode {
            Mode::Remote => &self.primary,
            Mode::Local => &self.local,
        };
        self.dispatch(backend, mode.as_str(), &request).await
    }

    /// Generates with whatever backend the configuration selects at the call
    /// site. A secondary cloud provider with a credential goes to its own
    /// client; everything else follows [`ProviderRouter::mode`].
    pub async fn generate_for(
        &self,
        system_prompt: &str,
        user_context: &str,
        history: &[ChatMessage],
    ) -> Result<String, DomainError> {
        if self.config.provider_kind() == Some(ProviderKind::Anthropic) {
            if let Some(credential) = self.config.credential(ProviderKind::Anthropic) {
                let request = ChatRequest {
                    model: self.config.model().to_string(),
                    messages: assemble_messages(system_prompt, user_context, history),
                    credential: Some(credential.to_string()),
                };
                return self.dispatch(&self.secondary, "anthropic", &request).await;
            }
        }
        self.generate(self.mode(), system_prompt, user_context, history)
            .await
    }

    pub async fn summarize(&self, document: &str) -> Result<String, DomainError> {
        self.generate_for(
            SUMMARY_PROMPT,
            document,
            &[ChatMessage::user("Summarize this document.")],
        )
        .await
    }

    pub async fn notebook(&self, transcript: &str) -> Result<String, DomainError> {
        self.generate_for(
            NOTEBOOK_PROMPT,
            transcript,
            &[ChatMessage::user("Write the notebook for this conversation.")],
        )
        .await
    }

    pub async fn timeline(&self, material: &str) -> Result<String, DomainError> {
        self.generate_for(
            TIMELINE_PROMPT,
            material,
            &[ChatMessage::user("Extract the timeline.")],
        )
        .await
    }

    /// Generates an exam and decodes it. Nothing is returned unless the
    /// whole reply decodes.
    pub async fn exam(&self, material: &str) -> Result<Quiz, DomainError> {
        let raw = self
            .generate_for(
                EXAM_PROMPT,
                material,
                &[ChatMessage::user("Write the exam as JSON.")],
            )
            .await?;
        let quiz = Quiz::decode(&raw)?;
        info!("Generated quiz '{}' with {} questions", quiz.name(), quiz.questions().len());
        Ok(quiz)
    }

    pub async fn list_local_models(&self) -> Result<Vec<String>, DomainError> {
        self.catalog.list_models().await
    }

    /// The configured model when the local provider is selected; otherwise
    /// the configured name belongs to a cloud provider and the local default
    /// is used instead.
    fn local_model(&self) -> &str {
        match self.config.provider_kind() {
            Some(ProviderKind::Ollama) => self.config.model(),
            _ => DEFAULT_MODEL,
        }
    }

    async fn dispatch(
        &self,
        backend: &Arc<dyn ChatBackend>,
        label: &str,
        request: &ChatRequest,
    ) -> Result<String, DomainError> {
        debug!(
            "Dispatching {} messages to {} backend (model {})",
            request.messages.len(),
            label,
            request.model
        );
        let text = backend.chat(request).await?;
        Ok(text.trim().to_string())
    }
}

/// System prompt, then the context (if any), then the history in order. A
/// lone greeting turn carries no information and is left out.
pub fn assemble_messages(
    system_prompt: &str,
    user_context: &str,
    history: &[ChatMessage],
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt)];
    if !user_context.trim().is_empty() {
        messages.push(ChatMessage::user(format!("Context:\n{}", user_context)));
    }
    let lone_greeting = history.len() == 1 && history[0].is_greeting();
    if !lone_greeting {
        messages.extend(history.iter().cloned());
    }
    messages
}
