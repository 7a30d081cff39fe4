use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PROVIDER: &str = "ollama";
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Text of the assistant turn that opens every new conversation.
pub const GREETING: &str = "Hi! Ask me anything about your documents.";

/// Known language-model backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// The primary cloud provider; the only one that gates [`Mode::Remote`].
    OpenAi,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "anthropic" | "claude" => Some(ProviderKind::Anthropic),
            "ollama" | "local" => Some(ProviderKind::Ollama),
            _ => None,
        }
    }

    pub fn is_cloud(&self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Backend family chosen for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Remote,
    Local,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Remote => "remote",
            Mode::Local => "local",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provider selection owned by the settings layer. Read-only to the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    provider: String,
    model: String,
    credentials: HashMap<String, String>,
}

impl ProviderConfig {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            credentials: HashMap::new(),
        }
    }

    pub fn with_credential(mut self, provider: impl Into<String>, credential: impl Into<String>) -> Self {
        self.credentials.insert(provider.into(), credential.into());
        self
    }

    /// Reads the selection from the process environment:
    ///
    /// | Variable            | Default    |
    /// |---------------------|------------|
    /// | `DOCPILOT_PROVIDER` | `ollama`   |
    /// | `DOCPILOT_MODEL`    | `llama3.2` |
    /// | `OPENAI_API_KEY`    | unset      |
    /// | `ANTHROPIC_API_KEY` | unset      |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let provider = lookup("DOCPILOT_PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
        let model = lookup("DOCPILOT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let mut config = Self::new(provider, model);
        if let Some(key) = lookup("OPENAI_API_KEY") {
            config = config.with_credential(ProviderKind::OpenAi.as_str(), key);
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            config = config.with_credential(ProviderKind::Anthropic.as_str(), key);
        }
        config
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn provider_kind(&self) -> Option<ProviderKind> {
        ProviderKind::parse(&self.provider)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The credential for `kind`, if present and non-blank.
    pub fn credential(&self, kind: ProviderKind) -> Option<&str> {
        self.credentials
            .get(kind.as_str())
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// One turn sent to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn greeting() -> Self {
        Self::assistant(GREETING)
    }

    pub fn is_greeting(&self) -> bool {
        self.role == Role::Assistant && self.content == GREETING
    }
}

/// A fully assembled backend request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub credential: Option<String>,
}
