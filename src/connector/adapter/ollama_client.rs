use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ChatBackend, ModelCatalog};
use crate::domain::{ChatMessage, ChatRequest, DomainError};

pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";
const GENERATE_PATH: &str = "/api/generate";
const TAGS_PATH: &str = "/api/tags";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for a locally hosted Ollama server. No credential is needed.
///
/// `/api/generate` takes a single prompt, so the message sequence is
/// flattened into one transcript ending with an open assistant turn.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }
}

pub fn flatten_prompt(messages: &[ChatMessage]) -> String {
    let mut prompt = messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    prompt.push_str("\n\nassistant:");
    prompt
}

#[async_trait]
impl ChatBackend for OllamaClient {
    async fn chat(&self, request: &ChatRequest) -> Result<String, DomainError> {
        let url = format!("{}{GENERATE_PATH}", self.base_url);
        let prompt = flatten_prompt(&request.messages);
        let body = GenerateRequest {
            model: &request.model,
            prompt: &prompt,
            stream: false,
        };

        debug!("OllamaClient: POST {} model={}", url, request.model);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("OllamaClient: cannot reach {}", self.base_url), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OllamaClient: server returned {status}: {body}");
            return Err(DomainError::rejected(status.as_u16(), body));
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            DomainError::malformed(format!("OllamaClient: failed to parse response: {e}"))
        })?;
        Ok(generated.response)
    }
}

#[async_trait]
impl ModelCatalog for OllamaClient {
    async fn list_models(&self) -> Result<Vec<String>, DomainError> {
        let url = format!("{}{TAGS_PATH}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("OllamaClient: cannot reach {}", self.base_url), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::rejected(status.as_u16(), body));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            DomainError::malformed(format!("OllamaClient: failed to parse model list: {e}"))
        })?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}
