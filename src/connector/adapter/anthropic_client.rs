use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatBackend;
use crate::domain::{ChatRequest, DomainError, Role};

pub const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// HTTP client for the Anthropic Messages API, the secondary cloud provider.
///
/// System turns are lifted into the top-level `system` field; the remaining
/// turns keep their order.
///
/// ```text
/// ANTHROPIC_BASE_URL=https://api.anthropic.com
/// ANTHROPIC_API_KEY=sk-ant-...
/// ```
pub struct AnthropicClient {
    client: reqwest::Client,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
}

impl AnthropicClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{MESSAGES_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl ChatBackend for AnthropicClient {
    async fn chat(&self, request: &ChatRequest) -> Result<String, DomainError> {
        let api_key = request
            .credential
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DomainError::invalid_credential("Anthropic API key is empty"))?;

        let system = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let messages = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| ApiMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        let body = ApiRequest {
            model: &request.model,
            max_tokens: MAX_TOKENS,
            system: Some(system.as_str()).filter(|s| !s.is_empty()),
            messages,
        };

        debug!("AnthropicClient: POST {} model={}", self.url, request.model);
        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::transport("AnthropicClient: request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicClient: API returned {status}: {body}");
            return Err(DomainError::rejected(status.as_u16(), body));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::malformed(format!("AnthropicClient: failed to parse response: {e}"))
        })?;

        api_response
            .content
            .into_iter()
            .map(|b| b.text)
            .reduce(|a, b| a + &b)
            .ok_or_else(|| DomainError::malformed("AnthropicClient: response has no content blocks"))
    }
}
