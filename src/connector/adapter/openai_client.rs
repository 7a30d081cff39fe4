use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatBackend;
use crate::domain::{ChatRequest, DomainError};

pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for OpenAI-compatible chat completion endpoints, the primary
/// cloud provider.
///
/// ```text
/// OPENAI_BASE_URL=https://api.openai.com
/// OPENAI_API_KEY=sk-...
/// ```
pub struct OpenAiClient {
    client: reqwest::Client,
    url: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{COMPLETIONS_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn chat(&self, request: &ChatRequest) -> Result<String, DomainError> {
        let api_key = request
            .credential
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DomainError::invalid_credential("OpenAI API key is empty"))?;

        let body = ApiRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
        };

        debug!("OpenAiClient: POST {} model={}", self.url, request.model);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::transport("OpenAiClient: request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAiClient: API returned {status}: {body}");
            return Err(DomainError::rejected(status.as_u16(), body));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::malformed(format!("OpenAiClient: failed to parse response: {e}"))
        })?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DomainError::malformed("OpenAiClient: response has no choices"))
    }
}
