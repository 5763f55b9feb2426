//! Adapter for OpenAI-style `/chat/completions` endpoints.
//!
//! Used for OpenAI itself and for X.AI's Grok, which speaks the same
//! protocol from a different host and model identifier.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use salescopy_core::{ProviderEndpoint, ProviderKind};
use serde::{Deserialize, Serialize};

use super::{map_send_error, status_error, Provider};
use crate::credentials::ApiKey;
use crate::error::ProviderError;
use crate::types::{Prompt, ResponseFormat};

const TEMPERATURE: f32 = 0.7;

pub struct OpenAiCompatibleProvider {
    kind: ProviderKind,
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<JsonMode>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct JsonMode {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
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

impl OpenAiCompatibleProvider {
    /// Creates an adapter for `kind` against the given host and model.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        kind: ProviderKind,
        endpoint: &ProviderEndpoint,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            kind,
            client,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            model: endpoint.model.clone(),
            timeout_secs,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn generate(&self, prompt: &Prompt, api_key: &ApiKey) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.text,
                },
            ],
            temperature: TEMPERATURE,
            response_format: match prompt.format {
                ResponseFormat::Json => Some(JsonMode {
                    kind: "json_object",
                }),
                ResponseFormat::Text => None,
            },
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(self.kind, self.timeout_secs, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_send_error(self.kind, self.timeout_secs, e))?;

        tracing::debug!(
            provider = %self.kind,
            model = %self.model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            "chat completion returned"
        );

        if !status.is_success() {
            return Err(status_error(self.kind, status, &text));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Deserialize {
                context: format!("{} chat completion", self.kind),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse(self.kind))
    }
}
