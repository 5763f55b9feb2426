//! Adapter for Gemini's `generateContent` endpoint.
//!
//! Gemini gets the prompt as its only input and has no JSON-only switch
//! here, so its text can come back wrapped in markdown code fences.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use salescopy_core::{ProviderEndpoint, ProviderKind};
use serde::{Deserialize, Serialize};

use super::{map_send_error, status_error, Provider};
use crate::credentials::ApiKey;
use crate::error::ProviderError;
use crate::types::Prompt;

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiProvider {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(endpoint: &ProviderEndpoint, timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            model: endpoint.model.clone(),
            timeout_secs,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn generate(&self, prompt: &Prompt, api_key: &ApiKey) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt.text }],
            }],
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(ProviderKind::Gemini, self.timeout_secs, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_send_error(ProviderKind::Gemini, self.timeout_secs, e))?;

        tracing::debug!(
            provider = "gemini",
            model = %self.model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            "generateContent returned"
        );

        if !status.is_success() {
            return Err(status_error(ProviderKind::Gemini, status, &text));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Deserialize {
                context: "gemini generateContent".to_string(),
                source: e,
            })?;

        let joined: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if joined.trim().is_empty() {
            return Err(ProviderError::EmptyResponse(ProviderKind::Gemini));
        }
        Ok(joined)
    }
}
