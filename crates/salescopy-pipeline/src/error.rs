use salescopy_llm::ProviderError;
use thiserror::Error;

use crate::stage::Stage;

/// Failures of the text-extraction fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content fetch did not complete within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("invalid URL \"{url}\": expected an http(s) address")]
    InvalidUrl { url: String },

    #[error("unexpected HTTP status {status} while fetching {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("reader returned non-text content ({content_type})")]
    NotText { content_type: String },

    #[error("reader returned no text for {url}")]
    EmptyBody { url: String },
}

/// Failures turning raw model text into a stage's structure.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{stage} response is not valid JSON: {source}")]
    Parse {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("{stage} response has an unexpected shape: {reason}")]
    Shape { stage: Stage, reason: String },

    #[error("expected {expected} sales angles, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("{stage} response is missing required field `{field}`")]
    MissingField { stage: Stage, field: &'static str },
}

/// Terminal failure of one stage invocation. No partial output accompanies it.
#[derive(Debug, Error)]
pub enum StageError {
    /// A required input was missing or unusable; detected before any outbound call.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl StageError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        StageError::Validation(message.into())
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, StageError::Validation(_))
    }

    #[must_use]
    pub fn is_unsupported_provider(&self) -> bool {
        matches!(
            self,
            StageError::Provider(ProviderError::UnsupportedProvider(_))
        )
    }

    /// True when an outbound call hit its bounded wait.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            StageError::Provider(e) => e.is_timeout(),
            StageError::Fetch(FetchError::Timeout { .. }) => true,
            _ => false,
        }
    }
}
