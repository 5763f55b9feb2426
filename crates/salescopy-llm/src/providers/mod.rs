//! HTTP adapters for the supported model backends.

mod gemini;
mod openai;

use async_trait::async_trait;
use salescopy_core::ProviderKind;

use crate::credentials::ApiKey;
use crate::error::ProviderError;
use crate::types::Prompt;

pub use gemini::GeminiProvider;
pub use openai::OpenAiCompatibleProvider;

/// Longest slice of an error body kept in [`ProviderError::UnexpectedStatus`].
const ERROR_BODY_PREVIEW_CHARS: usize = 500;

/// The one capability every backend shares: accept a prompt, return text.
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Sends `prompt` to the backend and returns the model's raw text.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] on network failure, timeout, a rejected
    /// credential, a non-2xx status, or an empty/undecodable envelope.
    async fn generate(&self, prompt: &Prompt, api_key: &ApiKey) -> Result<String, ProviderError>;
}

/// Converts a transport error, turning client-side timeouts into
/// [`ProviderError::Timeout`].
pub(crate) fn map_send_error(
    provider: ProviderKind,
    timeout_secs: u64,
    err: reqwest::Error,
) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            provider,
            timeout_secs,
        }
    } else {
        ProviderError::Http(err)
    }
}

/// Maps a non-2xx status and its body to a typed error.
pub(crate) fn status_error(
    provider: ProviderKind,
    status: reqwest::StatusCode,
    body: &str,
) -> ProviderError {
    let code = status.as_u16();
    if code == 401 || code == 403 {
        return ProviderError::Unauthorized {
            provider,
            status: code,
        };
    }
    ProviderError::UnexpectedStatus {
        provider,
        status: code,
        body: body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = status_error(ProviderKind::OpenAi, status, "nope");
            assert!(matches!(err, ProviderError::Unauthorized { .. }), "{err}");
        }
    }

    #[test]
    fn other_statuses_keep_a_bounded_body_preview() {
        let body = "x".repeat(2_000);
        let err = status_error(ProviderKind::Gemini, StatusCode::BAD_GATEWAY, &body);
        match err {
            ProviderError::UnexpectedStatus { status, body, .. } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), ERROR_BODY_PREVIEW_CHARS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
