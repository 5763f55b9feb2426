use salescopy_core::ProviderKind;
use thiserror::Error;

/// Errors raised while selecting or calling a model backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend did not answer within the configured bound.
    #[error("{provider} did not respond within {timeout_secs}s")]
    Timeout {
        provider: ProviderKind,
        timeout_secs: u64,
    },

    /// Neither the request nor the process configuration supplied a key.
    #[error("missing API key for {0}")]
    MissingCredential(ProviderKind),

    /// The requested backend identifier is absent or not one we know.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("{provider} rejected the credential (HTTP {status})")]
    Unauthorized { provider: ProviderKind, status: u16 },

    #[error("unexpected HTTP status {status} from {provider}: {body}")]
    UnexpectedStatus {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    #[error("{0} returned an empty response")]
    EmptyResponse(ProviderKind),

    /// The provider's envelope (not the model text) could not be decoded.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ProviderError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout { .. })
    }
}
