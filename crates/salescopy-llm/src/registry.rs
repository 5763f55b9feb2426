//! Lookup from backend identifier to adapter, plus credential pre-flight.

use std::collections::HashMap;
use std::sync::Arc;

use salescopy_core::{AppConfig, ProviderKeys, ProviderKind};

use crate::credentials::{resolve_credential, ApiKey};
use crate::error::ProviderError;
use crate::providers::{GeminiProvider, OpenAiCompatibleProvider, Provider};
use crate::types::Prompt;

/// Immutable set of adapters and the process-wide fallback keys.
///
/// Built once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn Provider>>,
    fallback_keys: ProviderKeys,
}

/// An adapter paired with the credential resolved for this request.
#[derive(Clone)]
pub struct SelectedProvider {
    provider: Arc<dyn Provider>,
    api_key: ApiKey,
}

impl ProviderRegistry {
    /// Creates an empty registry. Register adapters with [`Self::with_provider`].
    #[must_use]
    pub fn new(fallback_keys: ProviderKeys) -> Self {
        Self {
            providers: HashMap::new(),
            fallback_keys,
        }
    }

    /// Registers `provider` under its own [`Provider::kind`], replacing any
    /// adapter previously registered for that kind.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    /// Builds the three HTTP adapters described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let timeout = config.provider_timeout_secs;
        let chat = |kind: ProviderKind| {
            OpenAiCompatibleProvider::new(kind, config.endpoint(kind), timeout)
        };
        let openai = chat(ProviderKind::OpenAi)?;
        let grok = chat(ProviderKind::Grok)?;
        let gemini = GeminiProvider::new(config.endpoint(ProviderKind::Gemini), timeout)?;

        Ok(Self::new(config.keys.clone())
            .with_provider(Arc::new(openai))
            .with_provider(Arc::new(gemini))
            .with_provider(Arc::new(grok)))
    }

    /// Resolves the requested backend and its credential.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::UnsupportedProvider`] if `requested` is absent,
    ///   unknown, or has no registered adapter.
    /// - [`ProviderError::MissingCredential`] if no key is available for it.
    pub fn select(
        &self,
        requested: Option<&str>,
        request_keys: &ProviderKeys,
    ) -> Result<SelectedProvider, ProviderError> {
        let requested = requested
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ProviderError::UnsupportedProvider("<missing>".to_string()))?;

        let kind: ProviderKind = requested
            .parse()
            .map_err(|_| ProviderError::UnsupportedProvider(requested.to_string()))?;

        let provider = self
            .providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| ProviderError::UnsupportedProvider(requested.to_string()))?;

        let api_key = resolve_credential(kind, request_keys, &self.fallback_keys)?;

        Ok(SelectedProvider { provider, api_key })
    }
}

impl SelectedProvider {
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// Sends `prompt` with the resolved credential.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`ProviderError`].
    pub async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        self.provider.generate(prompt, &self.api_key).await
    }
}

impl std::fmt::Debug for SelectedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedProvider")
            .field("kind", &self.kind())
            .field("api_key", &self.api_key)
            .finish()
    }
}
