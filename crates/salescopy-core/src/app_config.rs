use std::net::SocketAddr;

use crate::provider::ProviderKind;

/// Process-wide fallback credentials, one optional key per backend.
///
/// Request-scoped keys always take precedence over these.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderKeys {
    pub openai: Option<String>,
    pub gemini: Option<String>,
    pub grok: Option<String>,
}

impl ProviderKeys {
    #[must_use]
    pub fn get(&self, kind: ProviderKind) -> Option<&str> {
        let key = match kind {
            ProviderKind::OpenAi => self.openai.as_deref(),
            ProviderKind::Gemini => self.gemini.as_deref(),
            ProviderKind::Grok => self.grok.as_deref(),
        };
        key.map(str::trim).filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |k: &Option<String>| k.as_ref().map(|_| "[redacted]");
        f.debug_struct("ProviderKeys")
            .field("openai", &redact(&self.openai))
            .field("gemini", &redact(&self.gemini))
            .field("grok", &redact(&self.grok))
            .finish()
    }
}

/// Host and model identifier for one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub keys: ProviderKeys,
    pub openai: ProviderEndpoint,
    pub gemini: ProviderEndpoint,
    pub grok: ProviderEndpoint,
    pub reader_base_url: String,
    pub reader_max_chars: usize,
    pub reader_timeout_secs: u64,
    pub provider_timeout_secs: u64,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    #[must_use]
    pub fn endpoint(&self, kind: ProviderKind) -> &ProviderEndpoint {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Grok => &self.grok,
        }
    }
}
