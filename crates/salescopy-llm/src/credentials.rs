use salescopy_core::{ProviderKind, ProviderKeys};

use crate::error::ProviderError;

/// A resolved backend credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}

/// Picks the credential for `kind`: the request-scoped key when present,
/// otherwise the process-wide fallback.
///
/// # Errors
///
/// Returns [`ProviderError::MissingCredential`] when neither source has a
/// non-blank key for `kind`.
pub fn resolve_credential(
    kind: ProviderKind,
    request_keys: &ProviderKeys,
    fallback: &ProviderKeys,
) -> Result<ApiKey, ProviderError> {
    request_keys
        .get(kind)
        .or_else(|| fallback.get(kind))
        .map(ApiKey::new)
        .ok_or(ProviderError::MissingCredential(kind))
}
