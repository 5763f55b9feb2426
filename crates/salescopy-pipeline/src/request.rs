//! Stage request bodies as received from callers.
//!
//! Every field a stage needs is optional at this layer; [`crate::Pipeline`]
//! decides what is missing and reports it as a validation failure.

use salescopy_core::{Copy, ProductInfo, ProfitRecord, ProviderKeys, SalesAngle, SpendRecord};
use serde::Deserialize;

/// Per-request credentials. Blank strings count as absent.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestKeys {
    #[serde(default)]
    pub openai_key: Option<String>,
    #[serde(default)]
    pub gemini_key: Option<String>,
    #[serde(default)]
    pub grok_key: Option<String>,
}

impl RequestKeys {
    #[must_use]
    pub fn to_provider_keys(&self) -> ProviderKeys {
        ProviderKeys {
            openai: self.openai_key.clone(),
            gemini: self.gemini_key.clone(),
            grok: self.grok_key.clone(),
        }
    }
}

impl std::fmt::Debug for RequestKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |k: &Option<String>| k.as_ref().map(|_| "[redacted]");
        f.debug_struct("RequestKeys")
            .field("openai_key", &redact(&self.openai_key))
            .field("gemini_key", &redact(&self.gemini_key))
            .field("grok_key", &redact(&self.grok_key))
            .finish()
    }
}

/// Backend identifier plus optional keys, shared by every stage request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendChoice {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(flatten)]
    pub keys: RequestKeys,
}

impl BackendChoice {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            keys: RequestKeys::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub backend: BackendChoice,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnglesRequest {
    #[serde(default)]
    pub product_info: Option<ProductInfo>,
    #[serde(flatten)]
    pub backend: BackendChoice,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyRequest {
    #[serde(default)]
    pub product_info: Option<ProductInfo>,
    #[serde(default)]
    pub chosen_angle: Option<SalesAngle>,
    #[serde(flatten)]
    pub backend: BackendChoice,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptRequest {
    #[serde(default)]
    pub product_info: Option<ProductInfo>,
    #[serde(default)]
    pub chosen_angle: Option<SalesAngle>,
    #[serde(default)]
    pub copy: Option<Copy>,
    #[serde(default)]
    pub sales_channel: Option<String>,
    #[serde(flatten)]
    pub backend: BackendChoice,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    #[serde(default)]
    pub records: Vec<SpendRecord>,
    #[serde(default)]
    pub profit_data: Vec<ProfitRecord>,
    #[serde(flatten)]
    pub backend: BackendChoice,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn analyze_request_reads_flat_keys() {
        let req: AnalyzeRequest = serde_json::from_value(json!({
            "url": "https://shop.example",
            "model": "gemini",
            "geminiKey": "g-123"
        }))
        .unwrap();
        assert_eq!(req.url.as_deref(), Some("https://shop.example"));
        assert_eq!(req.backend.model.as_deref(), Some("gemini"));
        assert_eq!(req.backend.keys.gemini_key.as_deref(), Some("g-123"));
        assert!(req.backend.keys.openai_key.is_none());
    }

    #[test]
    fn adapt_request_uses_camel_case_fields() {
        let req: AdaptRequest = serde_json::from_value(json!({
            "model": "openai",
            "copy": {
                "description": "d", "main_focus": "m", "problems": [],
                "ideal_client": "i", "target_client": "t"
            },
            "salesChannel": "whatsapp"
        }))
        .unwrap();
        assert_eq!(req.sales_channel.as_deref(), Some("whatsapp"));
        assert!(req.copy.is_some());
        assert!(req.product_info.is_none());
    }

    #[test]
    fn advice_request_defaults_to_empty_lists() {
        let req: AdviceRequest = serde_json::from_value(json!({ "model": "grok" })).unwrap();
        assert!(req.records.is_empty());
        assert!(req.profit_data.is_empty());
    }

    #[test]
    fn request_keys_map_to_provider_keys_and_redact() {
        let keys = RequestKeys {
            openai_key: Some("sk-secret".to_string()),
            ..RequestKeys::default()
        };
        assert_eq!(keys.to_provider_keys().openai.as_deref(), Some("sk-secret"));
        assert!(!format!("{keys:?}").contains("sk-secret"));
    }
}
