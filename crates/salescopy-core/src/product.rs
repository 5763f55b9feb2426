use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Structured profile of a product page, produced by the analyze stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub summary: String,
    /// Usually 5-8 entries.
    #[serde(deserialize_with = "lenient::string_list")]
    pub features: Vec<String>,
    /// Usually 4-6 entries.
    #[serde(deserialize_with = "lenient::string_list")]
    pub benefits: Vec<String>,
    /// Usually 3-5 entries.
    #[serde(deserialize_with = "lenient::string_list")]
    pub use_cases: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub target_audience: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub shipping: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub colors: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub specifications: BTreeMap<String, String>,
}

impl ProductInfo {
    /// Returns the first field that a usable profile must carry but this one
    /// leaves blank: `name`, `summary`, or a non-empty `features` list.
    #[must_use]
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.summary.trim().is_empty() {
            Some("summary")
        } else if !self.features.iter().any(|f| !f.trim().is_empty()) {
            Some("features")
        } else {
            None
        }
    }
}

/// One psychological framing for selling the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesAngle {
    /// Ordinal `"1"`..`"5"`, assigned by position when the batch is decoded.
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub hook: String,
    /// Open vocabulary: scarcity, urgency, status, fear, pleasure, ...
    #[serde(deserialize_with = "lenient::string")]
    pub emotion: String,
}

/// Long-form persuasive copy written for one product and one angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copy {
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub main_focus: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub problems: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub ideal_client: String,
    #[serde(deserialize_with = "lenient::string")]
    pub target_client: String,
}

/// Copy rewritten for a specific sales channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptedCopy {
    #[serde(deserialize_with = "lenient::string")]
    pub adapted_copy: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tips: Vec<String>,
}
