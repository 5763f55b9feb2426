//! Field decoders that tolerate the loose typing of model-generated JSON.
//!
//! Models routinely emit `"price": 19.99` where the contract wants a string,
//! or a bare string where a list is expected. These helpers coerce scalar
//! values instead of failing the whole stage; structural mismatches (an
//! object where a string belongs) still fail.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn scalar_to_string(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(items) => {
            let parts = items
                .into_iter()
                .map(scalar_to_string)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(parts.into_iter().flatten().collect::<Vec<_>>().join(", ")))
        }
        Value::Object(_) => Err("expected a string, found an object".to_string()),
    }
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(value)
        .map(Option::unwrap_or_default)
        .map_err(D::Error::custom)
}

pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let s = scalar_to_string(value).map_err(D::Error::custom)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| scalar_to_string(item).transpose())
            .collect::<Result<Vec<_>, _>>()
            .map_err(D::Error::custom),
        other => scalar_to_string(other)
            .map(|s| s.into_iter().collect())
            .map_err(D::Error::custom),
    }
}

pub(crate) fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(BTreeMap::new()),
        Value::Object(map) => {
            let mut out = BTreeMap::new();
            for (key, value) in map {
                let rendered = match value {
                    Value::Object(_) => Some(value.to_string()),
                    other => scalar_to_string(other).map_err(D::Error::custom)?,
                };
                if let Some(rendered) = rendered {
                    out.insert(key, rendered);
                }
            }
            Ok(out)
        }
        _ => Err(D::Error::custom("expected an object of attribute/value pairs")),
    }
}
