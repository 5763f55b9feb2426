//! Turns a backend's raw text into a stage's fixed structure.
//!
//! Gemini has no JSON-only mode and tends to wrap answers in markdown code
//! fences, so every JSON stage strips fences first. The result must then be
//! valid JSON of the right shape; nothing here retries or repairs.

use salescopy_core::{AdaptedCopy, Copy, ProductInfo, SalesAngle};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::NormalizeError;
use crate::stage::Stage;

/// Number of angles every angles batch must contain.
pub const ANGLE_COUNT: usize = 5;

const FENCE: &str = "```";

/// Removes surrounding whitespace and a leading/trailing markdown fence.
///
/// Handles language-tagged (```` ```json ````, ```` ``` json ````) and bare
/// fences. A tag is only read from the fence line itself. Text without
/// fences is returned trimmed, so applying this twice changes nothing.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(FENCE) {
        let rest = rest.trim_start_matches([' ', '\t']);
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest.trim_end();
    }
    text
}

/// Strips fences and parses the remainder as JSON.
///
/// # Errors
///
/// Returns [`NormalizeError::Parse`] if the text is not valid JSON.
pub fn parse_json(stage: Stage, raw: &str) -> Result<Value, NormalizeError> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|source| NormalizeError::Parse { stage, source })
}

fn decode<T: DeserializeOwned>(stage: Stage, value: Value) -> Result<T, NormalizeError> {
    serde_json::from_value(value).map_err(|e| NormalizeError::Shape {
        stage,
        reason: e.to_string(),
    })
}

fn require(stage: Stage, field: &'static str, value: &str) -> Result<(), NormalizeError> {
    if value.trim().is_empty() {
        Err(NormalizeError::MissingField { stage, field })
    } else {
        Ok(())
    }
}

/// Decodes an analyze-stage answer into a [`ProductInfo`].
///
/// # Errors
///
/// - [`NormalizeError::Parse`] for malformed JSON.
/// - [`NormalizeError::Shape`] if fields are missing or mistyped.
/// - [`NormalizeError::MissingField`] if `name`, `summary` or every feature is blank.
pub fn product_info(raw: &str) -> Result<ProductInfo, NormalizeError> {
    let value = parse_json(Stage::Analyze, raw)?;
    let info: ProductInfo = decode(Stage::Analyze, value)?;
    if let Some(field) = info.missing_required_field() {
        return Err(NormalizeError::MissingField {
            stage: Stage::Analyze,
            field,
        });
    }
    Ok(info)
}

/// The three layouts models use for an angles batch.
#[derive(Debug)]
enum AnglesPayload {
    /// `[ {...}, ... ]`
    Bare(Vec<Value>),
    /// `{ "angles": [ ... ] }`
    Wrapped(Vec<Value>),
    /// `{ "<anything>": [ ... ], ... }`; the first value holds the list.
    FirstValue(Vec<Value>),
}

impl AnglesPayload {
    fn classify(value: Value) -> Result<Self, NormalizeError> {
        match value {
            Value::Array(items) => Ok(AnglesPayload::Bare(items)),
            Value::Object(mut map) => {
                if map.get("angles").is_some_and(Value::is_array) {
                    if let Some(Value::Array(items)) = map.remove("angles") {
                        return Ok(AnglesPayload::Wrapped(items));
                    }
                }
                match map.into_iter().next() {
                    Some((_, Value::Array(items))) => Ok(AnglesPayload::FirstValue(items)),
                    Some((key, _)) => Err(NormalizeError::Shape {
                        stage: Stage::Angles,
                        reason: format!("first field `{key}` is not a list of angles"),
                    }),
                    None => Err(NormalizeError::Shape {
                        stage: Stage::Angles,
                        reason: "empty object".to_string(),
                    }),
                }
            }
            other => Err(NormalizeError::Shape {
                stage: Stage::Angles,
                reason: format!("expected a list of angles, found {}", json_kind(&other)),
            }),
        }
    }

    fn into_items(self) -> Vec<Value> {
        match self {
            AnglesPayload::Bare(items)
            | AnglesPayload::Wrapped(items)
            | AnglesPayload::FirstValue(items) => items,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decodes an angles-stage answer into exactly [`ANGLE_COUNT`] angles with
/// ids `"1"`..`"5"` in generation order.
///
/// # Errors
///
/// - [`NormalizeError::Parse`] for malformed JSON.
/// - [`NormalizeError::Shape`] if no angle list can be found or an entry is malformed.
/// - [`NormalizeError::Arity`] if the list does not hold exactly five angles.
/// - [`NormalizeError::MissingField`] if an angle has a blank title or hook.
pub fn sales_angles(raw: &str) -> Result<Vec<SalesAngle>, NormalizeError> {
    let value = parse_json(Stage::Angles, raw)?;
    let items = AnglesPayload::classify(value)?.into_items();

    if items.len() != ANGLE_COUNT {
        return Err(NormalizeError::Arity {
            expected: ANGLE_COUNT,
            actual: items.len(),
        });
    }

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let mut angle: SalesAngle = serde_json::from_value(item).map_err(|e| {
                NormalizeError::Shape {
                    stage: Stage::Angles,
                    reason: format!("angle {}: {e}", idx + 1),
                }
            })?;
            require(Stage::Angles, "title", &angle.title)?;
            require(Stage::Angles, "hook", &angle.hook)?;
            angle.id = (idx + 1).to_string();
            Ok(angle)
        })
        .collect()
}

/// Decodes a copy-stage answer.
///
/// # Errors
///
/// Returns [`NormalizeError`] for malformed JSON, a wrong shape, or a blank
/// `description`.
pub fn copy(raw: &str) -> Result<Copy, NormalizeError> {
    let value = parse_json(Stage::Copy, raw)?;
    let copy: Copy = decode(Stage::Copy, value)?;
    require(Stage::Copy, "description", &copy.description)?;
    Ok(copy)
}

/// Decodes an adapt-stage answer.
///
/// # Errors
///
/// Returns [`NormalizeError`] for malformed JSON, a wrong shape, or a blank
/// `adapted_copy`.
pub fn adapted_copy(raw: &str) -> Result<AdaptedCopy, NormalizeError> {
    let value = parse_json(Stage::Adapt, raw)?;
    let adapted: AdaptedCopy = decode(Stage::Adapt, value)?;
    require(Stage::Adapt, "adapted_copy", &adapted.adapted_copy)?;
    Ok(adapted)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn angle(n: usize) -> Value {
        json!({
            "id": format!("x{n}"),
            "title": format!("Angle {n}"),
            "description": "why it works",
            "hook": "Stop scrolling",
            "emotion": "urgency"
        })
    }

    fn five_angles() -> Value {
        Value::Array((1..=5).map(angle).collect())
    }

    #[test]
    fn strips_language_tagged_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_tag_separated_from_fence_by_spaces() {
        assert_eq!(strip_code_fences("``` json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\t json\n[1]\n```"), "[1]");
    }

    #[test]
    fn value_on_the_line_after_a_bare_fence_is_not_a_tag() {
        assert_eq!(strip_code_fences("```\ntrue\n```"), "true");
    }

    #[test]
    fn strips_bare_fence_and_whitespace() {
        assert_eq!(strip_code_fences("  \n```\n[1, 2]\n```  \n"), "[1, 2]");
    }

    #[test]
    fn leaves_unfenced_text_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn stripping_is_idempotent() {
        let once = strip_code_fences("```json\n{\"a\":1}\n```");
        assert_eq!(strip_code_fences(once), once);
    }

    #[test]
    fn fenced_and_unfenced_parse_to_the_same_value() {
        let fenced = parse_json(Stage::Analyze, "```json\n{\"a\":1}\n```").expect("fenced");
        let plain = parse_json(Stage::Analyze, "{\"a\":1}").expect("plain");
        assert_eq!(fenced, json!({ "a": 1 }));
        assert_eq!(fenced, plain);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_json(Stage::Copy, "{\"a\": ").unwrap_err();
        assert!(matches!(err, NormalizeError::Parse { stage: Stage::Copy, .. }));
        assert!(err.to_string().starts_with("copy response is not valid JSON"));
    }

    #[test]
    fn empty_text_is_a_parse_error_not_an_empty_result() {
        let err = product_info("```json\n```").unwrap_err();
        assert!(matches!(err, NormalizeError::Parse { .. }), "{err}");
    }

    #[test]
    fn product_info_requires_name_summary_and_a_feature() {
        let raw = json!({
            "name": "Widget",
            "summary": "",
            "features": ["f1"],
            "benefits": [],
            "use_cases": [],
            "target_audience": "everyone"
        })
        .to_string();
        let err = product_info(&raw).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MissingField { stage: Stage::Analyze, field: "summary" }
        ));
    }

    #[test]
    fn product_info_wrong_type_is_a_shape_error() {
        let err = product_info("[1,2,3]").unwrap_err();
        assert!(matches!(err, NormalizeError::Shape { stage: Stage::Analyze, .. }), "{err}");
    }

    #[test]
    fn classify_recognises_all_three_layouts() {
        let items = five_angles();
        assert!(matches!(
            AnglesPayload::classify(items.clone()),
            Ok(AnglesPayload::Bare(_))
        ));
        assert!(matches!(
            AnglesPayload::classify(json!({ "angles": items.clone() })),
            Ok(AnglesPayload::Wrapped(_))
        ));
        assert!(matches!(
            AnglesPayload::classify(json!({ "sales_angles": items })),
            Ok(AnglesPayload::FirstValue(_))
        ));
    }

    #[test]
    fn angles_layouts_collapse_to_the_same_list() {
        let bare = sales_angles(&five_angles().to_string()).expect("bare");
        let wrapped = sales_angles(&json!({ "angles": five_angles() }).to_string()).expect("wrapped");
        let keyed = sales_angles(&json!({ "result": five_angles() }).to_string()).expect("keyed");
        assert_eq!(bare, wrapped);
        assert_eq!(bare, keyed);
    }

    #[test]
    fn angles_get_positional_ids_in_generation_order() {
        let angles = sales_angles(&five_angles().to_string()).expect("angles");
        let ids: Vec<&str> = angles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5"]);
        assert_eq!(angles[0].title, "Angle 1");
        assert_eq!(angles[4].title, "Angle 5");
    }

    #[test]
    fn angles_wrapped_uses_angles_key_even_when_not_first() {
        let raw = json!({ "note": "ignored", "angles": five_angles() }).to_string();
        let angles = sales_angles(&raw).expect("angles");
        assert_eq!(angles.len(), ANGLE_COUNT);
    }

    #[test]
    fn angles_fenced_by_gemini_are_accepted() {
        let raw = format!("```json\n{}\n```", json!({ "angles": five_angles() }));
        assert_eq!(sales_angles(&raw).expect("angles").len(), ANGLE_COUNT);
    }

    #[test]
    fn wrong_angle_count_is_an_arity_error() {
        let four = Value::Array((1..=4).map(angle).collect()).to_string();
        let err = sales_angles(&four).unwrap_err();
        assert!(matches!(err, NormalizeError::Arity { expected: 5, actual: 4 }));
    }

    #[test]
    fn object_without_a_list_is_a_shape_error() {
        let err = sales_angles("{\"angles\": \"none\"}").unwrap_err();
        assert!(matches!(err, NormalizeError::Shape { stage: Stage::Angles, .. }), "{err}");
    }

    #[test]
    fn angle_missing_hook_is_a_shape_error() {
        let mut items = five_angles();
        items[2].as_object_mut().expect("object").remove("hook");
        let err = sales_angles(&items.to_string()).unwrap_err();
        assert!(err.to_string().contains("angle 3"), "{err}");
    }

    #[test]
    fn copy_and_adapted_copy_decode() {
        let copy_raw = json!({
            "description": "Long copy",
            "main_focus": "comfort",
            "problems": ["back pain", "bad sleep", "stress"],
            "ideal_client": "office workers",
            "target_client": "25-45"
        })
        .to_string();
        assert_eq!(copy(&copy_raw).expect("copy").problems.len(), 3);

        let adapted_raw = "```json\n{\"adapted_copy\":\"Hola 👋\",\"tips\":[\"a\",\"b\"]}\n```";
        let adapted = adapted_copy(adapted_raw).expect("adapted");
        assert_eq!(adapted.adapted_copy, "Hola 👋");
        assert_eq!(adapted.tips, vec!["a", "b"]);
    }

    #[test]
    fn blank_adapted_copy_is_rejected() {
        let err = adapted_copy("{\"adapted_copy\":\" \",\"tips\":[]}").unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MissingField { stage: Stage::Adapt, field: "adapted_copy" }
        ));
    }
}
