//! Conversion between metadata values and JSON

use crate::error::ExtractionError;
use docmeta_domain::{MergedMetadata, PartialMetadata, Value};
use serde_json::{Map, Number, Value as JsonValue};

// Largest integer an f64 represents exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Convert a JSON value into a metadata value
pub fn value_from_json(json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => Value::Number(f),
            None => Value::String(n.to_string()),
        },
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => Value::List(items.into_iter().map(value_from_json).collect()),
        JsonValue::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, value_from_json(v)))
                .collect(),
        ),
    }
}

/// Convert a metadata value into JSON
///
/// Integral numbers are written as JSON integers so `3` stays `3` rather than
/// becoming `3.0`. Non-finite numbers have no JSON form and become `null`.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::List(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
        Value::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

fn number_to_json(n: f64) -> JsonValue {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        JsonValue::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
    }
}

/// Convert a JSON object into a partial metadata record
pub fn metadata_from_json(json: JsonValue) -> Result<PartialMetadata, ExtractionError> {
    match json {
        JsonValue::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, value_from_json(v)))
            .collect()),
        other => Err(ExtractionError::InvalidFormat(format!(
            "Expected JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Convert merged metadata into a JSON object
pub fn metadata_to_json(metadata: &MergedMetadata) -> JsonValue {
    let map: Map<String, JsonValue> = metadata
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();
    JsonValue::Object(map)
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
