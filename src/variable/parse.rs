//! String parsers and JSON helpers used by variables

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Default parser for [`Variable::set_with_string`](super::Variable::set_with_string)
///
/// `tag` is the [`type_tag`] of the variable's default. A `"string"` default
/// takes `raw` verbatim. Anything else decodes `raw` as a JSON literal and
/// rejects it unless the literal has the same type tag as the default, so
/// `"1234"` parses for a number default and `"abc"` is rejected.
pub fn like_default<T: DeserializeOwned>(raw: &str, tag: &str) -> Result<T> {
    let value = if tag == "string" {
        Value::String(raw.to_string())
    } else {
        let decoded: Value =
            serde_json::from_str(raw).with_context(|| format!("'{}' is not valid JSON", raw))?;
        let decoded_tag = type_tag(&decoded);
        if decoded_tag != tag {
            anyhow::bail!("'{}' is a {}, expected a {}", raw, decoded_tag, tag);
        }
        decoded
    };
    T::deserialize(value).with_context(|| format!("'{}' is not a valid value", raw))
}

/// Coerce any string to a bool the way a JavaScript `!!JSON.parse(raw)` would,
/// falling back to the raw string when it is not JSON
pub fn lenient_bool(raw: &str) -> bool {
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    truthy(&value)
}

/// JavaScript truthiness of a JSON value
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// JavaScript `typeof` name of a JSON value
pub fn type_tag(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}
