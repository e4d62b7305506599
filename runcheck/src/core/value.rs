//! Small accessors over untyped JSON values.
//!
//! The artifact is validated as a `serde_json::Value` tree rather than
//! deserialized into structs so every defect can be reported instead of the
//! first one serde trips on.

use serde_json::{Map, Value};

pub type Object = Map<String, Value>;

/// Required keys absent from `object`, in lexicographic order.
pub fn missing_keys<'k>(object: &Object, required: &[&'k str]) -> Vec<&'k str> {
    let mut missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    missing.sort_unstable();
    missing
}

/// The string if `value` is a string with non-whitespace content. Not trimmed.
pub fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// True for JSON integers. Floats and booleans do not count.
pub fn is_integer(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Number(n)) if n.is_i64() || n.is_u64())
}

/// Render a value inside a message: strings verbatim, other values as JSON.
pub fn display(value: Option<&Value>, absent: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => absent.to_string(),
    }
}

/// Render a value as a literal so quoting and whitespace stay visible.
///
/// Strings are single-quoted, or double-quoted when they hold `'` but no `"`.
/// `null` and booleans render as `None`, `True`, `False`.
pub fn literal(value: Option<&Value>, absent: &str) -> String {
    match value {
        Some(Value::String(s)) => {
            let escaped = s.replace('\\', "\\\\");
            if s.contains('\'') && !s.contains('"') {
                format!("\"{escaped}\"")
            } else {
                format!("'{}'", escaped.replace('\'', "\\'"))
            }
        }
        Some(Value::Null) => "None".to_string(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(other) => other.to_string(),
        None => absent.to_string(),
    }
}
