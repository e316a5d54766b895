//! Loosely-typed field access over `serde_yaml::Value`
//!
//! Subscription providers are inconsistent about scalar types: ports arrive as
//! numbers or strings, bandwidth hints as `100` or `"100 Mbps"`, flags as
//! booleans or `"true"`. These helpers read a field the way the document meant
//! it and treat `null` and empty strings as absent.

use serde_yaml::Value;
use std::collections::BTreeMap;

/// Get a non-null field from a mapping.
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(v),
    }
}

/// Get a nested mapping field, e.g. `tls.reality`.
pub fn mapping_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    field(value, key).filter(|v| v.is_mapping())
}

/// Render a scalar as a string. Sequences, mappings and empty strings give `None`.
/// Strings are kept verbatim; credentials may legitimately contain spaces.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Tagged(tagged) => return scalar_to_string(&tagged.value),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Read a string-ish field.
pub fn str_field(value: &Value, key: &str) -> Option<String> {
    field(value, key).and_then(scalar_to_string)
}

/// Read the first present string-ish field out of `keys`.
pub fn first_str_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| str_field(value, key))
}

/// Interpret a value as a flag. Booleans, non-zero numbers and the strings
/// `true`/`1`/`yes` are true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
        _ => false,
    }
}

/// Read a flag field; absent means false.
pub fn bool_field(value: &Value, key: &str) -> bool {
    field(value, key).is_some_and(is_truthy)
}

/// Read a TCP port. Zero and out-of-range values are absent.
pub fn port_field(value: &Value, key: &str) -> Option<u16> {
    let port = match field(value, key)? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u16::try_from(port).ok().filter(|p| *p != 0)
}

/// Read an unsigned integer field that may be written as a number or a string.
pub fn u32_field(value: &Value, key: &str) -> Option<u32> {
    match field(value, key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Read a list of strings. A scalar is split on commas, so `alpn: h2,http/1.1`
/// and `alpn: [h2, http/1.1]` read the same.
pub fn string_list_field(value: &Value, key: &str) -> Vec<String> {
    match field(value, key) {
        Some(Value::Sequence(seq)) => seq.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other)
            .map(|s| {
                s.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

/// Read a mapping of string keys to single string values, e.g. websocket headers.
pub fn string_map_field(value: &Value, key: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    if let Some(Value::Mapping(map)) = field(value, key) {
        for (k, v) in map {
            let value = match v {
                Value::Sequence(seq) => seq.iter().find_map(scalar_to_string),
                other => scalar_to_string(other),
            };
            if let (Some(k), Some(v)) = (scalar_to_string(k), value) {
                out.insert(k, v);
            }
        }
    }
    out
}

/// Read a mapping of string keys to lists of strings, e.g. Clash `http-opts.headers`.
pub fn string_list_map_field(value: &Value, key: &str) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    if let Some(Value::Mapping(map)) = field(value, key) {
        for (k, v) in map {
            let values: Vec<String> = match v {
                Value::Sequence(seq) => seq.iter().filter_map(scalar_to_string).collect(),
                other => scalar_to_string(other).into_iter().collect(),
            };
            if let Some(k) = scalar_to_string(k) {
                if !values.is_empty() {
                    out.insert(k, values);
                }
            }
        }
    }
    out
}
