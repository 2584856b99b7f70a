//! Value insertion, merging and structural comparison helpers.

use serde_json::{Map, Value};

use super::keywords::LIST;

/// Add `value` under `key` in `object`.
///
/// With `as_array`, an absent or non-array entry is first turned into an array.
/// Array values are added element by element. A single existing non-array value
/// is promoted to a one-element array before the new value is appended.
///
/// See <https://w3c.github.io/json-ld-api/#dfn-add-value>.
pub fn add_value(object: &mut Map<String, Value>, key: &str, value: &Value, as_array: bool) {
    if as_array {
        match object.get_mut(key) {
            None => {
                object.insert(key.to_string(), Value::Array(Vec::new()));
            }
            Some(existing) if !existing.is_array() => {
                let original = existing.take();
                *existing = Value::Array(vec![original]);
            }
            Some(_) => {}
        }
    }

    if let Value::Array(items) = value {
        for item in items {
            add_value(object, key, item, as_array);
        }
        return;
    }

    match object.get_mut(key) {
        None => {
            object.insert(key.to_string(), value.clone());
        }
        Some(Value::Array(existing)) => existing.push(value.clone()),
        Some(existing) => {
            let original = existing.take();
            *existing = Value::Array(vec![original, value.clone()]);
        }
    }
}

/// Append `value` to the array at `object[key]`, creating the array if needed,
/// unless a deep-equal value is already there.
///
/// Lists are ordered and may repeat: when `key` is `@list` or `value` is itself
/// a list object, the value is always appended. Does nothing when `object` is
/// not a JSON object.
pub fn merge_value(object: &mut Value, key: &str, value: &Value) {
    let Some(map) = object.as_object_mut() else {
        return;
    };
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if entry.is_null() {
        *entry = Value::Array(Vec::new());
    } else if !entry.is_array() {
        let original = entry.take();
        *entry = Value::Array(vec![original]);
    }
    if let Value::Array(values) = entry {
        let always_append = key == LIST || value.get(LIST).is_some();
        if always_append || !deep_contains(values, value) {
            values.push(value.clone());
        }
    }
}

/// Structural equality where object key order is irrelevant and arrays are
/// compared as multisets. Numbers compare by value, so `1` equals `1.0`.
pub fn deep_compare(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => a.is_null() && b.is_null(),
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(k, v)| right.get(k).is_some_and(|other| deep_compare(v, other)))
        }
        (Value::Array(left), Value::Array(right)) => {
            if left.len() != right.len() {
                return false;
            }
            // each element of `right` can be matched once
            let mut matched = vec![false; right.len()];
            left.iter().all(|item| {
                let found = right
                    .iter()
                    .enumerate()
                    .find(|(idx, other)| !matched[*idx] && deep_compare(item, other))
                    .map(|(idx, _)| idx);
                match found {
                    Some(idx) => {
                        matched[idx] = true;
                        true
                    }
                    None => false,
                }
            })
        }
        (Value::Number(left), Value::Number(right)) if left.is_f64() || right.is_f64() => {
            left.as_f64() == right.as_f64()
        }
        _ => a == b,
    }
}

/// Does any element of `values` deep-equal `value`?
pub fn deep_contains(values: &[Value], value: &Value) -> bool {
    values.iter().any(|item| deep_compare(item, value))
}

/// True if `j` is the string `value`, an array containing it, or an object
/// with `value` as a key.
pub fn contains_or_equals(j: &Value, value: &str) -> bool {
    match j {
        Value::String(s) => s == value,
        Value::Array(items) => items.iter().any(|item| item.as_str() == Some(value)),
        Value::Object(map) => map.contains_key(value),
        _ => false,
    }
}
