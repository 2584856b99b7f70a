//! Structural predicates over JSON values and strings.
//!
//! All predicates are total: they never fail and never mutate their input.

use serde_json::Value;

use super::keywords::{self, CONTEXT, DEFAULT, GRAPH, ID, INDEX, LIST, SET, VALUE, is_keyword};
use crate::uri;

/// Is `s` possibly an IRI (absolute or relative)? Keywords are not IRIs.
pub fn is_iri(s: &str) -> bool {
    !is_keyword(s) && uri::is_uri_reference(s)
}

pub fn is_absolute_iri(s: &str) -> bool {
    uri::is_absolute(s)
}

/// Anything that is neither a keyword nor an absolute IRI may be a relative IRI.
pub fn is_relative_iri(s: &str) -> bool {
    !(is_keyword(s) || is_absolute_iri(s))
}

pub fn is_blank_node_identifier(s: &str) -> bool {
    s.starts_with("_:")
}

/// A graph name is either a blank node identifier or an IRI.
pub fn is_graph_name_form(s: &str) -> bool {
    is_blank_node_identifier(s) || is_iri(s)
}

/// Does `iri` end with one of the RFC 3986 general delimiters `: / ? # [ ] @`?
pub fn iri_ends_with_general_delimiter(iri: &str) -> bool {
    matches!(
        iri.chars().last(),
        Some(':' | '/' | '?' | '#' | '[' | ']' | '@')
    )
}

/// A list object has `@list` and optionally `@index`, nothing else.
pub fn is_list_object(j: &Value) -> bool {
    match j.as_object() {
        Some(map) => {
            map.contains_key(LIST)
                && (map.len() == 1 || (map.len() == 2 && map.contains_key(INDEX)))
        }
        None => false,
    }
}

/// A graph object has `@graph` and may also have `@id` and `@index`.
pub fn is_graph_object(j: &Value) -> bool {
    match j.as_object() {
        Some(map) => {
            map.contains_key(GRAPH) && map.keys().all(|k| matches!(k.as_str(), GRAPH | ID | INDEX))
        }
        None => false,
    }
}

pub fn is_value_object(j: &Value) -> bool {
    j.as_object().is_some_and(|map| map.contains_key(VALUE))
}

pub fn is_default_object(j: &Value) -> bool {
    j.as_object().is_some_and(|map| map.contains_key(DEFAULT))
}

/// A node object lacks `@value`, `@list` and `@set`, or is a top-level map
/// carrying both `@graph` and `@context`.
pub fn is_node_object(j: &Value) -> bool {
    match j.as_object() {
        Some(map) => {
            (!map.contains_key(VALUE) && !map.contains_key(LIST) && !map.contains_key(SET))
                || (map.contains_key(GRAPH) && map.contains_key(CONTEXT))
        }
        None => false,
    }
}

pub fn is_empty_object(j: &Value) -> bool {
    j.as_object().is_some_and(|map| map.is_empty())
}

pub fn is_empty_array(j: &Value) -> bool {
    j.as_array().is_some_and(|arr| arr.is_empty())
}

/// Strings, numbers and booleans. `null` is not a scalar.
pub fn is_scalar(j: &Value) -> bool {
    matches!(j, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

pub fn is_array_of_strings(j: &Value) -> bool {
    j.as_array().is_some_and(|arr| arr.iter().all(Value::is_string))
}

pub fn is_array_of_scalars(j: &Value) -> bool {
    j.as_array().is_some_and(|arr| arr.iter().all(is_scalar))
}

/// Keyword-shaped strings that are not actual keywords must be ignored by
/// processors rather than treated as terms.
pub fn is_reserved_keyword_form(s: &str) -> bool {
    keywords::is_keyword_form(s) && !is_keyword(s)
}
