//! Inverse context: IRI → container → type/language → preferred term.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#inverse-context-creation>.

use indexmap::IndexMap;

use super::context::ActiveContext;
use super::keywords::{ANY, LANGUAGE, NONE, NULL, REVERSE, TYPE};
use super::term::TermDefinition;

/// Terms keyed by language (`@language`), by type (`@type`) and the
/// catch-all `@any` entry, for one IRI and container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeLanguageMap {
    pub language: IndexMap<String, String>,
    pub types: IndexMap<String, String>,
    pub any: IndexMap<String, String>,
}

impl TypeLanguageMap {
    /// The map selected by `@language`, `@type` or `@any`.
    pub fn get(&self, type_language: &str) -> Option<&IndexMap<String, String>> {
        match type_language {
            LANGUAGE => Some(&self.language),
            TYPE => Some(&self.types),
            ANY => Some(&self.any),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct InverseContext {
    entries: IndexMap<String, IndexMap<String, TypeLanguageMap>>,
}

impl InverseContext {
    pub fn new(context: &ActiveContext) -> Self {
        let default_language = context
            .default_language()
            .map(str::to_lowercase)
            .unwrap_or_else(|| NONE.to_string());

        let mut terms: Vec<(&str, &TermDefinition)> = context.term_definitions().collect();
        terms.sort_by(|(a, _), (b, _)| {
            a.chars()
                .count()
                .cmp(&b.chars().count())
                .then_with(|| a.cmp(b))
        });

        let mut entries: IndexMap<String, IndexMap<String, TypeLanguageMap>> = IndexMap::new();
        for (term, definition) in terms {
            let Some(iri) = definition.iri.as_deref() else {
                continue;
            };
            let maps = entries
                .entry(iri.to_string())
                .or_default()
                .entry(definition.container_key())
                .or_default();
            insert_missing(&mut maps.any, NONE, term);

            if definition.reverse {
                insert_missing(&mut maps.types, REVERSE, term);
            } else if definition.type_mapping.as_deref() == Some(NONE) {
                insert_missing(&mut maps.language, ANY, term);
                insert_missing(&mut maps.types, ANY, term);
            } else if let Some(type_mapping) = &definition.type_mapping {
                insert_missing(&mut maps.types, type_mapping, term);
            } else if let (Some(language), Some(direction)) =
                (&definition.language, &definition.direction)
            {
                let key = match (language, direction) {
                    (Some(language), Some(direction)) => {
                        format!("{language}_{direction}").to_lowercase()
                    }
                    (Some(language), None) => language.to_lowercase(),
                    (None, Some(direction)) => format!("_{direction}"),
                    (None, None) => NULL.to_string(),
                };
                insert_missing(&mut maps.language, &key, term);
            } else if let Some(language) = &definition.language {
                let key = language
                    .as_deref()
                    .map(str::to_lowercase)
                    .unwrap_or_else(|| NULL.to_string());
                insert_missing(&mut maps.language, &key, term);
            } else if let Some(direction) = &definition.direction {
                let key = direction
                    .map(|d| format!("_{d}"))
                    .unwrap_or_else(|| NONE.to_string());
                insert_missing(&mut maps.language, &key, term);
            } else if let Some(direction) = context.default_base_direction() {
                let key = format!("{}_{direction}", context.default_language().unwrap_or_default())
                    .to_lowercase();
                insert_missing(&mut maps.language, &key, term);
                insert_missing(&mut maps.language, NONE, term);
                insert_missing(&mut maps.types, NONE, term);
            } else {
                insert_missing(&mut maps.language, &default_language, term);
                insert_missing(&mut maps.language, NONE, term);
                insert_missing(&mut maps.types, NONE, term);
            }
        }

        tracing::trace!(iris = entries.len(), "built inverse context");
        Self { entries }
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.entries.contains_key(iri)
    }

    /// Container map for `iri`.
    pub fn get(&self, iri: &str) -> Option<&IndexMap<String, TypeLanguageMap>> {
        self.entries.get(iri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Term Selection: the first term registered for `iri` under one of
    /// `containers`, in `type_language` (`@language`, `@type` or `@any`),
    /// trying `preferred_values` in order.
    pub fn select_term(
        &self,
        iri: &str,
        containers: &[&str],
        type_language: &str,
        preferred_values: &[&str],
    ) -> Option<&str> {
        let container_map = self.entries.get(iri)?;
        for container in containers {
            let Some(values) = container_map
                .get(*container)
                .and_then(|maps| maps.get(type_language))
            else {
                continue;
            };
            if let Some(term) = preferred_values.iter().find_map(|v| values.get(*v)) {
                return Some(term.as_str());
            }
        }
        None
    }
}

fn insert_missing(map: &mut IndexMap<String, String>, key: &str, term: &str) {
    if !map.contains_key(key) {
        map.insert(key.to_string(), term.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::JsonLdOptions;
    use serde_json::json;
    use std::sync::Arc;

    fn context(local: serde_json::Value) -> Arc<ActiveContext> {
        ActiveContext::new(JsonLdOptions::default())
            .process(&local, true)
            .unwrap()
    }

    #[test]
    fn prefers_shortest_then_lexicographic_term() {
        let ctx = context(json!({
            "longer": "http://ex/p",
            "bb": "http://ex/p",
            "aa": "http://ex/p"
        }));
        let inverse = ctx.inverse_context();
        assert_eq!(
            inverse.select_term("http://ex/p", &["@none"], "@language", &["@none"]),
            Some("aa")
        );
        assert_eq!(
            inverse.select_term("http://ex/p", &["@none"], "@any", &["@none"]),
            Some("aa")
        );
    }

    #[test]
    fn language_and_type_entries() {
        let ctx = context(json!({
            "@language": "EN",
            "plain": "http://ex/label",
            "french": {"@id": "http://ex/label", "@language": "fr"},
            "noLang": {"@id": "http://ex/label", "@language": null},
            "date": {"@id": "http://ex/date", "@type": "http://www.w3.org/2001/XMLSchema#date"},
            "link": {"@id": "http://ex/link", "@type": "@id"},
            "rtl": {"@id": "http://ex/label", "@direction": "rtl"}
        }));
        let inverse = ctx.inverse_context();
        let maps = &inverse.get("http://ex/label").unwrap()["@none"];
        assert_eq!(maps.language.get("en").map(String::as_str), Some("plain"));
        assert_eq!(maps.language.get("fr").map(String::as_str), Some("french"));
        assert_eq!(maps.language.get("@null").map(String::as_str), Some("noLang"));
        assert_eq!(maps.language.get("_rtl").map(String::as_str), Some("rtl"));

        assert_eq!(
            inverse.select_term(
                "http://ex/label",
                &["@none"],
                "@language",
                &["de", "fr", "@none"]
            ),
            Some("french")
        );
        assert_eq!(
            inverse.select_term(
                "http://ex/date",
                &["@set", "@none"],
                "@type",
                &["http://www.w3.org/2001/XMLSchema#date"]
            ),
            Some("date")
        );
        assert_eq!(
            inverse.select_term("http://ex/link", &["@none"], "@type", &["@id"]),
            Some("link")
        );
        assert_eq!(inverse.select_term("http://ex/link", &["@list"], "@type", &["@id"]), None);
        assert_eq!(inverse.select_term("http://ex/missing", &["@none"], "@type", &["@id"]), None);
    }

    #[test]
    fn containers_and_reverse() {
        let ctx = context(json!({
            "items": {"@id": "http://ex/items", "@container": "@list"},
            "tags": {"@id": "http://ex/tags", "@container": ["@set", "@index"]},
            "parent": {"@reverse": "http://ex/child"},
            "anything": {"@id": "http://ex/any", "@type": "@none"}
        }));
        let inverse = ctx.inverse_context();
        assert_eq!(inverse.len(), 4);
        assert_eq!(
            inverse.select_term("http://ex/items", &["@list"], "@language", &["@none"]),
            Some("items")
        );
        assert_eq!(
            inverse.select_term("http://ex/tags", &["@index@set"], "@type", &["@none"]),
            Some("tags")
        );
        assert_eq!(
            inverse.select_term("http://ex/child", &["@none"], "@type", &["@reverse"]),
            Some("parent")
        );
        assert_eq!(
            inverse.select_term("http://ex/any", &["@none"], "@language", &["@any"]),
            Some("anything")
        );
    }

    #[test]
    fn default_direction_keys() {
        let ctx = context(json!({
            "@language": "en",
            "@direction": "ltr",
            "label": "http://ex/label"
        }));
        let maps = &ctx.inverse_context().get("http://ex/label").unwrap()["@none"];
        assert_eq!(maps.language.get("en_ltr").map(String::as_str), Some("label"));
        assert_eq!(maps.language.get("@none").map(String::as_str), Some("label"));
        assert_eq!(maps.types.get("@none").map(String::as_str), Some("label"));
    }

    #[test]
    fn null_mapped_terms_are_skipped() {
        let ctx = context(json!({"hidden": null}));
        assert!(ctx.inverse_context().is_empty());
    }
}
