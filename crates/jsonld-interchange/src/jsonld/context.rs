//! Active contexts and the JSON-LD 1.1 Context Processing algorithm.
//!
//! An [`ActiveContext`] is never mutated once it has been handed out. Every
//! call to [`ActiveContext::process`] derives a new snapshot that may point back
//! at its predecessor through `previous_context`.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::classify::{is_blank_node_identifier, is_iri, iri_ends_with_general_delimiter};
use super::inverse::InverseContext;
use super::keywords::{
    BASE, CONTAINER, CONTEXT, DIRECTION, ID, IMPORT, INDEX, JSON, LANGUAGE, NEST, NONE, PREFIX,
    PROPAGATE, PROTECTED, REVERSE, SET, TYPE, VERSION, VOCAB, is_keyword, is_keyword_form,
    is_language_form,
};
use super::term::{Container, Direction, TermDefinition};
use crate::error::{JsonLdError, Result};
use crate::options::{JsonLdOptions, ProcessingMode};
use crate::uri;

/// Context entries that are not term definitions.
const CONTEXT_KEYWORDS: [&str; 8] = [BASE, DIRECTION, IMPORT, LANGUAGE, PROPAGATE, PROTECTED, VERSION, VOCAB];

/// Entries allowed in an expanded term definition.
const TERM_KEYWORDS: [&str; 11] = [
    ID, REVERSE, CONTAINER, CONTEXT, DIRECTION, INDEX, LANGUAGE, NEST, PREFIX, PROTECTED, TYPE,
];

/// The processing state that maps terms to IRIs and carries the document's
/// default base, vocabulary, language and direction.
#[derive(Debug)]
pub struct ActiveContext {
    term_definitions: IndexMap<String, TermDefinition>,
    base_iri: Option<String>,
    original_base_url: Option<String>,
    vocabulary_mapping: Option<String>,
    default_language: Option<String>,
    default_base_direction: Option<Direction>,
    previous_context: Option<Arc<ActiveContext>>,
    inverse_context: OnceLock<InverseContext>,
    options: JsonLdOptions,
}

/// Cloning yields a fresh snapshot: the inverse context is rebuilt on demand.
impl Clone for ActiveContext {
    fn clone(&self) -> Self {
        Self {
            term_definitions: self.term_definitions.clone(),
            base_iri: self.base_iri.clone(),
            original_base_url: self.original_base_url.clone(),
            vocabulary_mapping: self.vocabulary_mapping.clone(),
            default_language: self.default_language.clone(),
            default_base_direction: self.default_base_direction,
            previous_context: self.previous_context.clone(),
            inverse_context: OnceLock::new(),
            options: self.options.clone(),
        }
    }
}

impl ActiveContext {
    /// An empty context whose base IRI is the document base from `options`.
    pub fn new(options: JsonLdOptions) -> Arc<Self> {
        let base = options.base().map(str::to_string);
        Arc::new(Self::initial(options, base))
    }

    fn initial(options: JsonLdOptions, base: Option<String>) -> Self {
        Self {
            term_definitions: IndexMap::new(),
            base_iri: base.clone(),
            original_base_url: base,
            vocabulary_mapping: None,
            default_language: None,
            default_base_direction: None,
            previous_context: None,
            inverse_context: OnceLock::new(),
            options,
        }
    }

    /// Derive a new context by applying `local_context` (`null`, an IRI, a
    /// context map, or an array of those) to this one.
    ///
    /// With `propagate` false (type-scoped contexts), the derived context keeps
    /// a link to this one so callers can step back out of the scope.
    pub fn process(self: &Arc<Self>, local_context: &Value, propagate: bool) -> Result<Arc<Self>> {
        let base_url = self.original_base_url.as_deref().or(self.base_iri.as_deref());
        self.process_with(local_context, base_url, false, propagate)
    }

    /// [`process`](Self::process) with an explicit base URL for resolving
    /// context references, and the option of redefining protected terms
    /// (property-scoped contexts).
    pub fn process_with(
        self: &Arc<Self>,
        local_context: &Value,
        base_url: Option<&str>,
        override_protected: bool,
        propagate: bool,
    ) -> Result<Arc<Self>> {
        let mut remote_contexts = Vec::new();
        let result = process_local(
            self,
            local_context,
            base_url,
            &mut remote_contexts,
            override_protected,
            propagate,
            true,
        )?;
        tracing::debug!(
            terms = result.term_definitions.len(),
            propagate,
            has_previous = result.previous_context.is_some(),
            "derived active context"
        );
        Ok(Arc::new(result))
    }

    /// The context in effect before a non-propagated context was entered, or
    /// this context when there is none.
    pub fn revert_to_previous(self: &Arc<Self>) -> Arc<Self> {
        self.previous_context
            .clone()
            .unwrap_or_else(|| Arc::clone(self))
    }

    /// Expand `value` to an IRI, keyword or blank node identifier.
    ///
    /// `vocab` allows term and `@vocab` lookups; `document_relative` resolves
    /// what is left against the base IRI. Returns `None` for keyword-like
    /// strings and for terms explicitly mapped to `null`.
    pub fn expand_iri(&self, value: &str, document_relative: bool, vocab: bool) -> Option<String> {
        if is_keyword(value) {
            return Some(value.to_string());
        }
        if is_keyword_form(value) {
            return None;
        }

        if let Some(definition) = self.term_definitions.get(value) {
            if vocab || definition.iri.as_deref().is_some_and(is_keyword) {
                return definition.iri.clone();
            }
        }

        if let Some((prefix, suffix)) = split_compact_iri(value) {
            if prefix == "_" || suffix.starts_with("//") {
                return Some(value.to_string());
            }
            if let Some(definition) = self.term_definitions.get(prefix)
                && definition.prefix
                && let Some(iri) = &definition.iri
            {
                return Some(format!("{iri}{suffix}"));
            }
            if uri::is_absolute(value) {
                return Some(value.to_string());
            }
        }

        if vocab && let Some(mapping) = &self.vocabulary_mapping {
            return Some(format!("{mapping}{value}"));
        }
        if document_relative && let Some(base) = &self.base_iri {
            return Some(uri::resolve(base, value).unwrap_or_else(|_| value.to_string()));
        }
        Some(value.to_string())
    }

    pub fn base_iri(&self) -> Option<&str> {
        self.base_iri.as_deref()
    }

    pub fn original_base_url(&self) -> Option<&str> {
        self.original_base_url.as_deref()
    }

    pub fn vocabulary_mapping(&self) -> Option<&str> {
        self.vocabulary_mapping.as_deref()
    }

    pub fn default_language(&self) -> Option<&str> {
        self.default_language.as_deref()
    }

    pub fn default_base_direction(&self) -> Option<Direction> {
        self.default_base_direction
    }

    pub fn term_definition(&self, term: &str) -> Option<&TermDefinition> {
        self.term_definitions.get(term)
    }

    /// Term definitions in the order they were defined.
    pub fn term_definitions(&self) -> impl Iterator<Item = (&str, &TermDefinition)> {
        self.term_definitions
            .iter()
            .map(|(term, definition)| (term.as_str(), definition))
    }

    pub fn has_protected_terms(&self) -> bool {
        self.term_definitions.values().any(|d| d.protected)
    }

    pub fn previous_context(&self) -> Option<&Arc<ActiveContext>> {
        self.previous_context.as_ref()
    }

    /// The inverse context, built on first use.
    pub fn inverse_context(&self) -> &InverseContext {
        self.inverse_context.get_or_init(|| InverseContext::new(self))
    }

    pub fn is_reverse_property(&self, term: &str) -> bool {
        self.term_definitions.get(term).is_some_and(|d| d.reverse)
    }

    pub fn is_processing_mode(&self, mode: ProcessingMode) -> bool {
        self.options.processing_mode() == mode
    }

    pub fn options(&self) -> &JsonLdOptions {
        &self.options
    }

    fn is_legacy(&self) -> bool {
        self.is_processing_mode(ProcessingMode::JsonLd10)
    }
}

/// State shared by the term definitions of one context map.
struct TermScope<'a> {
    local: &'a Map<String, Value>,
    defined: HashMap<String, bool>,
    base_url: Option<&'a str>,
    protected: bool,
    override_protected: bool,
    remote_contexts: &'a [String],
}

fn process_local(
    active: &Arc<ActiveContext>,
    local_context: &Value,
    base_url: Option<&str>,
    remote_contexts: &mut Vec<String>,
    override_protected: bool,
    mut propagate: bool,
    validate_scoped: bool,
) -> Result<ActiveContext> {
    let mut result = ActiveContext::clone(active);

    if let Some(value) = local_context.get(PROPAGATE) {
        propagate = value
            .as_bool()
            .ok_or_else(|| JsonLdError::InvalidPropagateValue(value.to_string()))?;
    }
    if !propagate && result.previous_context.is_none() {
        result.previous_context = Some(Arc::clone(active));
    }

    let contexts = match local_context {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };

    for context in contexts {
        match context {
            Value::Null => {
                if !override_protected && result.has_protected_terms() {
                    return Err(JsonLdError::InvalidContextNullification(
                        "cannot clear a context that holds protected terms".to_string(),
                    ));
                }
                let fresh = ActiveContext::initial(
                    result.options.clone(),
                    active.original_base_url.clone(),
                );
                let previous = std::mem::replace(&mut result, fresh);
                if !propagate {
                    result.previous_context = Some(Arc::new(previous));
                }
            }
            Value::String(reference) => {
                let context_iri = resolve_context_reference(base_url, reference)?;
                if !validate_scoped && remote_contexts.contains(&context_iri) {
                    continue;
                }
                if remote_contexts.len() >= result.options.max_context_depth() {
                    return Err(JsonLdError::ContextOverflow(format!(
                        "more than {} nested context references at '{context_iri}'",
                        result.options.max_context_depth()
                    )));
                }
                remote_contexts.push(context_iri.clone());

                let document = load_context(&result.options, &context_iri)?;
                tracing::debug!(context = %context_iri, "processing referenced context");
                let snapshot = Arc::new(result);
                let mut nested = remote_contexts.clone();
                result = process_local(
                    &snapshot,
                    &document,
                    Some(&context_iri),
                    &mut nested,
                    false,
                    true,
                    validate_scoped,
                )?;
            }
            Value::Object(map) => {
                process_context_map(&mut result, map, base_url, remote_contexts, override_protected)?;
            }
            other => {
                return Err(JsonLdError::local_context(format!(
                    "{other} is not a valid local context"
                )));
            }
        }
    }

    Ok(result)
}

fn resolve_context_reference(base_url: Option<&str>, reference: &str) -> Result<String> {
    match base_url {
        Some(base) => uri::resolve(base, reference)
            .map_err(|e| JsonLdError::LoadingRemoteContextFailed(e.to_string())),
        None if uri::is_absolute(reference) => Ok(reference.to_string()),
        None => Err(JsonLdError::LoadingRemoteContextFailed(format!(
            "cannot resolve relative context reference '{reference}' without a base IRI"
        ))),
    }
}

/// Fetch the `@context` entry of the document registered for `iri`.
fn load_context(options: &JsonLdOptions, iri: &str) -> Result<Value> {
    let resolver = options.context_resolver().ok_or_else(|| {
        JsonLdError::LoadingRemoteContextFailed(format!("no context resolver configured for '{iri}'"))
    })?;
    let document = resolver
        .resolve(iri)
        .ok_or_else(|| JsonLdError::LoadingRemoteContextFailed(format!("context '{iri}' not found")))?;
    match document {
        Value::Object(mut map) => map.remove(CONTEXT).ok_or_else(|| {
            JsonLdError::InvalidRemoteContext(format!("document '{iri}' has no @context entry"))
        }),
        _ => Err(JsonLdError::InvalidRemoteContext(format!(
            "document '{iri}' is not a JSON object"
        ))),
    }
}

fn process_context_map(
    result: &mut ActiveContext,
    context: &Map<String, Value>,
    base_url: Option<&str>,
    remote_contexts: &[String],
    override_protected: bool,
) -> Result<()> {
    let legacy = result.is_legacy();

    if let Some(version) = context.get(VERSION) {
        if version.as_f64() != Some(1.1) {
            return Err(JsonLdError::InvalidVersionValue(version.to_string()));
        }
        if legacy {
            return Err(JsonLdError::ProcessingModeConflict(
                "@version 1.1 in json-ld-1.0 mode".to_string(),
            ));
        }
    }

    let imported;
    let context = match context.get(IMPORT) {
        None => context,
        Some(import) => {
            if legacy {
                return Err(JsonLdError::InvalidContextEntry(
                    "@import requires json-ld-1.1".to_string(),
                ));
            }
            let reference = import
                .as_str()
                .ok_or_else(|| JsonLdError::InvalidImportValue(import.to_string()))?;
            let import_iri = resolve_context_reference(base_url, reference)?;
            let Value::Object(mut merged) = load_context(&result.options, &import_iri)? else {
                return Err(JsonLdError::InvalidRemoteContext(format!(
                    "imported context '{import_iri}' is not a JSON object"
                )));
            };
            if merged.contains_key(IMPORT) {
                return Err(JsonLdError::InvalidContextEntry(format!(
                    "imported context '{import_iri}' contains @import"
                )));
            }
            for (key, value) in context {
                merged.insert(key.clone(), value.clone());
            }
            imported = merged;
            &imported
        }
    };

    if let Some(base) = context.get(BASE)
        && remote_contexts.is_empty()
    {
        result.base_iri = match base {
            Value::Null => None,
            Value::String(iri) if uri::is_absolute(iri) => Some(iri.clone()),
            Value::String(iri) => match result.base_iri.as_deref() {
                Some(current) => Some(
                    uri::resolve(current, iri)
                        .map_err(|e| JsonLdError::InvalidBaseIri(e.to_string()))?,
                ),
                None => {
                    return Err(JsonLdError::InvalidBaseIri(format!(
                        "relative @base '{iri}' with no base IRI to resolve against"
                    )));
                }
            },
            other => return Err(JsonLdError::InvalidBaseIri(other.to_string())),
        };
    }

    if let Some(vocab) = context.get(VOCAB) {
        result.vocabulary_mapping = match vocab {
            Value::Null => None,
            Value::String(value) if legacy => {
                if !(uri::is_absolute(value) || is_blank_node_identifier(value)) {
                    return Err(JsonLdError::InvalidVocabMapping(value.clone()));
                }
                Some(value.clone())
            }
            Value::String(value) => match result.expand_iri(value, true, true) {
                Some(iri) if is_blank_node_identifier(&iri) || is_iri(&iri) => Some(iri),
                _ => return Err(JsonLdError::InvalidVocabMapping(value.clone())),
            },
            other => return Err(JsonLdError::InvalidVocabMapping(other.to_string())),
        };
    }

    if let Some(language) = context.get(LANGUAGE) {
        result.default_language = match language {
            Value::Null => None,
            Value::String(tag) => {
                if !is_language_form(tag) {
                    tracing::warn!(language = %tag, "@language is not a well-formed language tag");
                }
                Some(tag.clone())
            }
            other => return Err(JsonLdError::InvalidDefaultLanguage(other.to_string())),
        };
    }

    if let Some(direction) = context.get(DIRECTION) {
        if legacy {
            return Err(JsonLdError::InvalidContextEntry(
                "@direction requires json-ld-1.1".to_string(),
            ));
        }
        result.default_base_direction = match direction {
            Value::Null => None,
            Value::String(value) => Some(value.parse().map_err(JsonLdError::InvalidBaseDirection)?),
            other => return Err(JsonLdError::InvalidBaseDirection(other.to_string())),
        };
    }

    if let Some(propagate) = context.get(PROPAGATE) {
        if legacy {
            return Err(JsonLdError::InvalidContextEntry(
                "@propagate requires json-ld-1.1".to_string(),
            ));
        }
        if !propagate.is_boolean() {
            return Err(JsonLdError::InvalidPropagateValue(propagate.to_string()));
        }
    }

    let protected = match context.get(PROTECTED) {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => return Err(JsonLdError::InvalidProtectedValue(other.to_string())),
    };

    let mut scope = TermScope {
        local: context,
        defined: HashMap::new(),
        base_url,
        protected,
        override_protected,
        remote_contexts,
    };
    for term in context.keys() {
        if CONTEXT_KEYWORDS.contains(&term.as_str()) {
            continue;
        }
        create_term_definition(result, &mut scope, term)?;
    }
    Ok(())
}

fn create_term_definition(
    result: &mut ActiveContext,
    scope: &mut TermScope<'_>,
    term: &str,
) -> Result<()> {
    match scope.defined.get(term) {
        Some(true) => return Ok(()),
        Some(false) => return Err(JsonLdError::CyclicIriMapping(term.to_string())),
        None => {}
    }
    if term.is_empty() {
        return Err(JsonLdError::term_definition("the empty string is not a valid term"));
    }
    let local = scope.local;
    let Some(value) = local.get(term) else {
        return Ok(());
    };
    scope.defined.insert(term.to_string(), false);

    let legacy = result.is_legacy();

    if term == TYPE {
        let only_set_or_protected = value.as_object().is_some_and(|map| {
            !map.is_empty()
                && map.iter().all(|(key, entry)| {
                    (key == CONTAINER && entry.as_str() == Some(SET)) || key == PROTECTED
                })
        });
        if legacy || !only_set_or_protected {
            return Err(JsonLdError::KeywordRedefinition(term.to_string()));
        }
    } else if is_keyword(term) {
        return Err(JsonLdError::KeywordRedefinition(term.to_string()));
    } else if is_keyword_form(term) {
        tracing::warn!(term, "ignoring term that has the form of a keyword");
        scope.defined.insert(term.to_string(), true);
        return Ok(());
    }

    let previous_definition = result
        .term_definitions
        .shift_remove_full(term)
        .map(|(index, _, definition)| (index, definition));

    let (entries, simple_term) = match value {
        Value::Null => {
            let mut entries = Map::new();
            entries.insert(ID.to_string(), Value::Null);
            (entries, false)
        }
        Value::String(_) => {
            let mut entries = Map::new();
            entries.insert(ID.to_string(), value.clone());
            (entries, true)
        }
        Value::Object(map) => (map.clone(), false),
        other => {
            return Err(JsonLdError::term_definition(format!(
                "'{term}' is defined as {other}"
            )));
        }
    };

    let mut definition = TermDefinition {
        protected: scope.protected,
        ..Default::default()
    };

    if let Some(protected) = entries.get(PROTECTED) {
        if legacy {
            return Err(JsonLdError::term_definition(format!(
                "'{term}': @protected requires json-ld-1.1"
            )));
        }
        definition.protected = protected
            .as_bool()
            .ok_or_else(|| JsonLdError::InvalidProtectedValue(protected.to_string()))?;
    }

    if let Some(type_value) = entries.get(TYPE) {
        let type_name = type_value
            .as_str()
            .ok_or_else(|| JsonLdError::InvalidTypeMapping(type_value.to_string()))?;
        let expanded = expand_iri_in_scope(result, scope, type_name, false, true)?
            .ok_or_else(|| JsonLdError::InvalidTypeMapping(type_name.to_string()))?;
        let allowed = match expanded.as_str() {
            ID | VOCAB => true,
            JSON | NONE => !legacy,
            other => !is_keyword(other) && uri::is_absolute(other),
        };
        if !allowed {
            return Err(JsonLdError::InvalidTypeMapping(format!(
                "'{term}' has @type '{type_name}'"
            )));
        }
        definition.type_mapping = Some(expanded);
    }

    if let Some(reverse) = entries.get(REVERSE) {
        if entries.contains_key(ID) || entries.contains_key(NEST) {
            return Err(JsonLdError::InvalidReverseProperty(format!(
                "'{term}' combines @reverse with @id or @nest"
            )));
        }
        let reverse = reverse
            .as_str()
            .ok_or_else(|| JsonLdError::InvalidIriMapping(reverse.to_string()))?;
        if is_keyword_form(reverse) {
            tracing::warn!(term, reverse, "ignoring @reverse that has the form of a keyword");
            return ignore_definition(scope, term, previous_definition);
        }
        let iri = expand_iri_in_scope(result, scope, reverse, false, true)?
            .filter(|iri| uri::is_absolute(iri) || is_blank_node_identifier(iri))
            .ok_or_else(|| JsonLdError::InvalidIriMapping(format!("'{term}' reverses '{reverse}'")))?;
        definition.iri = Some(iri);
        if let Some(container) = entries.get(CONTAINER) {
            definition.container = match container.as_str() {
                _ if container.is_null() => Vec::new(),
                Some(SET) => vec![Container::Set],
                Some(INDEX) => vec![Container::Index],
                _ => {
                    return Err(JsonLdError::InvalidReverseProperty(format!(
                        "'{term}' has @container {container}"
                    )));
                }
            };
        }
        definition.reverse = true;
        return finish_definition(result, scope, term, definition, previous_definition);
    }

    let explicit_id = entries.get(ID).filter(|id| id.as_str() != Some(term));
    if let Some(id) = explicit_id {
        match id {
            Value::Null => {}
            Value::String(id) => {
                if !is_keyword(id) && is_keyword_form(id) {
                    tracing::warn!(term, id = %id, "ignoring @id that has the form of a keyword");
                    return ignore_definition(scope, term, previous_definition);
                }
                let iri = expand_iri_in_scope(result, scope, id, false, true)?
                    .filter(|iri| {
                        is_keyword(iri) || uri::is_absolute(iri) || is_blank_node_identifier(iri)
                    })
                    .ok_or_else(|| JsonLdError::InvalidIriMapping(format!("'{term}' maps to '{id}'")))?;
                if iri == CONTEXT {
                    return Err(JsonLdError::InvalidKeywordAlias(term.to_string()));
                }
                if has_inner_colon(term) || term.contains('/') {
                    scope.defined.insert(term.to_string(), true);
                    let expanded_term = expand_iri_in_scope(result, scope, term, false, true)?;
                    if expanded_term.as_deref() != Some(iri.as_str()) {
                        return Err(JsonLdError::InvalidIriMapping(format!(
                            "'{term}' looks like an IRI but maps to '{iri}'"
                        )));
                    }
                }
                if !term.contains([':', '/'])
                    && simple_term
                    && (iri_ends_with_general_delimiter(&iri) || is_blank_node_identifier(&iri))
                {
                    definition.prefix = true;
                }
                definition.iri = Some(iri);
            }
            other => {
                return Err(JsonLdError::InvalidIriMapping(format!(
                    "'{term}' has @id {other}"
                )));
            }
        }
    } else if let Some((prefix, suffix)) = split_compact_iri(term) {
        if local.contains_key(prefix) {
            create_term_definition(result, scope, prefix)?;
        }
        let prefix_iri = result
            .term_definitions
            .get(prefix)
            .and_then(|d| d.iri.as_deref());
        definition.iri = Some(match prefix_iri {
            Some(prefix_iri) => format!("{prefix_iri}{suffix}"),
            None => term.to_string(),
        });
    } else if term.contains('/') {
        let iri = expand_iri_in_scope(result, scope, term, false, true)?
            .filter(|iri| uri::is_absolute(iri))
            .ok_or_else(|| JsonLdError::InvalidIriMapping(term.to_string()))?;
        definition.iri = Some(iri);
    } else if term == TYPE {
        definition.iri = Some(TYPE.to_string());
    } else if let Some(vocab) = &result.vocabulary_mapping {
        definition.iri = Some(format!("{vocab}{term}"));
    } else {
        return Err(JsonLdError::InvalidIriMapping(format!(
            "'{term}' has no @id and no @vocab is in effect"
        )));
    }

    if let Some(container) = entries.get(CONTAINER) {
        definition.container = parse_container(container, legacy)?;
        if definition.has_container(Container::Type) {
            match definition.type_mapping.as_deref() {
                None => definition.type_mapping = Some(ID.to_string()),
                Some(ID | VOCAB) => {}
                Some(other) => {
                    return Err(JsonLdError::InvalidTypeMapping(format!(
                        "'{term}' has an @type container with @type '{other}'"
                    )));
                }
            }
        }
    }

    if let Some(index) = entries.get(INDEX) {
        if legacy || !definition.has_container(Container::Index) {
            return Err(JsonLdError::term_definition(format!(
                "'{term}' has @index without an @index container"
            )));
        }
        let index = index
            .as_str()
            .ok_or_else(|| JsonLdError::term_definition(format!("'{term}' has @index {index}")))?;
        let expanded = expand_iri_in_scope(result, scope, index, false, true)?;
        if !expanded.as_deref().is_some_and(uri::is_absolute) {
            return Err(JsonLdError::term_definition(format!(
                "'{term}' has @index '{index}' that is not an IRI"
            )));
        }
        definition.index = Some(index.to_string());
    }

    if let Some(scoped) = entries.get(CONTEXT) {
        if legacy {
            return Err(JsonLdError::term_definition(format!(
                "'{term}': scoped contexts require json-ld-1.1"
            )));
        }
        let snapshot = Arc::new(result.clone());
        let mut remote_contexts = scope.remote_contexts.to_vec();
        process_local(
            &snapshot,
            scoped,
            scope.base_url,
            &mut remote_contexts,
            true,
            true,
            false,
        )
        .map_err(|e| JsonLdError::InvalidScopedContext(format!("'{term}': {e}")))?;
        definition.context = Some(scoped.clone());
        definition.base_url = scope.base_url.map(str::to_string);
    }

    if !entries.contains_key(TYPE) {
        if let Some(language) = entries.get(LANGUAGE) {
            definition.language = Some(match language {
                Value::Null => None,
                Value::String(tag) => {
                    if !is_language_form(tag) {
                        tracing::warn!(term, language = %tag, "@language is not a well-formed language tag");
                    }
                    Some(tag.clone())
                }
                other => return Err(JsonLdError::InvalidLanguageMapping(other.to_string())),
            });
        }
        if let Some(direction) = entries.get(DIRECTION) {
            definition.direction = Some(match direction {
                Value::Null => None,
                Value::String(value) => {
                    Some(value.parse().map_err(JsonLdError::InvalidBaseDirection)?)
                }
                other => return Err(JsonLdError::InvalidBaseDirection(other.to_string())),
            });
        }
    }

    if let Some(nest) = entries.get(NEST) {
        if legacy {
            return Err(JsonLdError::term_definition(format!(
                "'{term}': @nest requires json-ld-1.1"
            )));
        }
        let nest = nest
            .as_str()
            .filter(|n| !is_keyword(n) || *n == NEST)
            .ok_or_else(|| JsonLdError::InvalidNestValue(nest.to_string()))?;
        definition.nest = Some(nest.to_string());
    }

    if let Some(prefix) = entries.get(PREFIX) {
        if legacy || term.contains([':', '/']) {
            return Err(JsonLdError::term_definition(format!(
                "'{term}' cannot carry @prefix"
            )));
        }
        definition.prefix = prefix
            .as_bool()
            .ok_or_else(|| JsonLdError::InvalidPrefixValue(prefix.to_string()))?;
        if definition.prefix && definition.iri.as_deref().is_some_and(is_keyword) {
            return Err(JsonLdError::term_definition(format!(
                "keyword alias '{term}' cannot be a prefix"
            )));
        }
    }

    if let Some(key) = entries.keys().find(|k| !TERM_KEYWORDS.contains(&k.as_str())) {
        return Err(JsonLdError::term_definition(format!(
            "'{term}' has unexpected entry '{key}'"
        )));
    }

    finish_definition(result, scope, term, definition, previous_definition)
}

fn finish_definition(
    result: &mut ActiveContext,
    scope: &mut TermScope<'_>,
    term: &str,
    mut definition: TermDefinition,
    previous_definition: Option<(usize, TermDefinition)>,
) -> Result<()> {
    let mut position = None;
    if let Some((index, previous)) = previous_definition {
        position = Some(index);
        if !scope.override_protected && previous.protected {
            if !definition.same_definition(&previous) {
                return Err(JsonLdError::ProtectedTermRedefinition(term.to_string()));
            }
            definition = previous;
        }
    }
    tracing::trace!(term, iri = ?definition.iri, "created term definition");
    match position {
        Some(index) => {
            // Terms removed while this one was being defined can shorten the table.
            let index = index.min(result.term_definitions.len());
            result
                .term_definitions
                .shift_insert(index, term.to_string(), definition);
        }
        None => {
            result.term_definitions.insert(term.to_string(), definition);
        }
    }
    scope.defined.insert(term.to_string(), true);
    Ok(())
}

/// A definition ignored with a warning leaves the term undefined, which is
/// a redefinition when the previous definition was protected.
fn ignore_definition(
    scope: &mut TermScope<'_>,
    term: &str,
    previous_definition: Option<(usize, TermDefinition)>,
) -> Result<()> {
    if !scope.override_protected
        && previous_definition.is_some_and(|(_, previous)| previous.protected)
    {
        return Err(JsonLdError::ProtectedTermRedefinition(term.to_string()));
    }
    scope.defined.insert(term.to_string(), true);
    Ok(())
}

/// IRI expansion while a context map is being processed: terms of the map
/// that are still undefined are defined first.
fn expand_iri_in_scope(
    result: &mut ActiveContext,
    scope: &mut TermScope<'_>,
    value: &str,
    document_relative: bool,
    vocab: bool,
) -> Result<Option<String>> {
    if is_keyword(value) {
        return Ok(Some(value.to_string()));
    }
    if is_keyword_form(value) {
        tracing::warn!(value, "ignoring value that has the form of a keyword");
        return Ok(None);
    }
    if scope.local.contains_key(value) && scope.defined.get(value) != Some(&true) {
        create_term_definition(result, scope, value)?;
    }
    if let Some((prefix, _)) = split_compact_iri(value)
        && scope.local.contains_key(prefix)
        && scope.defined.get(prefix) != Some(&true)
    {
        create_term_definition(result, scope, prefix)?;
    }
    Ok(result.expand_iri(value, document_relative, vocab))
}

fn parse_container(value: &Value, legacy: bool) -> Result<Vec<Container>> {
    let invalid = || JsonLdError::InvalidContainerMapping(value.to_string());
    let names: Vec<&str> = match value {
        Value::String(name) => vec![name.as_str()],
        Value::Array(items) if !legacy => items
            .iter()
            .map(|item| item.as_str().ok_or_else(invalid))
            .collect::<Result<_>>()?,
        _ => return Err(invalid()),
    };
    let mut containers = names
        .into_iter()
        .map(|name| name.parse::<Container>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;
    containers.sort_unstable();
    containers.dedup();

    if legacy
        && containers
            .iter()
            .any(|c| matches!(c, Container::Graph | Container::Id | Container::Type))
    {
        return Err(invalid());
    }

    let has = |c: Container| containers.contains(&c);
    let valid = match containers.len() {
        0 => false,
        1 => true,
        _ if has(Container::List) => false,
        _ if has(Container::Graph) => {
            !(has(Container::Id) && has(Container::Index))
                && containers.iter().all(|c| {
                    matches!(c, Container::Graph | Container::Id | Container::Index | Container::Set)
                })
        }
        2 => has(Container::Set),
        _ => false,
    };
    if !valid {
        return Err(invalid());
    }
    Ok(containers)
}

/// Split at the first `:` after the first character.
fn split_compact_iri(value: &str) -> Option<(&str, &str)> {
    value
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == ':')
        .map(|(i, _)| (&value[..i], &value[i + 1..]))
}

/// Does `term` contain a `:` other than as its first or last character?
fn has_inner_colon(term: &str) -> bool {
    term.char_indices()
        .any(|(i, c)| c == ':' && i > 0 && i + 1 < term.len())
}
