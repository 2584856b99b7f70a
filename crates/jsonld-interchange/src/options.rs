/*!
 * Processing options shared by context processing and the classifiers.
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_MAX_CONTEXT_DEPTH: usize = 32;

/// JSON-LD processing mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingMode {
    #[serde(rename = "json-ld-1.0")]
    JsonLd10,
    #[default]
    #[serde(rename = "json-ld-1.1")]
    JsonLd11,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonLd10 => "json-ld-1.0",
            Self::JsonLd11 => "json-ld-1.1",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supplies context documents referenced by IRI from `@context` or `@import`.
///
/// Implementations hand back documents already held in memory; fetching them
/// over the network or from disk is up to the caller.
pub trait ContextResolver: Send + Sync {
    /// Return the context document (the object holding `@context`) for `iri`.
    fn resolve(&self, iri: &str) -> Option<Value>;
}

/// A [`ContextResolver`] backed by a fixed map of IRI to document.
#[derive(Clone, Debug, Default)]
pub struct StaticContextResolver {
    documents: HashMap<String, Value>,
}

impl StaticContextResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` under `iri`, replacing any previous entry.
    pub fn with_document(mut self, iri: impl Into<String>, document: Value) -> Self {
        self.documents.insert(iri.into(), document);
        self
    }
}

impl ContextResolver for StaticContextResolver {
    fn resolve(&self, iri: &str) -> Option<Value> {
        self.documents.get(iri).cloned()
    }
}

#[derive(Clone)]
pub struct JsonLdOptions {
    pub(crate) base: Option<String>,
    pub(crate) processing_mode: ProcessingMode,
    pub(crate) context_resolver: Option<Arc<dyn ContextResolver>>,
    pub(crate) max_context_depth: usize,
}

impl JsonLdOptions {
    /// Returns a builder for `JsonLdOptions`
    /// Example:
    /// ```
    /// use jsonld_interchange::options::JsonLdOptions;
    ///
    /// let options = JsonLdOptions::builder().base("http://example.org/doc").build();
    /// assert_eq!(options.base(), Some("http://example.org/doc"));
    /// ```
    pub fn builder() -> JsonLdOptionsBuilder {
        JsonLdOptionsBuilder::default()
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn processing_mode(&self) -> ProcessingMode {
        self.processing_mode
    }

    pub fn context_resolver(&self) -> Option<&Arc<dyn ContextResolver>> {
        self.context_resolver.as_ref()
    }

    pub fn max_context_depth(&self) -> usize {
        self.max_context_depth
    }
}

impl Default for JsonLdOptions {
    fn default() -> Self {
        JsonLdOptionsBuilder::default().build()
    }
}

impl fmt::Debug for JsonLdOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLdOptions")
            .field("base", &self.base)
            .field("processing_mode", &self.processing_mode)
            .field("context_resolver", &self.context_resolver.is_some())
            .field("max_context_depth", &self.max_context_depth)
            .finish()
    }
}

/// Builder for `JsonLdOptions`.
/// Example:
/// ```
/// use jsonld_interchange::options::{JsonLdOptions, ProcessingMode};
///
/// // JSON-LD 1.1 processing with no base IRI
/// let options = JsonLdOptions::builder().build();
/// assert_eq!(options.processing_mode(), ProcessingMode::JsonLd11);
/// ```
pub struct JsonLdOptionsBuilder {
    /// Document base IRI, used to resolve relative IRIs
    base: Option<String>,

    /// Processing mode
    /// Default: json-ld-1.1
    processing_mode: ProcessingMode,

    /// Resolver for contexts referenced by IRI
    /// Without one, remote contexts fail to load
    context_resolver: Option<Arc<dyn ContextResolver>>,

    /// Maximum nesting of remote and scoped contexts
    /// Default: 32
    max_context_depth: usize,
}

impl Default for JsonLdOptionsBuilder {
    fn default() -> Self {
        JsonLdOptionsBuilder {
            base: None,
            processing_mode: ProcessingMode::default(),
            context_resolver: None,
            max_context_depth: DEFAULT_MAX_CONTEXT_DEPTH,
        }
    }
}

impl JsonLdOptionsBuilder {
    pub fn new() -> JsonLdOptionsBuilder {
        JsonLdOptionsBuilder::default()
    }

    pub fn build(self) -> JsonLdOptions {
        JsonLdOptions {
            base: self.base,
            processing_mode: self.processing_mode,
            context_resolver: self.context_resolver,
            max_context_depth: self.max_context_depth,
        }
    }

    /// Set the document base IRI
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn processing_mode(mut self, mode: ProcessingMode) -> Self {
        self.processing_mode = mode;
        self
    }

    pub fn context_resolver(mut self, resolver: Arc<dyn ContextResolver>) -> Self {
        self.context_resolver = Some(resolver);
        self
    }

    pub fn max_context_depth(mut self, depth: usize) -> Self {
        self.max_context_depth = depth;
        self
    }
}
