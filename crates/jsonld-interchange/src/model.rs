use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::{JsonLdError, Result};

/// Name under which default-graph quads are stored.
pub const DEFAULT_GRAPH: &str = "@default";

/// An RDF literal. Always carries a datatype; carries a language tag only
/// when the datatype is `rdf:langString`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: String,
    datatype: String,
    language: Option<String>,
}

impl Literal {
    /// Build a literal. A language tag is required with `rdf:langString`,
    /// must be non-empty, and is rejected with any other datatype.
    pub fn new(
        value: impl Into<String>,
        datatype: impl Into<String>,
        language: Option<String>,
    ) -> Result<Self> {
        let datatype = datatype.into();
        match (&language, datatype == rdf::LANG_STRING) {
            (Some(lang), false) => {
                return Err(JsonLdError::invalid_literal(format!(
                    "language tag '{lang}' requires datatype {}, got {datatype}",
                    rdf::LANG_STRING
                )));
            }
            (None, true) => {
                return Err(JsonLdError::invalid_literal(format!(
                    "datatype {datatype} requires a language tag"
                )));
            }
            (Some(lang), true) if lang.is_empty() => {
                return Err(JsonLdError::invalid_literal("empty language tag"));
            }
            _ => {}
        }
        Ok(Self {
            value: value.into(),
            datatype,
            language,
        })
    }

    /// A plain `xsd:string` literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: xsd::STRING.to_string(),
            language: None,
        }
    }

    /// A literal with `datatype` and no language tag. Fails for `rdf:langString`.
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Result<Self> {
        Self::new(value, datatype, None)
    }

    /// A language-tagged `rdf:langString` literal.
    pub fn lang_string(value: impl Into<String>, language: impl Into<String>) -> Result<Self> {
        Self::new(value, rdf::LANG_STRING, Some(language.into()))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// A node in an RDF quad. Blank node labels keep their `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Iri(String),
    BlankNode(String),
    Literal(Literal),
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn blank_node(label: impl Into<String>) -> Self {
        Self::BlankNode(label.into())
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// The IRI, blank node label or lexical form.
    pub fn value(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::BlankNode(label) => label,
            Self::Literal(lit) => lit.value(),
        }
    }
}

impl From<Literal> for Node {
    fn from(l: Literal) -> Self {
        Self::Literal(l)
    }
}

/// An RDF quad. The graph name is stored on the quad itself; producers keep
/// it consistent with the dataset key the quad is added under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
    pub graph_name: String,
}

impl Quad {
    pub fn new(subject: Node, predicate: Node, object: Node, graph_name: impl Into<String>) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph_name: graph_name.into(),
        }
    }

    pub fn is_default_graph(&self) -> bool {
        self.graph_name == DEFAULT_GRAPH
    }

    /// Returns true if this quad references the given blank node label in
    /// any position, including its graph name.
    pub fn references_blank_node(&self, label: &str) -> bool {
        let in_node = |n: &Node| matches!(n, Node::BlankNode(b) if b == label);
        in_node(&self.subject)
            || in_node(&self.predicate)
            || in_node(&self.object)
            || self.graph_name == label
    }
}

/// An RDF dataset: quads grouped by graph name, insertion order kept within
/// each graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    graphs: BTreeMap<String, Vec<Quad>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `quad` to `graph_name`, creating the graph when absent.
    /// Duplicates are kept.
    pub fn add_quad(&mut self, graph_name: impl Into<String>, quad: Quad) {
        self.graphs.entry(graph_name.into()).or_default().push(quad);
    }

    /// Names of all graphs holding at least one quad, `@default` included.
    pub fn graph_names(&self) -> BTreeSet<&str> {
        self.graphs.keys().map(String::as_str).collect()
    }

    /// Quads of one graph in insertion order.
    pub fn quads(&self, graph_name: &str) -> &[Quad] {
        self.graphs.get(graph_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every quad paired with the graph it was added under.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Quad)> {
        self.graphs
            .iter()
            .flat_map(|(name, quads)| quads.iter().map(move |q| (name.as_str(), q)))
    }

    pub fn len(&self) -> usize {
        self.graphs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the set of all blank node labels in this dataset.
    pub fn blank_nodes(&self) -> HashSet<String> {
        let mut labels = HashSet::new();
        for (name, q) in self.iter() {
            for node in [&q.subject, &q.predicate, &q.object] {
                if let Node::BlankNode(b) = node {
                    labels.insert(b.clone());
                }
            }
            if name.starts_with("_:") {
                labels.insert(name.to_string());
            }
        }
        labels
    }

    /// Returns all quads that reference the given blank node label.
    pub fn quads_for_blank_node(&self, label: &str) -> Vec<&Quad> {
        self.iter()
            .map(|(_, q)| q)
            .filter(|q| q.references_blank_node(label))
            .collect()
    }
}

/// XSD namespace constants.
pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
}

/// RDF namespace constants.
pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";
}
