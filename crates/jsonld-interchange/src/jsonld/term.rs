use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::keywords;

/// Base direction of a string (`@direction`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            other => Err(format!("invalid base direction '{other}'")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value of `@container`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Container {
    Graph,
    Id,
    Index,
    Language,
    List,
    Set,
    Type,
}

impl Container {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graph => keywords::GRAPH,
            Self::Id => keywords::ID,
            Self::Index => keywords::INDEX,
            Self::Language => keywords::LANGUAGE,
            Self::List => keywords::LIST,
            Self::Set => keywords::SET,
            Self::Type => keywords::TYPE,
        }
    }
}

impl FromStr for Container {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            keywords::GRAPH => Ok(Self::Graph),
            keywords::ID => Ok(Self::Id),
            keywords::INDEX => Ok(Self::Index),
            keywords::LANGUAGE => Ok(Self::Language),
            keywords::LIST => Ok(Self::List),
            keywords::SET => Ok(Self::Set),
            keywords::TYPE => Ok(Self::Type),
            other => Err(format!("unknown container '{other}'")),
        }
    }
}

/// A single term definition within an active context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermDefinition {
    /// IRI mapping. `None` when the term is explicitly mapped to `null`.
    pub iri: Option<String>,
    pub reverse: bool,
    /// `@id`, `@vocab`, `@json`, `@none` or a datatype IRI.
    pub type_mapping: Option<String>,
    /// Container mapping, sorted and deduplicated. Empty when absent.
    pub container: Vec<Container>,
    /// `Some(None)` records an explicit `"@language": null`.
    pub language: Option<Option<String>>,
    /// `Some(None)` records an explicit `"@direction": null`.
    pub direction: Option<Option<Direction>>,
    pub protected: bool,
    pub prefix: bool,
    pub nest: Option<String>,
    pub index: Option<String>,
    /// Scoped context, kept unprocessed until the term is used.
    pub context: Option<Value>,
    /// Base URL the scoped context is resolved against.
    pub base_url: Option<String>,
}

impl TermDefinition {
    pub fn has_container(&self, container: Container) -> bool {
        self.container.contains(&container)
    }

    /// Key used for this definition's container in the inverse context:
    /// the sorted container keywords concatenated, or `@none`.
    pub fn container_key(&self) -> String {
        if self.container.is_empty() {
            return keywords::NONE.to_string();
        }
        let mut names: Vec<&str> = self.container.iter().map(Container::as_str).collect();
        names.sort_unstable();
        names.concat()
    }

    /// Equal in every field except `protected`.
    pub(crate) fn same_definition(&self, other: &TermDefinition) -> bool {
        let mut candidate = self.clone();
        candidate.protected = other.protected;
        candidate == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parsing() {
        assert_eq!("ltr".parse::<Direction>().unwrap(), Direction::Ltr);
        assert_eq!("rtl".parse::<Direction>().unwrap(), Direction::Rtl);
        assert!("LTR".parse::<Direction>().is_err());
        assert_eq!(serde_json::to_string(&Direction::Rtl).unwrap(), "\"rtl\"");
    }

    #[test]
    fn container_key_is_sorted() {
        let def = TermDefinition {
            container: vec![Container::Set, Container::Index],
            ..Default::default()
        };
        assert_eq!(def.container_key(), "@index@set");
        assert_eq!(TermDefinition::default().container_key(), "@none");
        assert!(def.has_container(Container::Index));
        assert!(!def.has_container(Container::List));
    }

    #[test]
    fn same_definition_ignores_protected() {
        let a = TermDefinition {
            iri: Some("http://example.org/a".to_string()),
            protected: true,
            ..Default::default()
        };
        let mut b = a.clone();
        b.protected = false;
        assert!(a.same_definition(&b));
        b.iri = Some("http://example.org/b".to_string());
        assert!(!a.same_definition(&b));
    }
}
