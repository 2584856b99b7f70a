use std::fmt;

/// Errors raised by N-Quads parsing, IRI handling, literal construction and
/// context processing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonLdError {
    #[error("N-Quads syntax error on line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    #[error("Protected term redefinition: {0}")]
    ProtectedTermRedefinition(String),

    #[error("Invalid context nullification: {0}")]
    InvalidContextNullification(String),

    #[error("Invalid local context: {0}")]
    InvalidLocalContext(String),

    #[error("Invalid base IRI: {0}")]
    InvalidBaseIri(String),

    #[error("Invalid vocab mapping: {0}")]
    InvalidVocabMapping(String),

    #[error("Invalid default language: {0}")]
    InvalidDefaultLanguage(String),

    #[error("Invalid base direction: {0}")]
    InvalidBaseDirection(String),

    #[error("Invalid @version value: {0}")]
    InvalidVersionValue(String),

    #[error("Processing mode conflict: {0}")]
    ProcessingModeConflict(String),

    #[error("Invalid @propagate value: {0}")]
    InvalidPropagateValue(String),

    #[error("Invalid @import value: {0}")]
    InvalidImportValue(String),

    #[error("Invalid term definition: {0}")]
    InvalidTermDefinition(String),

    #[error("Keyword redefinition: {0}")]
    KeywordRedefinition(String),

    #[error("Invalid IRI mapping: {0}")]
    InvalidIriMapping(String),

    #[error("Cyclic IRI mapping: {0}")]
    CyclicIriMapping(String),

    #[error("Invalid reverse property: {0}")]
    InvalidReverseProperty(String),

    #[error("Invalid type mapping: {0}")]
    InvalidTypeMapping(String),

    #[error("Invalid container mapping: {0}")]
    InvalidContainerMapping(String),

    #[error("Invalid language mapping: {0}")]
    InvalidLanguageMapping(String),

    #[error("Invalid @nest value: {0}")]
    InvalidNestValue(String),

    #[error("Invalid @prefix value: {0}")]
    InvalidPrefixValue(String),

    #[error("Invalid scoped context: {0}")]
    InvalidScopedContext(String),

    #[error("Invalid keyword alias: {0}")]
    InvalidKeywordAlias(String),

    #[error("Loading remote context failed: {0}")]
    LoadingRemoteContextFailed(String),

    #[error("Invalid remote context: {0}")]
    InvalidRemoteContext(String),

    #[error("Invalid context entry: {0}")]
    InvalidContextEntry(String),

    #[error("Invalid @protected value: {0}")]
    InvalidProtectedValue(String),

    #[error("Context overflow: {0}")]
    ContextOverflow(String),
}

/// Result type alias for JSON-LD and RDF operations.
pub type Result<T> = std::result::Result<T, JsonLdError>;

impl JsonLdError {
    pub fn syntax(line: usize, msg: impl fmt::Display) -> Self {
        Self::SyntaxError {
            line,
            message: msg.to_string(),
        }
    }

    pub fn invalid_iri(msg: impl fmt::Display) -> Self {
        Self::InvalidIri(msg.to_string())
    }

    pub fn invalid_literal(msg: impl fmt::Display) -> Self {
        Self::InvalidLiteral(msg.to_string())
    }

    pub fn term_definition(msg: impl fmt::Display) -> Self {
        Self::InvalidTermDefinition(msg.to_string())
    }

    pub fn local_context(msg: impl fmt::Display) -> Self {
        Self::InvalidLocalContext(msg.to_string())
    }

    /// The JSON-LD API error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SyntaxError { .. } => "syntax error",
            Self::InvalidIri(_) => "invalid IRI",
            Self::InvalidLiteral(_) => "invalid literal",
            Self::ProtectedTermRedefinition(_) => "protected term redefinition",
            Self::InvalidContextNullification(_) => "invalid context nullification",
            Self::InvalidLocalContext(_) => "invalid local context",
            Self::InvalidBaseIri(_) => "invalid base IRI",
            Self::InvalidVocabMapping(_) => "invalid vocab mapping",
            Self::InvalidDefaultLanguage(_) => "invalid default language",
            Self::InvalidBaseDirection(_) => "invalid base direction",
            Self::InvalidVersionValue(_) => "invalid @version value",
            Self::ProcessingModeConflict(_) => "processing mode conflict",
            Self::InvalidPropagateValue(_) => "invalid @propagate value",
            Self::InvalidImportValue(_) => "invalid @import value",
            Self::InvalidTermDefinition(_) => "invalid term definition",
            Self::KeywordRedefinition(_) => "keyword redefinition",
            Self::InvalidIriMapping(_) => "invalid IRI mapping",
            Self::CyclicIriMapping(_) => "cyclic IRI mapping",
            Self::InvalidReverseProperty(_) => "invalid reverse property",
            Self::InvalidTypeMapping(_) => "invalid type mapping",
            Self::InvalidContainerMapping(_) => "invalid container mapping",
            Self::InvalidLanguageMapping(_) => "invalid language mapping",
            Self::InvalidNestValue(_) => "invalid @nest value",
            Self::InvalidPrefixValue(_) => "invalid @prefix value",
            Self::InvalidScopedContext(_) => "invalid scoped context",
            Self::InvalidKeywordAlias(_) => "invalid keyword alias",
            Self::LoadingRemoteContextFailed(_) => "loading remote context failed",
            Self::InvalidRemoteContext(_) => "invalid remote context",
            Self::InvalidContextEntry(_) => "invalid context entry",
            Self::InvalidProtectedValue(_) => "invalid @protected value",
            Self::ContextOverflow(_) => "context overflow",
        }
    }
}
