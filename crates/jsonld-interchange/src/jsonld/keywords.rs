//! JSON-LD keyword constants and keyword/language-tag recognition.

use std::sync::LazyLock;

use regex::Regex;

pub const BASE: &str = "@base";
pub const CONTAINER: &str = "@container";
pub const CONTEXT: &str = "@context";
pub const DIRECTION: &str = "@direction";
pub const GRAPH: &str = "@graph";
pub const ID: &str = "@id";
pub const IMPORT: &str = "@import";
pub const INCLUDED: &str = "@included";
pub const INDEX: &str = "@index";
pub const JSON: &str = "@json";
pub const LANGUAGE: &str = "@language";
pub const LIST: &str = "@list";
pub const NEST: &str = "@nest";
pub const NONE: &str = "@none";
pub const PREFIX: &str = "@prefix";
pub const PROPAGATE: &str = "@propagate";
pub const PROTECTED: &str = "@protected";
pub const REVERSE: &str = "@reverse";
pub const SET: &str = "@set";
pub const TYPE: &str = "@type";
pub const VALUE: &str = "@value";
pub const VERSION: &str = "@version";
pub const VOCAB: &str = "@vocab";
pub const PRESERVE: &str = "@preserve";
pub const DEFAULT: &str = "@default";
pub const EMBED: &str = "@embed";
pub const ALWAYS: &str = "@always";
pub const ONCE: &str = "@once";
pub const NEVER: &str = "@never";
pub const EXPLICIT: &str = "@explicit";
pub const NULL: &str = "@null";
pub const OMIT_DEFAULT: &str = "@omitDefault";
pub const REQUIRE_ALL: &str = "@requireAll";
pub const ANY: &str = "@any";

/// Every keyword of JSON-LD 1.1 syntax, the API and framing.
pub const KEYWORDS: [&str; 34] = [
    BASE,
    CONTAINER,
    CONTEXT,
    DIRECTION,
    GRAPH,
    ID,
    IMPORT,
    INCLUDED,
    INDEX,
    JSON,
    LANGUAGE,
    LIST,
    NEST,
    NONE,
    PREFIX,
    PROPAGATE,
    PROTECTED,
    REVERSE,
    SET,
    TYPE,
    VALUE,
    VERSION,
    VOCAB,
    PRESERVE,
    DEFAULT,
    EMBED,
    ALWAYS,
    ONCE,
    NEVER,
    EXPLICIT,
    NULL,
    OMIT_DEFAULT,
    REQUIRE_ALL,
    ANY,
];

static KEYWORD_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[A-Za-z]+$").expect("keyword form pattern compiles"));

/// Language tag without the leading `@`, as used in `@language` values.
pub(crate) const LANGUAGE_TAG_PATTERN: &str = r"[a-zA-Z]+(?:-[a-zA-Z0-9]+)*";

static LANGUAGE_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{LANGUAGE_TAG_PATTERN}$")).expect("language pattern compiles")
});

static LANGUAGE_TAG_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^@{LANGUAGE_TAG_PATTERN}$")).expect("language tag pattern compiles")
});

/// Is `s` one of the reserved JSON-LD keywords? Case-sensitive.
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Does `s` have the form of a keyword (`@` followed by letters only), whether
/// or not it is a known keyword?
pub fn is_keyword_form(s: &str) -> bool {
    KEYWORD_FORM.is_match(s)
}

/// Is `s` shaped like a BCP47 language tag (`en`, `en-US`, `zh-Hant-TW`)?
pub fn is_language_form(s: &str) -> bool {
    LANGUAGE_FORM.is_match(s)
}

/// Is `s` a language tag as it appears after a literal in N-Quads (`@en-US`)?
pub fn is_language_tag_form(s: &str) -> bool {
    LANGUAGE_TAG_FORM.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keywords() {
        assert!(is_keyword("@type"));
        assert!(is_keyword("@context"));
        assert!(is_keyword("@requireAll"));
        assert!(is_keyword("@any"));
        assert!(!is_keyword("type"));
        assert!(!is_keyword("@bogus"));
        assert!(!is_keyword("@TYPE"));
        assert!(!is_keyword(""));
    }

    #[test]
    fn keyword_form() {
        assert!(is_keyword_form("@bogus"));
        assert!(is_keyword_form("@type"));
        assert!(!is_keyword_form("@"));
        assert!(!is_keyword_form("@foo1"));
        assert!(!is_keyword_form("@foo.bar"));
        assert!(!is_keyword_form("type"));
    }

    #[test]
    fn language_forms() {
        assert!(is_language_form("en"));
        assert!(is_language_form("en-US"));
        assert!(is_language_form("zh-Hant-TW"));
        assert!(!is_language_form("en_US"));
        assert!(!is_language_form("-en"));
        assert!(is_language_tag_form("@en-GB"));
        assert!(!is_language_tag_form("en-GB"));
    }
}
