//! IRI resolution, normalization and absoluteness tests.
//!
//! Works directly on the IRI text following RFC 3986 (reference resolution
//! §5.2, normalization §6.2). Non-ASCII characters are kept as they are, so
//! IRIs are never percent-encoded or punycoded on the way through.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{JsonLdError, Result};

/// RFC 3986 Appendix B.
static URI_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("URI reference pattern compiles")
});

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").expect("scheme pattern compiles"));

/// The five components of a URI reference, borrowed from the input.
#[derive(Debug, Default, PartialEq, Eq)]
struct Reference<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> Reference<'a> {
    fn parse(s: &'a str) -> Option<Self> {
        if has_forbidden_chars(s) || has_bad_percent_encoding(s) {
            return None;
        }
        let caps = URI_REFERENCE.captures(s)?;
        let scheme = caps.get(1).map(|m| m.as_str());
        if let Some(scheme) = scheme
            && !SCHEME.is_match(scheme)
        {
            return None;
        }
        Some(Self {
            scheme,
            authority: caps.get(2).map(|m| m.as_str()),
            path: caps.get(3).map_or("", |m| m.as_str()),
            query: caps.get(4).map(|m| m.as_str()),
            fragment: caps.get(5).map(|m| m.as_str()),
        })
    }
}

/// Component recomposition (§5.3).
fn recompose(
    scheme: Option<&str>,
    authority: Option<&str>,
    path: &str,
    query: Option<&str>,
    fragment: Option<&str>,
) -> String {
    let mut out = String::with_capacity(path.len() + 32);
    if let Some(scheme) = scheme {
        out.push_str(scheme);
        out.push(':');
    }
    if let Some(authority) = authority {
        out.push_str("//");
        out.push_str(authority);
    }
    out.push_str(path);
    if let Some(query) = query {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn has_forbidden_chars(s: &str) -> bool {
    s.chars().any(|c| {
        c.is_control()
            || matches!(c, ' ' | '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
    })
}

/// `%` not followed by two hex digits.
fn has_bad_percent_encoding(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().any(|(i, b)| {
        *b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

/// Returns true if `iri` parses as a URI with a non-empty scheme.
pub fn is_absolute(iri: &str) -> bool {
    Reference::parse(iri).is_some_and(|r| r.scheme.is_some())
}

/// Returns true if `s` parses as a URI reference, absolute or relative.
pub fn is_uri_reference(s: &str) -> bool {
    Reference::parse(s).is_some()
}

/// Resolve `relative` against `base` (RFC 3986 §5.2).
pub fn resolve(base: &str, relative: &str) -> Result<String> {
    let base_ref = Reference::parse(base)
        .filter(|r| r.scheme.is_some())
        .ok_or_else(|| JsonLdError::invalid_iri(format!("invalid base '{base}'")))?;
    let rel = Reference::parse(relative).ok_or_else(|| {
        JsonLdError::invalid_iri(format!("cannot resolve '{relative}': not a URI reference"))
    })?;

    let resolved = if rel.scheme.is_some() {
        recompose(
            rel.scheme,
            rel.authority,
            &remove_dot_segments(rel.path),
            rel.query,
            rel.fragment,
        )
    } else if rel.authority.is_some() {
        recompose(
            base_ref.scheme,
            rel.authority,
            &remove_dot_segments(rel.path),
            rel.query,
            rel.fragment,
        )
    } else if rel.path.is_empty() {
        recompose(
            base_ref.scheme,
            base_ref.authority,
            base_ref.path,
            rel.query.or(base_ref.query),
            rel.fragment,
        )
    } else {
        let path = if rel.path.starts_with('/') {
            remove_dot_segments(rel.path)
        } else {
            remove_dot_segments(&merge_paths(&base_ref, rel.path))
        };
        recompose(
            base_ref.scheme,
            base_ref.authority,
            &path,
            rel.query,
            rel.fragment,
        )
    };
    Ok(resolved)
}

/// §5.2.3
fn merge_paths(base: &Reference<'_>, relative_path: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        return format!("/{relative_path}");
    }
    match base.path.rfind('/') {
        Some(i) => format!("{}{relative_path}", &base.path[..=i]),
        None => relative_path.to_string(),
    }
}

/// §5.2.4
fn remove_dot_segments(path: &str) -> String {
    let mut input = path.to_string();
    let mut output = String::with_capacity(path.len());
    while !input.is_empty() {
        if input.starts_with("../") {
            input.replace_range(..3, "");
        } else if input.starts_with("./") {
            input.replace_range(..2, "");
        } else if input.starts_with("/./") {
            input.replace_range(..3, "/");
        } else if input == "/." {
            input.replace_range(.., "/");
        } else if input.starts_with("/../") {
            input.replace_range(..4, "/");
            pop_segment(&mut output);
        } else if input == "/.." {
            input.replace_range(.., "/");
            pop_segment(&mut output);
        } else if input == "." || input == ".." {
            input.clear();
        } else {
            let start = usize::from(input.starts_with('/'));
            let end = input[start..].find('/').map_or(input.len(), |i| i + start);
            output.push_str(&input[..end]);
            input.replace_range(..end, "");
        }
    }
    output
}

fn pop_segment(output: &mut String) {
    let cut = output.rfind('/').unwrap_or(0);
    output.truncate(cut);
}

fn default_port(scheme: &str) -> Option<&'static str> {
    match scheme {
        "http" | "ws" => Some("80"),
        "https" | "wss" => Some("443"),
        "ftp" => Some("21"),
        _ => None,
    }
}

/// Uppercase the hex digits of every percent-encoded triplet (§6.2.2.1).
fn uppercase_percent_encodings(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '%' {
            out.extend(chars.by_ref().take(2).map(|h| h.to_ascii_uppercase()));
        }
    }
    out
}

/// Normalize an absolute IRI: dot-segments removed, scheme and host lowercased,
/// default ports dropped.
pub fn normalize(iri: &str) -> Result<String> {
    let parsed = Reference::parse(iri)
        .ok_or_else(|| JsonLdError::invalid_iri(format!("cannot normalize '{iri}'")))?;
    let Some(scheme) = parsed.scheme else {
        return Err(JsonLdError::invalid_iri(format!(
            "cannot normalize '{iri}': not an absolute IRI"
        )));
    };
    let scheme = scheme.to_ascii_lowercase();

    let authority = match parsed.authority {
        Some(authority) => Some(normalize_authority(&scheme, authority, iri)?),
        None => None,
    };

    let mut path = remove_dot_segments(&uppercase_percent_encodings(parsed.path));
    if path.is_empty() && authority.is_some() && default_port(&scheme).is_some() {
        path.push('/');
    }

    Ok(recompose(
        Some(scheme.as_str()),
        authority.as_deref(),
        &path,
        parsed.query.map(uppercase_percent_encodings).as_deref(),
        parsed.fragment.map(uppercase_percent_encodings).as_deref(),
    ))
}

fn normalize_authority(scheme: &str, authority: &str, iri: &str) -> Result<String> {
    let (userinfo, host_port) = match authority.rfind('@') {
        Some(i) => (Some(&authority[..i]), &authority[i + 1..]),
        None => (None, authority),
    };
    // Only look for a port after an IPv6 literal's closing bracket.
    let port_search = host_port.rfind(']').unwrap_or(0);
    let (host, port) = match host_port[port_search..].rfind(':') {
        Some(i) => (
            &host_port[..port_search + i],
            Some(&host_port[port_search + i + 1..]),
        ),
        None => (host_port, None),
    };
    if let Some(port) = port
        && !port.chars().all(|c| c.is_ascii_digit())
    {
        return Err(JsonLdError::invalid_iri(format!(
            "cannot normalize '{iri}': invalid port '{port}'"
        )));
    }

    let mut out = String::with_capacity(authority.len());
    if let Some(userinfo) = userinfo {
        out.push_str(&uppercase_percent_encodings(userinfo));
        out.push('@');
    }
    out.push_str(&uppercase_percent_encodings(&host.to_ascii_lowercase()));
    if let Some(port) = port
        && !port.is_empty()
        && default_port(scheme) != Some(port)
    {
        out.push(':');
        out.push_str(port);
    }
    Ok(out)
}
