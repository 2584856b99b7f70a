use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::escape::unescape;
use crate::error::{JsonLdError, Result};
use crate::jsonld::keywords::LANGUAGE_TAG_PATTERN;
use crate::model::{DEFAULT_GRAPH, Dataset, Literal, Node, Quad, rdf, xsd};

const WS: &str = r"[ \t]+";
const WSO: &str = r"[ \t]*";

fn iri(group: &str) -> String {
    format!(r"(?:<(?P<{group}>[^>]*)>)")
}

fn bnode(group: &str) -> String {
    format!(r"(?P<{group}>_:(?:[A-Za-z0-9_](?:[A-Za-z0-9_.\-]*[A-Za-z0-9_\-])?))")
}

/// One N-Quads statement: `subject predicate object graph? .`
static QUAD: LazyLock<Regex> = LazyLock::new(|| {
    let plain = r#""(?P<literal>[^"\\]*(?:\\.[^"\\]*)*)""#;
    let datatype = format!(r"(?:\^\^{})", iri("datatype"));
    let language = format!(r"(?:@(?P<language>{LANGUAGE_TAG_PATTERN}))");
    let literal = format!("(?:{plain}(?:{datatype}|{language})?)");

    let subject = format!("(?:{}|{}){WS}", iri("subject_iri"), bnode("subject_bnode"));
    let property = format!("{}{WS}", iri("predicate"));
    let object = format!(
        "(?:{}|{}|{literal}){WSO}",
        iri("object_iri"),
        bnode("object_bnode")
    );
    let graph = format!(
        r"(?:\.|(?:(?:{}|{}){WSO}\.))",
        iri("graph_iri"),
        bnode("graph_bnode")
    );

    Regex::new(&format!("^{WSO}{subject}{property}{object}{graph}{WSO}$"))
        .expect("N-Quads line grammar compiles")
});

static EOLN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\n|\r").expect("line terminator pattern compiles"));

/// Parse an N-Quads document into a Dataset.
///
/// Fails on the first line that does not match the grammar. Blank lines and
/// `#` comment lines are skipped. Blank node labels are kept as written.
pub fn parse_nquads(input: &str) -> Result<Dataset> {
    let mut dataset = Dataset::new();
    for (idx, line) in EOLN.split(input).enumerate() {
        let trimmed = line.trim_matches([' ', '\t']);
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (graph_name, quad) = parse_line(line, idx + 1)?;
        dataset.add_quad(graph_name, quad);
    }
    tracing::debug!(quads = dataset.len(), "parsed N-Quads document");
    Ok(dataset)
}

fn parse_line(line: &str, line_num: usize) -> Result<(String, Quad)> {
    let caps = QUAD
        .captures(line)
        .ok_or_else(|| JsonLdError::syntax(line_num, "invalid quad"))?;
    let text = |name: &str| -> Result<Option<String>> {
        caps.name(name)
            .map(|m| unescape(m.as_str()).map_err(|e| JsonLdError::syntax(line_num, e)))
            .transpose()
    };

    let subject = match text("subject_iri")? {
        Some(iri) => Node::Iri(iri),
        None => Node::BlankNode(group(&caps, "subject_bnode")),
    };

    let predicate = Node::Iri(text("predicate")?.unwrap_or_default());

    let object = if let Some(iri) = text("object_iri")? {
        Node::Iri(iri)
    } else if let Some(label) = caps.name("object_bnode") {
        Node::BlankNode(label.as_str().to_string())
    } else {
        let value = text("literal")?.unwrap_or_default();
        let language = caps.name("language").map(|m| m.as_str().to_string());
        let datatype = match text("datatype")? {
            Some(dt) => dt,
            None if language.is_some() => rdf::LANG_STRING.to_string(),
            None => xsd::STRING.to_string(),
        };
        Node::Literal(Literal::new(value, datatype, language)?)
    };

    let graph_name = match text("graph_iri")? {
        Some(iri) => iri,
        None => caps
            .name("graph_bnode")
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| DEFAULT_GRAPH.to_string()),
    };

    tracing::trace!(line = line_num, graph = %graph_name, "parsed quad");
    let quad = Quad::new(subject, predicate, object, graph_name.clone());
    Ok((graph_name, quad))
}

fn group(caps: &Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_quad(ds: &Dataset) -> &Quad {
        let quads: Vec<_> = ds.iter().map(|(_, q)| q).collect();
        assert_eq!(quads.len(), 1);
        quads[0]
    }

    #[test]
    fn parse_simple_triple() {
        let input = "<http://example.org/s> <http://example.org/p> <http://example.org/o> .\n";
        let ds = parse_nquads(input).unwrap();
        let q = only_quad(&ds);
        assert_eq!(q.subject, Node::iri("http://example.org/s"));
        assert_eq!(q.predicate, Node::iri("http://example.org/p"));
        assert_eq!(q.object, Node::iri("http://example.org/o"));
        assert_eq!(q.graph_name, DEFAULT_GRAPH);
        assert_eq!(ds.quads(DEFAULT_GRAPH).len(), 1);
    }

    #[test]
    fn parse_blank_nodes() {
        let input = "_:b0 <http://example.org/p> _:b1 .\n";
        let ds = parse_nquads(input).unwrap();
        let q = only_quad(&ds);
        assert_eq!(q.subject, Node::blank_node("_:b0"));
        assert_eq!(q.object, Node::blank_node("_:b1"));
    }

    #[test]
    fn parse_blank_node_without_space_before_dot() {
        let ds = parse_nquads("_:b0 <http://example.org/p> _:c14n1.\n").unwrap();
        assert_eq!(only_quad(&ds).object, Node::blank_node("_:c14n1"));
    }

    #[test]
    fn parse_typed_literal() {
        let input = "<http://example.org/s> <http://example.org/p> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n";
        let ds = parse_nquads(input).unwrap();
        match &only_quad(&ds).object {
            Node::Literal(lit) => {
                assert_eq!(lit.value(), "42");
                assert_eq!(lit.datatype(), xsd::INTEGER);
                assert!(lit.language().is_none());
            }
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn parse_lang_literal() {
        let input = "<http://example.org/s> <http://example.org/p> \"bonjour\"@fr-CA .\n";
        let ds = parse_nquads(input).unwrap();
        match &only_quad(&ds).object {
            Node::Literal(lit) => {
                assert_eq!(lit.value(), "bonjour");
                assert_eq!(lit.language(), Some("fr-CA"));
                assert_eq!(lit.datatype(), rdf::LANG_STRING);
            }
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn parse_plain_literal_defaults_to_xsd_string() {
        let input = "<http://example.org/s> <http://example.org/p> \"plain\" .";
        let ds = parse_nquads(input).unwrap();
        assert_eq!(only_quad(&ds).object, Node::Literal(Literal::string("plain")));
    }

    #[test]
    fn parse_named_graphs() {
        let input = "\
<http://example.org/s> <http://example.org/p> <http://example.org/o> <http://example.org/g> .
<http://example.org/s> <http://example.org/p> \"v\" _:g1 .
";
        let ds = parse_nquads(input).unwrap();
        assert_eq!(ds.quads("http://example.org/g").len(), 1);
        assert_eq!(ds.quads("_:g1").len(), 1);
        assert_eq!(ds.quads("_:g1")[0].graph_name, "_:g1");
        assert!(ds.quads(DEFAULT_GRAPH).is_empty());
    }

    #[test]
    fn parse_escaped_literal_and_iri() {
        let input = r#"<http://example.org/\u0073> <http://example.org/p> "line1\nline2\t\"quoted\" \u00E9" ."#;
        let ds = parse_nquads(input).unwrap();
        let q = only_quad(&ds);
        assert_eq!(q.subject, Node::iri("http://example.org/s"));
        assert_eq!(q.object.value(), "line1\nline2\t\"quoted\" é");
    }

    #[test]
    fn parse_line_terminators() {
        let input = "<http://ex/s1> <http://ex/p> <http://ex/o> .\r\n<http://ex/s2> <http://ex/p> <http://ex/o> .\r<http://ex/s3> <http://ex/p> <http://ex/o> .";
        let ds = parse_nquads(input).unwrap();
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn parse_skip_comments_and_blank_lines() {
        let input = "# comment\n\n   \t\n<http://example.org/s> <http://example.org/p> <http://example.org/o> .\n\n";
        let ds = parse_nquads(input).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn parse_error_reports_line_number() {
        let err = parse_nquads("not a quad line\n").unwrap_err();
        assert_eq!(
            err,
            JsonLdError::SyntaxError {
                line: 1,
                message: "invalid quad".to_string()
            }
        );

        let input = "<http://ex/s> <http://ex/p> <http://ex/o> .\n\n<http://ex/s> <http://ex/p> .\n";
        assert!(matches!(
            parse_nquads(input),
            Err(JsonLdError::SyntaxError { line: 3, .. })
        ));
    }

    #[test]
    fn parse_rejects_literal_subject_and_missing_dot() {
        assert!(parse_nquads("\"s\" <http://ex/p> <http://ex/o> .").is_err());
        assert!(parse_nquads("<http://ex/s> <http://ex/p> <http://ex/o>").is_err());
        assert!(parse_nquads("<http://ex/s> _:p <http://ex/o> .").is_err());
    }

    #[test]
    fn parse_rejects_bad_escape() {
        let err = parse_nquads("<http://ex/s> <http://ex/p> \"bad \\q\" .").unwrap_err();
        assert!(matches!(err, JsonLdError::SyntaxError { line: 1, .. }));
    }
}
