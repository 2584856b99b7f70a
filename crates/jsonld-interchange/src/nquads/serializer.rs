use super::escape::escape;
use crate::model::{DEFAULT_GRAPH, Dataset, Node, Quad, rdf, xsd};

/// Serialize a dataset to N-Quads: one line per quad, lines sorted
/// lexicographically so identical datasets always produce identical bytes.
pub fn to_nquads(dataset: &Dataset) -> String {
    let mut lines: Vec<String> = dataset
        .iter()
        .map(|(graph_name, quad)| {
            let graph = (graph_name != DEFAULT_GRAPH).then_some(graph_name);
            to_nquad(quad, graph, None)
        })
        .collect();
    lines.sort();
    lines.concat()
}

/// Serialize a single quad to one `\n`-terminated N-Quads line.
///
/// `graph_name` is `None` for the default graph. When `bnode` is given the quad
/// is written in normalization mode: the blank node labelled `bnode` becomes
/// `_:a`, every other blank node `_:z`, and a blank-node graph name `_:g`.
pub fn to_nquad(quad: &Quad, graph_name: Option<&str>, bnode: Option<&str>) -> String {
    let mut out = String::with_capacity(128);

    // Subject
    match &quad.subject {
        Node::Iri(iri) => push_iri(&mut out, iri),
        other => push_node_label(&mut out, other.value(), bnode),
    }

    // Predicate
    match &quad.predicate {
        Node::Iri(iri) => {
            out.push(' ');
            push_iri(&mut out, iri);
            out.push(' ');
        }
        other => {
            out.push(' ');
            out.push_str(&escape(other.value()));
            out.push(' ');
        }
    }

    // Object
    match &quad.object {
        Node::Iri(iri) => push_iri(&mut out, iri),
        Node::BlankNode(label) => push_node_label(&mut out, label, bnode),
        Node::Literal(lit) => {
            out.push('"');
            out.push_str(&escape(lit.value()));
            out.push('"');
            if lit.datatype() == rdf::LANG_STRING {
                out.push('@');
                out.push_str(lit.language().unwrap_or_default());
            } else if lit.datatype() != xsd::STRING {
                out.push_str("^^");
                push_iri(&mut out, lit.datatype());
            }
        }
    }

    // Graph (optional)
    if let Some(name) = graph_name {
        out.push(' ');
        if !name.starts_with("_:") {
            push_iri(&mut out, name);
        } else if bnode.is_some() {
            out.push_str("_:g");
        } else {
            out.push_str(name);
        }
    }

    out.push_str(" .\n");
    out
}

fn push_iri(out: &mut String, iri: &str) {
    out.push('<');
    out.push_str(&escape(iri));
    out.push('>');
}

fn push_node_label(out: &mut String, label: &str, bnode: Option<&str>) {
    match bnode {
        Some(reference) if label == reference => out.push_str("_:a"),
        Some(_) => out.push_str("_:z"),
        None => out.push_str(label),
    }
}
