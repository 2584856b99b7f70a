use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;

use jsonld_interchange::model::*;
use jsonld_interchange::{ActiveContext, JsonLdOptions, parse_nquads, to_nquads};

fn sample_dataset(size: usize) -> Dataset {
    let mut ds = Dataset::new();
    for i in 0..size {
        let graph = if i % 4 == 0 {
            "http://example.org/graphs/1".to_string()
        } else {
            DEFAULT_GRAPH.to_string()
        };
        ds.add_quad(
            graph.clone(),
            Quad::new(
                Node::iri(format!("http://example.org/s{i}")),
                Node::iri("http://schema.org/name"),
                Literal::lang_string(format!("name \"{i}\"\twith escapes"), "en").unwrap().into(),
                graph.clone(),
            ),
        );
        ds.add_quad(
            graph.clone(),
            Quad::new(
                Node::blank_node(format!("_:b{i}")),
                Node::iri("http://schema.org/age"),
                Literal::typed(i.to_string(), xsd::INTEGER).unwrap().into(),
                graph,
            ),
        );
    }
    ds
}

fn bench_serialize(c: &mut Criterion) {
    let ds = sample_dataset(256);
    c.bench_function("to_nquads_512_quads", |b| b.iter(|| to_nquads(black_box(&ds))));
}

fn bench_parse(c: &mut Criterion) {
    let text = to_nquads(&sample_dataset(256));
    c.bench_function("parse_nquads_512_quads", |b| {
        b.iter(|| parse_nquads(black_box(&text)).unwrap())
    });
}

fn bench_context_processing(c: &mut Criterion) {
    let local = json!({
        "@vocab": "https://schema.org/",
        "@protected": true,
        "id": "@id",
        "type": "@type",
        "xsd": "http://www.w3.org/2001/XMLSchema#",
        "birthDate": {"@id": "https://schema.org/birthDate", "@type": "xsd:date"},
        "knows": {"@id": "https://schema.org/knows", "@type": "@id", "@container": "@set"},
        "name": {"@id": "https://schema.org/name", "@language": "en"}
    });
    let root = ActiveContext::new(JsonLdOptions::default());
    c.bench_function("process_context", |b| {
        b.iter(|| root.process(black_box(&local), true).unwrap())
    });

    let ctx = root.process(&local, true).unwrap();
    c.bench_function("select_term", |b| {
        b.iter(|| {
            ctx.inverse_context().select_term(
                black_box("https://schema.org/knows"),
                &["@set", "@none"],
                "@type",
                &["@id", "@none"],
            )
        })
    });
}

criterion_group!(benches, bench_serialize, bench_parse, bench_context_processing);
criterion_main!(benches);
