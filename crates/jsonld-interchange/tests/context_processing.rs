use std::sync::Arc;

use serde_json::json;

use jsonld_interchange::{
    ActiveContext, Direction, JsonLdError, JsonLdOptions, ProcessingMode, StaticContextResolver,
};

const CREDENTIALS_V2: &str = "https://www.w3.org/ns/credentials/v2";

fn options_with_credentials() -> JsonLdOptions {
    let resolver = StaticContextResolver::new().with_document(
        CREDENTIALS_V2,
        json!({
            "@context": {
                "@protected": true,
                "id": "@id",
                "type": "@type",
                "VerifiableCredential": {
                    "@id": "https://www.w3.org/2018/credentials#VerifiableCredential",
                    "@context": {
                        "issuer": {"@id": "https://www.w3.org/2018/credentials#issuer", "@type": "@id"}
                    }
                },
                "name": "https://schema.org/name",
                "description": "https://schema.org/description"
            }
        }),
    );
    JsonLdOptions::builder()
        .base("https://vc.example/credentials/1")
        .context_resolver(Arc::new(resolver))
        .build()
}

#[test]
fn credential_context_terms() {
    let root = ActiveContext::new(options_with_credentials());
    let ctx = root.process(&json!(CREDENTIALS_V2), true).unwrap();

    assert_eq!(ctx.expand_iri("id", false, true).as_deref(), Some("@id"));
    assert_eq!(ctx.expand_iri("type", false, true).as_deref(), Some("@type"));
    assert_eq!(
        ctx.expand_iri("name", false, true).as_deref(),
        Some("https://schema.org/name")
    );
    let vc = ctx.term_definition("VerifiableCredential").unwrap();
    assert!(vc.protected);
    assert!(vc.context.is_some());
    assert_eq!(ctx.base_iri(), Some("https://vc.example/credentials/1"));
    assert!(ctx.has_protected_terms());
}

#[test]
fn protected_term_redefinition_fails() {
    let root = ActiveContext::new(options_with_credentials());
    let ctx = root.process(&json!(CREDENTIALS_V2), true).unwrap();

    let err = ctx
        .process(&json!({"name": "https://example.org/title"}), true)
        .unwrap_err();
    assert!(matches!(err, JsonLdError::ProtectedTermRedefinition(ref term) if term == "name"));
    assert_eq!(err.code(), "protected term redefinition");

    // unprotected additions are fine and do not disturb the parent
    let extended = ctx
        .process(&json!({"title": "https://example.org/title"}), true)
        .unwrap();
    assert!(extended.term_definition("title").is_some());
    assert!(ctx.term_definition("title").is_none());
}

#[test]
fn protected_terms_survive_keyword_form_redefinition() {
    let root = ActiveContext::new(options_with_credentials());
    let ctx = root.process(&json!(CREDENTIALS_V2), true).unwrap();

    for redefinition in [
        json!({"name": {"@id": "@ignoreMe"}}),
        json!({"description": {"@reverse": "@ignoreMe"}}),
    ] {
        let err = ctx.process(&redefinition, true).unwrap_err();
        assert!(matches!(err, JsonLdError::ProtectedTermRedefinition(_)));
    }
    assert_eq!(
        ctx.term_definition("description").unwrap().iri.as_deref(),
        Some("https://schema.org/description")
    );
}

#[test]
fn unicode_and_non_hierarchical_bases() {
    let root = ActiveContext::new(JsonLdOptions::builder().base("http://例え.jp/docs/").build());
    assert_eq!(
        root.expand_iri("ü/../café", true, false).as_deref(),
        Some("http://例え.jp/docs/café")
    );

    let ctx = root
        .process(&json!({"@base": "urn:example:shelf/a"}), true)
        .unwrap();
    assert_eq!(ctx.base_iri(), Some("urn:example:shelf/a"));
    assert_eq!(
        ctx.expand_iri("b#frag", true, false).as_deref(),
        Some("urn:example:shelf/b#frag")
    );

    assert_eq!(
        jsonld_interchange::uri::resolve("http://example.org", "").unwrap(),
        "http://example.org"
    );
}

#[test]
fn scoped_context_applied_by_caller() {
    let root = ActiveContext::new(options_with_credentials());
    let ctx = root.process(&json!(CREDENTIALS_V2), true).unwrap();
    let vc = ctx.term_definition("VerifiableCredential").unwrap();

    // type-scoped contexts do not propagate
    let scoped = ctx
        .process_with(
            vc.context.as_ref().unwrap(),
            vc.base_url.as_deref(),
            false,
            false,
        )
        .unwrap();
    assert_eq!(
        scoped.term_definition("issuer").unwrap().type_mapping.as_deref(),
        Some("@id")
    );
    assert!(Arc::ptr_eq(&scoped.revert_to_previous(), &ctx));
    assert!(ctx.term_definition("issuer").is_none());
}

#[test]
fn inverse_context_selects_terms() {
    let root = ActiveContext::new(JsonLdOptions::default());
    let ctx = root
        .process(
            &json!({
                "@language": "en",
                "@direction": "ltr",
                "label": "http://ex/label",
                "labelNone": {"@id": "http://ex/label", "@language": null},
                "l": "http://ex/label"
            }),
            true,
        )
        .unwrap();
    assert_eq!(ctx.default_base_direction(), Some(Direction::Ltr));

    let inverse = ctx.inverse_context();
    assert_eq!(
        inverse.select_term("http://ex/label", &["@none"], "@language", &["en_ltr"]),
        Some("l")
    );
    assert_eq!(
        inverse.select_term("http://ex/label", &["@none"], "@language", &["@null"]),
        Some("labelNone")
    );
}

#[test]
fn legacy_processing_mode() {
    let root = ActiveContext::new(
        JsonLdOptions::builder()
            .processing_mode(ProcessingMode::JsonLd10)
            .build(),
    );
    assert!(root.is_processing_mode(ProcessingMode::JsonLd10));
    assert!(!root.is_processing_mode(ProcessingMode::JsonLd11));

    let ctx = root
        .process(&json!({"@vocab": "http://ex/", "knows": {"@type": "@id"}}), true)
        .unwrap();
    assert_eq!(
        ctx.term_definition("knows").unwrap().iri.as_deref(),
        Some("http://ex/knows")
    );

    assert!(matches!(
        root.process(&json!({"@direction": "ltr"}), true),
        Err(JsonLdError::InvalidContextEntry(_))
    ));
    assert!(matches!(
        root.process(&json!({"@import": "http://ex/ctx"}), true),
        Err(JsonLdError::InvalidContextEntry(_))
    ));
}

#[test]
fn relative_reference_without_base() {
    let root = ActiveContext::new(JsonLdOptions::default());
    let err = root.process(&json!("ctx.jsonld"), true).unwrap_err();
    assert!(matches!(err, JsonLdError::LoadingRemoteContextFailed(_)));

    let err = root.process(&json!({"@base": "relative/"}), true).unwrap_err();
    assert!(matches!(err, JsonLdError::InvalidBaseIri(_)));
}

#[test]
fn context_depth_is_configurable() {
    let resolver = StaticContextResolver::new()
        .with_document("http://ex/a", json!({"@context": ["http://ex/b"]}))
        .with_document("http://ex/b", json!({"@context": {"b": "http://ex/b#"}}));
    let options = JsonLdOptions::builder()
        .context_resolver(Arc::new(resolver))
        .max_context_depth(1)
        .build();
    let err = ActiveContext::new(options)
        .process(&json!("http://ex/a"), true)
        .unwrap_err();
    assert!(matches!(err, JsonLdError::ContextOverflow(_)));
}
