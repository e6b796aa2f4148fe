use elementkv_model::{
    ClassMetadata, Described, Element, ElementError, ElementSchema, State, VotingCandidate,
    decode_description, describe, encode_description,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;

struct Car;

impl Described for Car {
    const SCHEMA: ElementSchema = ElementSchema::new("Car", &["color", "model"], &["repaint"]);
}

// ── describe ────────────────────────────────────────────────────

#[test]
fn describe_lists_declared_names() {
    let meta = describe::<Car>();
    assert_eq!(meta.class_name, "Car");
    assert_eq!(meta.properties, vec!["color", "model"]);
    assert_eq!(meta.methods, vec!["repaint"]);
}

#[test]
fn base_element_schema_excludes_constructor() {
    let meta = describe::<Element>();
    assert_eq!(meta.class_name, "Element");
    assert_eq!(meta.properties, vec!["identifier", "state"]);
    assert!(meta.has_method("merge_and_save"));
    assert!(meta.has_method("refresh_and_get"));
    assert!(!meta.has_method("new"));
}

#[test]
fn schema_has_method() {
    assert!(Car::SCHEMA.has_method("repaint"));
    assert!(!Car::SCHEMA.has_method("drive"));
}

// ── Encoding ────────────────────────────────────────────────────

#[test]
fn encoded_description_uses_camel_case_keys() {
    let text = encode_description::<Car>().unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        json!({"className": "Car", "properties": ["color", "model"], "methods": ["repaint"]})
    );
}

#[test]
fn decode_reverses_encode() {
    let text = encode_description::<VotingCandidate>().unwrap();
    assert_eq!(decode_description(&text).unwrap(), describe::<VotingCandidate>());
}

#[test]
fn decode_rejects_malformed_json() {
    let err = decode_description("{\"className\": ").unwrap_err();
    assert!(matches!(err, ElementError::MetadataDecode(_)));
}

#[test]
fn decode_rejects_missing_fields() {
    let err = decode_description(r#"{"className": "Car"}"#).unwrap_err();
    assert!(matches!(err, ElementError::MetadataDecode(_)));
}

#[test]
fn decode_rejects_empty_class_name() {
    let err = decode_description(r#"{"className": "", "properties": [], "methods": []}"#)
        .unwrap_err();
    assert!(matches!(err, ElementError::MetadataDecode(_)));
}

#[test]
fn metadata_from_schema() {
    let meta: ClassMetadata = Car::SCHEMA.into();
    assert_eq!(meta, describe::<Car>());
}

// ── Base-only instance description ──────────────────────────────

#[test]
fn instance_description_is_always_the_base_type() {
    let store = Arc::new(elementkv_store::MemoryStore::new());
    let candidate = VotingCandidate::new(store, "alice").unwrap();

    let text = candidate.element().encode_description().unwrap();
    let meta = decode_description(&text).unwrap();
    assert_eq!(meta, describe::<Element>());
    assert_ne!(meta, describe::<VotingCandidate>());

    let plain = Element::new(
        Arc::new(elementkv_store::MemoryStore::new()),
        "x",
        State::new(),
    )
    .unwrap();
    assert_eq!(plain.encode_description().unwrap(), text);
}
