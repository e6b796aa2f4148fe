//! Type registry and re-linking of stored element records.
//!
//! A stored record names the methods its type had when it was written. On
//! decode those names are matched against a prototype schema that this
//! process already has compiled in. Behavior is never shipped as data: a name
//! either resolves to a local implementation or is reported missing.

use crate::candidate::VotingCandidate;
use crate::element::Element;
use crate::error::{ElementError, ElementResult};
use crate::schema::{ClassMetadata, Described, ElementSchema};
use elementkv_store::SharedStore;
use elementkv_types::{ElementId, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// An element as exchanged outside its store: identifier, state and,
/// optionally, the type tag and method names it was written with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub identifier: String,
    pub state: State,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
}

impl ElementRecord {
    /// Snapshots an element as a record of type `T`.
    pub fn of<T: Described>(element: &Element) -> Self {
        Self {
            identifier: element.identifier().to_string(),
            state: element.to_plain_value().clone(),
            class_name: Some(T::SCHEMA.class_name.to_string()),
            methods: Some(T::SCHEMA.methods.iter().map(|m| m.to_string()).collect()),
        }
    }
}

/// Parses a JSON element record.
pub fn decode_record(text: &str) -> ElementResult<ElementRecord> {
    serde_json::from_str(text).map_err(|e| ElementError::MetadataDecode(e.to_string()))
}

/// An element rebuilt from a record, with the outcome of method re-linking.
#[derive(Debug)]
pub struct Relinked {
    pub element: Element,
    pub class_name: String,
    /// Recorded method names that resolved on the prototype.
    pub linked: Vec<String>,
    /// Recorded method names the prototype no longer has.
    pub missing: Vec<String>,
}

impl Relinked {
    pub fn supports(&self, method: &str) -> bool {
        self.linked.iter().any(|m| m == method)
    }

    pub fn into_element(self) -> Element {
        self.element
    }

    /// Like [`Relinked::into_element`], but fails on the first missing method.
    pub fn into_strict(self) -> ElementResult<Element> {
        match self.missing.into_iter().next() {
            Some(method) => Err(ElementError::MethodNotFound {
                class_name: self.class_name,
                method,
            }),
            None => Ok(self.element),
        }
    }
}

fn relink(
    schema: &ElementSchema,
    store: SharedStore,
    record: ElementRecord,
) -> ElementResult<Relinked> {
    let id = ElementId::new(record.identifier)?;
    let element = Element::with_id(store, id, record.state);

    let (linked, missing): (Vec<String>, Vec<String>) = record
        .methods
        .unwrap_or_default()
        .into_iter()
        .partition(|m| schema.has_method(m));

    for method in &missing {
        let err = ElementError::MethodNotFound {
            class_name: schema.class_name.to_string(),
            method: method.clone(),
        };
        warn!(key = %element.identifier(), "skipping stale method: {err}");
    }

    Ok(Relinked {
        element,
        class_name: schema.class_name.to_string(),
        linked,
        missing,
    })
}

impl Element {
    /// Rebuilds an element from a record, re-linking its method names
    /// against the base `Element` prototype.
    ///
    /// Any type tag on the record is ignored; use
    /// [`TypeRegistry::decode_into_instance`] to resolve by tag.
    pub fn decode_into_instance(
        store: SharedStore,
        record: ElementRecord,
    ) -> ElementResult<Relinked> {
        relink(&<Element as Described>::SCHEMA, store, record)
    }
}

/// Element types known to this process, keyed by their class name.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<&'static str, ElementSchema>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the element types defined in this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<Element>();
        registry.register::<VotingCandidate>();
        registry
    }

    /// Registers `T` under its class name, returning the schema it replaced.
    pub fn register<T: Described>(&mut self) -> Option<ElementSchema> {
        self.types.insert(T::SCHEMA.class_name, T::SCHEMA)
    }

    pub fn get(&self, class_name: &str) -> Option<&ElementSchema> {
        self.types.get(class_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.types.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn describe(&self, class_name: &str) -> ElementResult<ClassMetadata> {
        self.get(class_name)
            .map(ElementSchema::to_metadata)
            .ok_or_else(|| ElementError::UnknownType(class_name.to_string()))
    }

    /// Rebuilds an element, re-linking against the schema registered for the
    /// record's class name (`Element` when the record has none).
    pub fn decode_into_instance(
        &self,
        store: SharedStore,
        record: ElementRecord,
    ) -> ElementResult<Relinked> {
        let class_name = record
            .class_name
            .as_deref()
            .unwrap_or(<Element as Described>::SCHEMA.class_name);
        let schema = *self
            .get(class_name)
            .ok_or_else(|| ElementError::UnknownType(class_name.to_string()))?;
        relink(&schema, store, record)
    }
}
