use crate::error::{ElementError, ElementResult};
use serde::{Deserialize, Serialize};

/// Static description of an element type: its declared fields and the
/// operations it offers.
///
/// Schemas are written by hand next to the type they describe; nothing is
/// discovered at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSchema {
    pub class_name: &'static str,
    pub properties: &'static [&'static str],
    pub methods: &'static [&'static str],
}

impl ElementSchema {
    pub const fn new(
        class_name: &'static str,
        properties: &'static [&'static str],
        methods: &'static [&'static str],
    ) -> Self {
        Self {
            class_name,
            properties,
            methods,
        }
    }

    /// Returns whether the type declares a method called `name`.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| *m == name)
    }

    /// Converts to the owned, serializable form.
    pub fn to_metadata(&self) -> ClassMetadata {
        ClassMetadata {
            class_name: self.class_name.to_string(),
            properties: self.properties.iter().map(|p| p.to_string()).collect(),
            methods: self.methods.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Implemented by every element type that carries a schema.
pub trait Described {
    const SCHEMA: ElementSchema;
}

/// Owned description of a type's shape, as exchanged in JSON:
/// `{"className": "...", "properties": [...], "methods": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMetadata {
    pub class_name: String,
    pub properties: Vec<String>,
    pub methods: Vec<String>,
}

impl ClassMetadata {
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }

    pub fn encode(&self) -> ElementResult<String> {
        serde_json::to_string(self).map_err(ElementError::Encode)
    }

    /// Parses a description, rejecting malformed JSON and an empty class name.
    pub fn decode(text: &str) -> ElementResult<Self> {
        let metadata: Self = serde_json::from_str(text)
            .map_err(|e| ElementError::MetadataDecode(e.to_string()))?;
        if metadata.class_name.is_empty() {
            return Err(ElementError::MetadataDecode(
                "className must not be empty".to_string(),
            ));
        }
        Ok(metadata)
    }
}

impl From<ElementSchema> for ClassMetadata {
    fn from(schema: ElementSchema) -> Self {
        schema.to_metadata()
    }
}

/// Returns the metadata of `T`.
pub fn describe<T: Described>() -> ClassMetadata {
    T::SCHEMA.to_metadata()
}

/// Returns the JSON description of `T`.
pub fn encode_description<T: Described>() -> ElementResult<String> {
    describe::<T>().encode()
}

/// Parses a JSON description produced by [`encode_description`].
pub fn decode_description(text: &str) -> ElementResult<ClassMetadata> {
    ClassMetadata::decode(text)
}
