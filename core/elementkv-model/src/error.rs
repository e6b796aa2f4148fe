//! Error types for the element model.

use elementkv_store::StoreError;
use thiserror::Error;

/// Result type for element operations.
pub type ElementResult<T> = Result<T, ElementError>;

/// Errors that can occur while constructing, loading or saving elements, or
/// while handling type metadata.
#[derive(Debug, Error)]
pub enum ElementError {
    /// The identifier cannot be used as a storage key.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The store failed to retrieve the element's value.
    #[error("failed to read {key}: {source}")]
    StorageRead {
        key: String,
        #[source]
        source: StoreError,
    },

    /// The store failed to persist the element's value. In-memory state is
    /// already updated when this is returned.
    #[error("failed to write {key}: {source}")]
    StorageWrite {
        key: String,
        #[source]
        source: StoreError,
    },

    /// The stored text is not a JSON object.
    #[error("stored value at {key} is not a JSON object: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// State could not be encoded as JSON.
    #[error("encoding error: {0}")]
    Encode(#[source] serde_json::Error),

    /// A class description or element record is malformed.
    #[error("malformed metadata: {0}")]
    MetadataDecode(String),

    /// A method named in stored metadata has no implementation on the type.
    #[error("{class_name} has no method {method:?}")]
    MethodNotFound { class_name: String, method: String },

    /// A type tag is not registered.
    #[error("unknown element type: {0}")]
    UnknownType(String),

    /// A state field has a value of the wrong shape.
    #[error("invalid field {field:?}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl From<elementkv_types::Error> for ElementError {
    fn from(err: elementkv_types::Error) -> Self {
        match err {
            elementkv_types::Error::InvalidIdentifier(msg) => Self::InvalidIdentifier(msg),
        }
    }
}
