//! Store-backed elements for elementkv.
//!
//! An [`Element`] is an object whose authoritative state lives in a
//! [`KeyValueStore`](elementkv_store::KeyValueStore) under a stable
//! identifier, with an in-memory copy kept alongside:
//! - reads go through [`Element::refresh_and_get`], which replaces the copy
//!   with whatever the store holds
//! - writes go through [`Element::merge_and_save`], which merges a patch into
//!   the copy and stores the whole result
//!
//! Type shape is described separately from instance state:
//! - [`ElementSchema`] / [`Described`]: a static field and method list per type
//! - [`ClassMetadata`]: the owned, JSON-encodable form of a schema
//! - [`TypeRegistry`]: resolves a stored type tag back to a locally known type
//! - [`scaffold`]: emits skeleton Rust source from a type definition
//!
//! [`VotingCandidate`] is a small element built on top of the contract.

mod candidate;
mod element;
mod error;
mod registry;
pub mod scaffold;
mod schema;

pub use candidate::VotingCandidate;
pub use element::Element;
pub use error::{ElementError, ElementResult};
pub use registry::{ElementRecord, Relinked, TypeRegistry, decode_record};
pub use schema::{
    ClassMetadata, Described, ElementSchema, decode_description, describe, encode_description,
};

pub use elementkv_store::SharedStore;
pub use elementkv_types::{ElementId, State};
