//! Core type definitions for elementkv.
//!
//! This crate defines the small set of types shared by the store and the
//! element model:
//! - [`ElementId`]: the validated key an element is stored under
//! - [`State`]: the JSON mapping that makes up an element's state
//! - [`merge_shallow`]: the top-level merge used by the write path

mod ids;
mod state;

pub use ids::ElementId;
pub use state::{State, merge_shallow};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}
