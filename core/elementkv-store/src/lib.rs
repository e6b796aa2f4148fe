//! Key-value storage adapters for elementkv.
//!
//! Elements persist their state through the [`KeyValueStore`] trait, which
//! exposes exactly three asynchronous operations: retrieve, store and delete.
//!
//! # Adapters
//!
//! - [`MemoryStore`] keeps values in a process-local map (tests, demos)
//! - [`FileStore`] keeps one file per key under a root directory
//! - [`TimeoutStore`] wraps any adapter with a per-call deadline
//!
//! Adapters are durable and atomic per key only. Nothing here orders writes
//! across keys, and no adapter retries; a failed call is terminal.

mod error;
mod file;
mod memory;
mod timeout;

pub use error::{StoreError, StoreResult};
pub use file::{FileStore, FileStoreConfig};
pub use memory::MemoryStore;
pub use timeout::TimeoutStore;

use async_trait::async_trait;
use std::sync::Arc;

/// Asynchronous key-value store used as the backing store of elements.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the name of the adapter, for logs.
    fn backend_name(&self) -> &'static str;

    /// Retrieves the value at `key`, or `None` when the key is absent.
    async fn retrieve(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` at `key`, replacing any previous value.
    async fn store(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

/// Shared handle to a store, injected into every element built on it.
pub type SharedStore = Arc<dyn KeyValueStore>;

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    async fn retrieve(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).retrieve(key).await
    }

    async fn store(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).store(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key).await
    }
}
