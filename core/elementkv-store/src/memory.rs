//! In-memory store.

use crate::{KeyValueStore, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store backed by a `HashMap`.
///
/// Handles built from the same `MemoryStore` (through an `Arc`) observe each
/// other's writes, which makes it the usual backing store in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn retrieve(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn store(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
