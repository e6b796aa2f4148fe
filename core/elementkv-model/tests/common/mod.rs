#![allow(dead_code)]

use async_trait::async_trait;
use elementkv_model::{SharedStore, State};
use elementkv_store::{KeyValueStore, MemoryStore, StoreError, StoreResult};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn state(value: Value) -> State {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn memory_store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

/// Memory store whose reads and writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    fn backend_name(&self) -> &'static str {
        "flaky"
    }

    async fn retrieve(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("read refused".to_string()));
        }
        self.inner.retrieve(key).await
    }

    async fn store(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write refused".to_string()));
        }
        self.inner.store(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.inner.delete(key).await
    }
}

/// Memory store that yields to the scheduler before every call, so
/// concurrently polled callers interleave at each store boundary.
#[derive(Default)]
pub struct YieldingStore {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for YieldingStore {
    fn backend_name(&self) -> &'static str {
        "yielding"
    }

    async fn retrieve(&self, key: &str) -> StoreResult<Option<String>> {
        tokio::task::yield_now().await;
        self.inner.retrieve(key).await
    }

    async fn store(&self, key: &str, value: &str) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.store(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.delete(key).await
    }
}
