//! Deadline wrapper for any store.

use crate::error::{StoreError, StoreResult};
use crate::KeyValueStore;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Wraps a store so every call fails with [`StoreError::Timeout`] once
/// `deadline` elapses.
///
/// A timed-out call is not retried or cancelled on the backend side; the
/// write may still land after the caller has observed the failure.
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    deadline: Duration,
}

impl<S: KeyValueStore> TimeoutStore<S> {
    /// Wraps `inner` with a per-call `deadline`.
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    /// Returns the per-call deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        key: &str,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} {op} of {key:?} exceeded {:?}",
                    self.inner.backend_name(),
                    self.deadline
                );
                Err(StoreError::Timeout(self.deadline))
            }
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for TimeoutStore<S> {
    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    async fn retrieve(&self, key: &str) -> StoreResult<Option<String>> {
        self.bounded("retrieve", key, self.inner.retrieve(key)).await
    }

    async fn store(&self, key: &str, value: &str) -> StoreResult<()> {
        self.bounded("store", key, self.inner.store(key, value)).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.bounded("delete", key, self.inner.delete(key)).await
    }
}
