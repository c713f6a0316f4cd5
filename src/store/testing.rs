//! Store doubles for failure-path and interleaving tests.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde_json::Value;

use super::{MemoryStore, SettingsStore, StoreError, StoreFuture};

/// Reads pass through to an inner [`MemoryStore`]; every write fails.
#[derive(Debug, Clone, Default)]
pub(crate) struct FailingStore {
    pub(crate) inner: MemoryStore,
}

impl SettingsStore for FailingStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<Option<Value>, StoreError>> {
        self.inner.get(key)
    }

    fn set<'a>(&'a self, _key: &'a str, _value: Value) -> StoreFuture<'a, Result<(), StoreError>> {
        Box::pin(async { Err(StoreError::Backend("disk full".to_string())) })
    }

    fn delete<'a>(&'a self, _key: &'a str) -> StoreFuture<'a, Result<(), StoreError>> {
        Box::pin(async { Err(StoreError::Backend("disk full".to_string())) })
    }
}

/// Writes suspend once before reaching the inner [`MemoryStore`], so two
/// pending writes can interleave under `futures::join!`.
#[derive(Debug, Clone, Default)]
pub(crate) struct YieldingStore {
    pub(crate) inner: MemoryStore,
}

impl SettingsStore for YieldingStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<Option<Value>, StoreError>> {
        self.inner.get(key)
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> StoreFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            YieldOnce::default().await;
            self.inner.set(key, value).await
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            YieldOnce::default().await;
            self.inner.delete(key).await
        })
    }
}

#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
