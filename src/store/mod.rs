//! Settings store contract and adapters.
//!
//! The store is an asynchronous key-value collaborator holding JSON values.
//! Everything that persists (shortcut overrides, history settings) goes
//! through [`SettingsStore`], so the core never touches the disk directly.
//!
//! # Adapters
//!
//! - `MemoryStore` - shared in-memory map, used by tests and ephemeral sessions
//! - `NoopStore` - always empty, swallows writes
//! - `JsonFileStore` - a single pretty-printed JSON object on disk

mod file;
mod memory;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::{MemoryStore, NoopStore};

/// Errors surfaced by a [`SettingsStore`] backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store backend failed: {0}")]
    Backend(String),
}

/// Object-safe boxed future returned by [`SettingsStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Asynchronous key-value store for JSON settings.
pub trait SettingsStore {
    /// Loads the value stored under `key`, or `None` if absent.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<Option<Value>, StoreError>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set<'a>(&'a self, key: &'a str, value: Value) -> StoreFuture<'a, Result<(), StoreError>>;

    /// Removes `key`. Removing an absent key succeeds.
    fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<(), StoreError>>;
}

/// Loads and deserializes a typed value through a [`SettingsStore`].
///
/// # Errors
///
/// Returns an error when the store fails or the stored JSON does not match `T`.
pub async fn get_with<S: SettingsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(value) = store.get(key).await? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_value(value)?))
}

/// Serializes and saves a typed value through a [`SettingsStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn set_with<S: SettingsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value)?;
    store.set(key, value).await
}
