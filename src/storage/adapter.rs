//! JSON storage adapter.
//!
//! `read` never fails: an absent, unreadable or malformed value yields the
//! caller's default. `write` never fails either: a store error is logged and
//! the caller keeps its in-memory value as the truth for the session.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::store::{KeyValueStore, MemoryStore};
use crate::error::StorageError;

/// Typed JSON access to a shared [`KeyValueStore`].
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// Wrap a store.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Wrap a store the caller also keeps a handle to.
    pub fn from_shared(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read and decode `key`, surfacing failures.
    pub fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.to_string(),
                source,
            })
    }

    /// Read `key`, falling back to `default` on absence or any failure.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_read(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(error) => {
                tracing::warn!(key, %error, "failed to read stored value, using default");
                default
            }
        }
    }

    /// Encode and store `value`, surfacing failures.
    pub fn try_write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }

    /// Store `value`, logging and swallowing failures.
    ///
    /// Returns whether the value was persisted.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match self.try_write(key, value) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(key, %error, "failed to persist value, keeping in-memory copy");
                false
            }
        }
    }

    /// Remove `key`, logging failures.
    pub fn remove(&self, key: &str) {
        if let Err(error) = self.store.remove(key) {
            tracing::warn!(key, %error, "failed to remove stored value");
        }
    }
}
