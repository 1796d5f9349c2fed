use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::types::StorageError;
use super::KeyValueStore;

/// In-memory key-value store.
///
/// Intended for tests and for runs that should leave nothing on disk. An
/// optional byte quota makes oversized writes fail the way a browser's local
/// storage does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any single value larger than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: Mutex::default(),
            quota: Some(bytes),
        }
    }

    /// Pre-populate `key`, bypassing the quota.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
    }

    /// Current value under `key`.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        StorageError::check_quota(key, value, self.quota)?;
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
