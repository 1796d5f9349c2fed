//! The key-value persistence facility.
//!
//! The core only ever needs `get(key)` and `set(key, value)`. Two backends
//! implement [`KeyValueStore`]:
//!
//! - [`MemoryStore`]: `HashMap` behind a mutex, for tests and ephemeral runs
//! - [`Database`]: a SQLite file via sqlx, the durable store used by the binary
mod local_storage;
mod memory;
mod schema;
mod types;

pub use memory::MemoryStore;
pub use schema::Database;
pub use types::StorageError;

/// Opaque string key-value storage.
///
/// Values are whole serialized blobs; writes overwrite unconditionally.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
