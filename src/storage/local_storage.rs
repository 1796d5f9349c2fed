use super::schema::Database;
use super::types::StorageError;
use super::KeyValueStore;

impl Database {
    // ========================================================================
    // Local Storage Operations
    // ========================================================================

    /// Get the value stored under `key`.
    ///
    /// # Returns
    ///
    /// The stored value, or `None` if the key has never been set.
    pub async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM local_storage WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::from_sqlx)?;

        Ok(row.map(|(value,)| value))
    }

    /// Store `value` under `key` (UPSERT).
    ///
    /// Overwrites any existing value and refreshes its timestamp. Values larger
    /// than the configured quota are rejected and the previous value is kept.
    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        StorageError::check_quota(key, value, self.quota)?;

        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        tracing::trace!(key = %key, bytes = value.len(), "Wrote local storage item");
        Ok(())
    }

    /// Delete `key`. Returns whether a row was removed.
    pub async fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every stored key. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize, StorageError> {
        let mut removed = 0;
        for key in self.keys().await? {
            if self.remove_item(&key).await? {
                removed += 1;
            }
        }
        tracing::debug!(removed, "Cleared local storage");
        Ok(removed)
    }

    /// All stored keys, ordered.
    pub async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT key FROM local_storage ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;
        Ok(rows.into_iter().map(|(k,)| k).collect())
    }
}

impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get_item(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_item(key, value).await
    }
}
