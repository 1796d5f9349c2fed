use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Storage-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum StorageError {
    /// Another instance of the application has locked the database
    #[error("Another instance of blogroll appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// The write would exceed the configured storage quota
    #[error("Storage quota exceeded writing '{key}': {len} bytes (limit {limit} bytes)")]
    QuotaExceeded { key: String, len: usize, limit: usize },

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl StorageError {
    /// Map a sqlx error, recognizing SQLite lock conditions.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return StorageError::InstanceLocked;
        }
        StorageError::Other(err)
    }

    /// Reject `value` if it is larger than `quota`.
    pub(crate) fn check_quota(
        key: &str,
        value: &str,
        quota: Option<usize>,
    ) -> Result<(), StorageError> {
        match quota {
            Some(limit) if value.len() > limit => Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
                len: value.len(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) all mean
/// another process holds the file.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("database is locked")
        || lower.contains("database table is locked")
        || lower.contains("sqlite_busy")
        || lower.contains("sqlite_locked")
        || lower.contains("unable to open database file")
}
