//! Configuration file parser for ~/.config/blogroll/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as a warning, since they are
//! usually typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::blog::{SortBy, DEFAULT_EXCERPT_LENGTH};
use crate::persistence::BLOGS_KEY;
use crate::store::DEFAULT_USER;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identity used for likes, comments and new posts.
    pub current_user: String,

    /// SQLite file holding local storage. `None` = `<config dir>/blogroll.db`.
    pub database_path: Option<String>,

    /// Storage key for the blog collection.
    pub storage_key: String,

    /// Sort mode used until the user picks one.
    pub default_sort: SortBy,

    /// Largest single value the store accepts, in bytes. 0 = unlimited.
    pub storage_quota_bytes: u64,

    /// Characters of content copied into a new post's excerpt.
    pub excerpt_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            current_user: DEFAULT_USER.to_string(),
            database_path: None,
            storage_key: BLOGS_KEY.to_string(),
            default_sort: SortBy::Newest,
            storage_quota_bytes: Self::DEFAULT_QUOTA,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Browser local storage typically allows about 5 MB per origin.
    const DEFAULT_QUOTA: u64 = 5 * 1024 * 1024;

    const KNOWN_KEYS: [&'static str; 6] = [
        "current_user",
        "database_path",
        "storage_key",
        "default_sort",
        "storage_quota_bytes",
        "excerpt_length",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            path = %path.display(),
            user = %config.current_user,
            sort = %config.default_sort,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Storage quota as an optional limit.
    pub fn quota(&self) -> Option<usize> {
        match self.storage_quota_bytes {
            0 => None,
            n => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
