//! User preferences store.
//!
//! Manages user settings with persistence.

use pokedex_fetch::RetryStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
///
/// Missing fields take their defaults when loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog service base URL.
    pub base_url: String,

    /// Entries per page.
    pub page_size: usize,

    /// Per-attempt request timeout, in milliseconds.
    pub request_timeout_ms: u64,

    /// Attempts per request, including the first.
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds. Doubles per retry.
    pub retry_base_delay_ms: u64,

    /// Summaries scanned by a search without a type filter.
    pub search_batch_limit: usize,

    /// Memo lifetime, in seconds.
    pub cache_ttl_secs: u64,

    /// Keys per memo. Zero disables memoization.
    pub cache_capacity: usize,

    /// Keystroke inactivity before a search term settles, in milliseconds.
    pub debounce_ms: u64,

    /// Log level.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://pokeapi.co/api/v2".to_string(),
            page_size: 20,
            request_timeout_ms: 5_000,
            max_attempts: 3,
            retry_base_delay_ms: 1_000,
            search_batch_limit: 2_000,
            cache_ttl_secs: 300,
            cache_capacity: 1_024,
            debounce_ms: 500,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Checks that these settings can drive a session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.page_size == 0 {
            return Err(StoreError::Config("page_size must be at least 1".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(StoreError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(StoreError::Config(
                "request_timeout_ms must be at least 1".to_string(),
            ));
        }
        match Url::parse(&self.base_url) {
            Ok(url) if !url.cannot_be_a_base() => Ok(()),
            Ok(_) => Err(StoreError::Config(format!(
                "base_url is not a base URL: {}",
                self.base_url
            ))),
            Err(e) => Err(StoreError::Config(format!(
                "base_url is invalid ({e}): {}",
                self.base_url
            ))),
        }
    }

    /// Per-attempt request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Retry policy for outbound requests.
    pub fn retry_strategy(&self) -> RetryStrategy {
        RetryStrategy::new(self.max_attempts)
            .with_base_delay(Duration::from_millis(self.retry_base_delay_ms))
    }

    /// Memo lifetime.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Keystroke debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
#[derive(Debug)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store holding defaults, backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if the settings file exists but cannot be read.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing file yields defaults. A file that does not parse yields
    /// defaults and a warning.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = match load_json::<Settings>(&path).await {
            Ok(settings) => {
                info!(path = %path.display(), "Loaded settings");
                settings
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Settings file not found, using defaults");
                Settings::default()
            }
            Err(StoreError::Serialization(e)) => {
                warn!(path = %path.display(), error = %e, "Failed to parse settings, using defaults");
                Settings::default()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in memory. Call [`save`](Self::save) to persist.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
        debug!("Settings changed");
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.debounce(), Duration::from_millis(500));
        assert_eq!(settings.log_level, LogLevel::Warn);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_retry_strategy_from_settings() {
        let settings = Settings {
            max_attempts: 4,
            retry_base_delay_ms: 250,
            ..Settings::default()
        };
        let strategy = settings.retry_strategy();
        assert_eq!(strategy.attempts(), 4);
        assert_eq!(strategy.delay_for_attempt(1), Duration::from_millis(250));
        assert_eq!(strategy.delay_for_attempt(2), Duration::from_millis(500));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_page = Settings {
            page_size: 0,
            ..Settings::default()
        };
        assert!(matches!(zero_page.validate(), Err(StoreError::Config(_))));

        let zero_attempts = Settings {
            max_attempts: 0,
            ..Settings::default()
        };
        assert!(zero_attempts.validate().is_err());

        let bad_url = Settings {
            base_url: "pokeapi".to_string(),
            ..Settings::default()
        };
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "page_size": 50 }"#).unwrap();
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.base_url, "https://pokeapi.co/api/v2");
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        let parsed: LogLevel = serde_json::from_str("\"trace\"").unwrap();
        assert_eq!(parsed, LogLevel::Trace);
    }

    #[tokio::test]
    async fn test_update_changes_settings_in_memory() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));

        store.update(|s| s.page_size = 5).await;

        assert_eq!(store.get().await.page_size, 5);
        assert!(!store.path().exists());
    }
}
