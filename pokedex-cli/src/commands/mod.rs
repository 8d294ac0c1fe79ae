//! CLI command implementations.

pub mod browse;
pub mod config;
pub mod page;
pub mod search;
pub mod show;
pub mod types;

use anyhow::{Context, Result};
use pokedex_catalog::{CatalogCache, CatalogClient, PageAssembler};
use pokedex_fetch::HttpClient;
use pokedex_store::{Settings, SettingsStore, default_settings_path};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::Cli;
use crate::output::TextFormatter;

/// The settings file this invocation reads and writes.
pub fn settings_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(default_settings_path)
}

/// Loads settings without validating them.
pub async fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = settings_path(cli);
    let store = SettingsStore::load(path.clone())
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(store.get().await)
}

/// Builds a memoizing catalog client from validated settings.
pub fn build_client(settings: &Settings) -> Result<CatalogClient> {
    settings.validate()?;

    let http = HttpClient::with_timeout(settings.request_timeout())?
        .with_retry_strategy(settings.retry_strategy());
    let cache = Arc::new(CatalogCache::new(
        settings.cache_ttl(),
        settings.cache_capacity,
    ));

    debug!(base_url = %settings.base_url, "Building catalog client");
    Ok(CatalogClient::with_http(http, &settings.base_url)?.with_cache(cache))
}

/// Builds a page assembler over a fresh catalog client.
pub fn build_assembler(settings: &Settings) -> Result<PageAssembler> {
    let client = build_client(settings)?;
    Ok(PageAssembler::new(Arc::new(client)).with_search_batch_limit(settings.search_batch_limit))
}

/// Text formatter honoring `--no-color`.
pub fn text_formatter(cli: &Cli) -> TextFormatter {
    TextFormatter::new(!cli.no_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_build_client_uses_settings() {
        let settings = Settings {
            base_url: "http://localhost:9000/api/v2".to_string(),
            ..Settings::default()
        };
        let client = build_client(&settings).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:9000/api/v2");
        assert!(client.cache().is_some());
    }

    #[test]
    fn test_build_client_rejects_invalid_settings() {
        let settings = Settings {
            page_size: 0,
            ..Settings::default()
        };
        assert!(build_client(&settings).is_err());
    }

    #[tokio::test]
    async fn test_load_settings_from_config_flag() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        tokio::fs::write(&path, r#"{ "page_size": 7 }"#).await.unwrap();

        let cli = Cli::parse_from(["pokedex", "--config", path.to_str().unwrap(), "types"]);
        let settings = load_settings(&cli).await.unwrap();
        assert_eq!(settings.page_size, 7);
        assert_eq!(settings_path(&cli), path);
    }
}
