//! HearthstoneJSON HTTP client

use crate::provider::{CatalogError, CatalogProvider};
use async_trait::async_trait;
use deck_core::CardRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Configuration for the HearthstoneJSON client
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL for the API (default: https://api.hearthstonejson.com/v1)
    pub base_url: String,
    /// Root of the on-disk file cache (default: .cache/hearthstonejson)
    pub cache_dir: PathBuf,
    /// Use this build instead of asking the API for the latest one
    pub build: Option<String>,
    /// Timeout for latest-build lookups in seconds (default: 30)
    pub head_timeout_secs: u64,
    /// Timeout for card file downloads in seconds (default: 120)
    pub download_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.hearthstonejson.com/v1".to_string(),
            cache_dir: PathBuf::from(".cache/hearthstonejson"),
            build: None,
            head_timeout_secs: 30,
            download_timeout_secs: 120,
        }
    }
}

/// Card file published per locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogFile {
    /// Cards obtainable in deck building
    Collectible,
    /// Every card, including tokens and hero powers
    Full,
}

impl CatalogFile {
    pub fn for_request(collectible_only: bool) -> Self {
        if collectible_only {
            CatalogFile::Collectible
        } else {
            CatalogFile::Full
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            CatalogFile::Collectible => "cards.collectible.json",
            CatalogFile::Full => "cards.json",
        }
    }
}

/// Latest-build lookups already made by one client
#[derive(Debug, Default)]
pub struct BuildResolver {
    resolved: HashMap<(String, CatalogFile), String>,
}

impl BuildResolver {
    pub fn get(&self, locale: &str, file: CatalogFile) -> Option<&str> {
        self.resolved
            .get(&(locale.to_string(), file))
            .map(String::as_str)
    }

    pub fn record(&mut self, locale: &str, file: CatalogFile, build: String) {
        self.resolved.insert((locale.to_string(), file), build);
    }
}

/// Extract the build id from a resolved API URL (`.../v1/<build>/<locale>/<file>`)
pub fn build_from_url(url: &str) -> Option<&str> {
    let mut parts = url.trim_end_matches('/').split('/');
    parts.by_ref().find(|part| *part == "v1")?;
    parts.next().filter(|build| !build.is_empty())
}

/// HearthstoneJSON API client with a local file cache
pub struct HearthstoneJsonClient {
    config: CatalogConfig,
    client: reqwest::Client,
    builds: BuildResolver,
}

impl HearthstoneJsonClient {
    /// Create a new client
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("deckview/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            config,
            client,
            builds: BuildResolver::default(),
        })
    }

    /// Ask the API which build `latest` currently points to
    pub async fn resolve_latest_build(
        &mut self,
        locale: &str,
        file: CatalogFile,
    ) -> Result<String, CatalogError> {
        if let Some(build) = self.builds.get(locale, file) {
            return Ok(build.to_string());
        }

        let url = format!(
            "{}/latest/{}/{}",
            self.config.base_url,
            locale,
            file.filename()
        );
        debug!("Resolving latest build via {}", url);

        let response = self
            .client
            .head(&url)
            .timeout(Duration::from_secs(self.config.head_timeout_secs))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status(),
                url,
            });
        }

        let resolved = response.url().as_str();
        let build = build_from_url(resolved)
            .ok_or_else(|| CatalogError::UnknownBuild(resolved.to_string()))?
            .to_string();

        info!(locale, build = %build, "Resolved latest catalog build");
        self.builds.record(locale, file, build.clone());
        Ok(build)
    }

    /// Path of a card file inside the cache
    pub fn cache_path(&self, build: &str, locale: &str, file: CatalogFile) -> PathBuf {
        self.config
            .cache_dir
            .join(build)
            .join(locale)
            .join(file.filename())
    }

    /// Make sure the card file for the current build is on disk and return its path
    pub async fn ensure_cached_file(
        &mut self,
        locale: &str,
        file: CatalogFile,
    ) -> Result<PathBuf, CatalogError> {
        let build = match self.config.build.clone() {
            Some(build) => build,
            None => self.resolve_latest_build(locale, file).await?,
        };

        let path = self.cache_path(&build, locale, file);
        if tokio::fs::try_exists(&path).await.map_err(|e| io_error(&path, e))? {
            debug!("Using cached {}", path.display());
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        let url = format!(
            "{}/{}/{}/{}",
            self.config.base_url,
            build,
            locale,
            file.filename()
        );
        info!("Downloading {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(self.config.download_timeout_secs))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| io_error(&path, e))?;
        info!(bytes = bytes.len(), "Cached {}", path.display());

        Ok(path)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CatalogError {
    CatalogError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl CatalogProvider for HearthstoneJsonClient {
    async fn fetch_cards(
        &mut self,
        locale: &str,
        collectible_only: bool,
    ) -> Result<Vec<CardRecord>, CatalogError> {
        let path = self
            .ensure_cached_file(locale, CatalogFile::for_request(collectible_only))
            .await?;
        let raw = tokio::fs::read(&path).await.map_err(|e| io_error(&path, e))?;
        let entries: Vec<serde_json::Value> = serde_json::from_slice(&raw)
            .map_err(|source| CatalogError::Parse { path: path.clone(), source })?;
        Ok(parse_card_records(entries))
    }
}

/// Convert raw catalog entries, skipping any that are not card objects
pub fn parse_card_records(entries: Vec<serde_json::Value>) -> Vec<CardRecord> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| match CardRecord::deserialize(entry) {
            Ok(card) => Some(card),
            Err(e) => {
                warn!(position, "Skipping malformed card record: {}", e);
                None
            }
        })
        .collect()
}
