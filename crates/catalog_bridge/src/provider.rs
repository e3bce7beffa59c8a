//! Catalog provider abstraction and loading policy

use async_trait::async_trait;
use deck_core::{CardRecord, CatalogIndex};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Errors raised while fetching the card catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HearthstoneJSON returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Unable to determine build from URL: {0}")]
    UnknownBuild(String),

    #[error("Cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse card data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of card records for one locale
#[async_trait]
pub trait CatalogProvider {
    /// Fetch either the collectible subset or the full card set
    async fn fetch_cards(
        &mut self,
        locale: &str,
        collectible_only: bool,
    ) -> Result<Vec<CardRecord>, CatalogError>;
}

/// Load and index the catalog for a run
///
/// The primary fetch is the collectible set unless `all_cards` is set. When
/// it is the collectible set, the full set is fetched too and merged into the
/// string-id table only, so derived tokens can be found without the
/// numeric table picking up non-collectible duplicates.
pub async fn load_catalog<P>(
    provider: &mut P,
    locale: &str,
    all_cards: bool,
) -> Result<CatalogIndex, CatalogError>
where
    P: CatalogProvider + ?Sized,
{
    let cards = provider.fetch_cards(locale, !all_cards).await?;
    info!(locale, count = cards.len(), all_cards, "Fetched primary card set");
    let mut index = CatalogIndex::build(cards);

    if !all_cards {
        let full = provider.fetch_cards(locale, false).await?;
        info!(locale, count = full.len(), "Fetched full card set");
        let added = index.merge_ids_from(&CatalogIndex::build(full));
        info!(added, "Merged string ids from full card set");
    }

    Ok(index)
}
