//! deckview CLI
//!
//! Command-line interface for inspecting Hearthstone deck codes: downloads
//! the HearthstoneJSON card catalog, resolves the deck against it, prints
//! the deck listing and saves a JSON report.
//!
//! Copyright (c) 2025 Michael A Wright

use anyhow::{Context, Result};
use catalog_bridge::{load_catalog, CatalogConfig, HearthstoneJsonClient};
use clap::Parser;
use deck_core::{decode, render_text, write_report_json, DeckResolver};
use std::path::PathBuf;

#[allow(dead_code)]
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("BUILT_GIT_COMMIT_HASH"),
    "\nbuilt: ",
    env!("BUILT_TIME_UTC"),
);

#[derive(Parser, Debug)]
#[command(name = "deckview")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Download HearthstoneJSON card data and show the details for a deck code.",
    long_about = None
)]
struct Cli {
    /// Hearthstone deck code string
    deck_code: String,

    /// Locale to download (e.g. enUS, zhTW)
    #[arg(long, default_value = "zhCN")]
    locale: String,

    /// Use cards.json for the main lookup (collectible by default)
    #[arg(long)]
    all_cards: bool,

    /// Optional deck name used for the output JSON filename
    #[arg(long)]
    deck_name: Option<String>,

    /// Pin a catalog build instead of resolving the latest one
    #[arg(long)]
    build: Option<String>,

    /// Directory for downloaded card files
    #[arg(long, default_value = ".cache/hearthstonejson")]
    cache_dir: PathBuf,

    /// Directory the JSON report is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the report without saving it
    #[arg(long)]
    no_save: bool,
}

impl Cli {
    fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            cache_dir: self.cache_dir.clone(),
            build: self.build.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    tracing::debug!(
        "{} {} ({})",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::RUSTC_VERSION
    );

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut client = HearthstoneJsonClient::new(cli.catalog_config())
        .context("Failed to create HearthstoneJSON client")?;
    let index = load_catalog(&mut client, &cli.locale, cli.all_cards)
        .await
        .context("Failed to load card catalog")?;

    let deck_code = cli.deck_code.trim();
    let deck = decode(deck_code).context("Failed to decode deck code")?;
    tracing::info!(
        format = ?deck.format,
        heroes = deck.heroes.len(),
        cards = deck.cards.len(),
        sideboards = deck.sideboards.len(),
        "Decoded deck code"
    );

    let report = DeckResolver::new(&index).resolve(&deck, deck_code);
    print!("{}", render_text(&report));

    if !cli.no_save {
        let path = write_report_json(&report, cli.deck_name.as_deref(), &cli.output_dir)?;
        println!("\nSaved deck details to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["deckview", "AAECAR8GxwPJBLsF"]).unwrap();
        assert_eq!(cli.deck_code, "AAECAR8GxwPJBLsF");
        assert_eq!(cli.locale, "zhCN");
        assert!(!cli.all_cards);
        assert!(cli.deck_name.is_none());
        assert!(!cli.no_save);
        assert_eq!(cli.output_dir, PathBuf::from("."));

        let config = cli.catalog_config();
        assert_eq!(config.cache_dir, PathBuf::from(".cache/hearthstonejson"));
        assert!(config.build.is_none());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "deckview",
            "CODE",
            "--locale",
            "enUS",
            "--all-cards",
            "--deck-name",
            "Big Spell Mage",
            "--build",
            "187564",
            "--no-save",
        ])
        .unwrap();

        assert_eq!(cli.locale, "enUS");
        assert!(cli.all_cards);
        assert_eq!(cli.deck_name.as_deref(), Some("Big Spell Mage"));
        assert!(cli.no_save);
        assert_eq!(cli.catalog_config().build.as_deref(), Some("187564"));
    }

    #[test]
    fn test_cli_requires_deck_code() {
        assert!(Cli::try_parse_from(["deckview"]).is_err());
    }
}
