//! Card catalog bridge for HearthstoneJSON
//!
//! Provides the card catalog used to resolve deck codes. Card data is
//! downloaded from the HearthstoneJSON API, keyed by game build, and kept
//! in a local file cache so repeated runs against the same build stay
//! offline.
//!
//! Copyright (c) 2025 Michael A Wright

pub mod hearthstonejson;
pub mod provider;

pub use hearthstonejson::{
    parse_card_records, BuildResolver, CatalogConfig, CatalogFile, HearthstoneJsonClient,
};
pub use provider::{load_catalog, CatalogError, CatalogProvider};
