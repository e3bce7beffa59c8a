//! Core library for deckview
//!
//! This crate provides the data structures and processing logic for
//! turning a Hearthstone deck code into a readable deck report:
//! decoding the deck string, indexing a card catalog, resolving the
//! deck against it and rendering the result.

pub mod deckstring;
pub mod index;
pub mod markup;
pub mod render;
pub mod resolve;
pub mod types;

pub use deckstring::{decode, encode, DecodeError};
pub use index::CatalogIndex;
pub use render::{render_text, safe_filename, write_report_json};
pub use resolve::{DeckResolver, DerivedCardCache};
pub use types::*;
