//! Core types for deckview
//!
//! This module defines the card catalog records, the decoded deck and the
//! structured report produced by resolution.

use crate::markup::{strip_markup, title_case};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Numeric card identifier used inside deck codes (`dbfId`)
pub type DbfId = u32;

/// Category of a card as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardType {
    Minion,
    Spell,
    Weapon,
    Location,
    Hero,
    HeroPower,
    /// Any token the catalog uses that is not listed above (ENCHANTMENT, GAME_MODE_BUTTON, ...)
    Other(String),
}

impl CardType {
    /// Raw upper-case token as it appears in the catalog
    pub fn as_str(&self) -> &str {
        match self {
            CardType::Minion => "MINION",
            CardType::Spell => "SPELL",
            CardType::Weapon => "WEAPON",
            CardType::Location => "LOCATION",
            CardType::Hero => "HERO",
            CardType::HeroPower => "HERO_POWER",
            CardType::Other(token) => token,
        }
    }

    /// Whether cards of this type are reported as derived cards of a parent
    pub fn is_derivable(&self) -> bool {
        !matches!(self, CardType::Other(_))
    }

    /// Display label, e.g. `Minion` or `Hero_Power`
    pub fn label(&self) -> String {
        title_case(self.as_str())
    }
}

impl From<String> for CardType {
    fn from(token: String) -> Self {
        match token.as_str() {
            "MINION" => CardType::Minion,
            "SPELL" => CardType::Spell,
            "WEAPON" => CardType::Weapon,
            "LOCATION" => CardType::Location,
            "HERO" => CardType::Hero,
            "HERO_POWER" => CardType::HeroPower,
            _ => CardType::Other(token),
        }
    }
}

impl From<CardType> for String {
    fn from(card_type: CardType) -> Self {
        card_type.as_str().to_string()
    }
}

/// A single card from the HearthstoneJSON catalog
///
/// Every field is optional: catalog entries for tokens, enchantments and
/// game-mode objects routinely omit some of them. A field holding a value of
/// the wrong shape (a negative cost, a string where a number belongs) reads
/// as absent so the rest of the record stays usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    /// Numeric id used in deck codes
    #[serde(default, deserialize_with = "lenient")]
    pub dbf_id: Option<DbfId>,
    /// String id, stable across locales (e.g. `CORE_EX1_554`)
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cost: Option<u32>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub card_type: Option<CardType>,
    /// Card text with Hearthstone markup
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub card_class: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub set: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub attack: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub health: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub collectible: Option<bool>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

impl CardRecord {
    /// Cost used for ordering; absent cost counts as 0
    pub fn cost_or_zero(&self) -> u32 {
        self.cost.unwrap_or(0)
    }

    /// String id, or an empty string when the record has none
    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// Title-cased type label, `?` when the type is absent
    pub fn type_label(&self) -> String {
        self.card_type
            .as_ref()
            .map(CardType::label)
            .unwrap_or_else(|| "?".to_string())
    }

    /// Card text with markup removed, empty when the card has no text
    pub fn clean_text(&self) -> String {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => strip_markup(text),
            _ => String::new(),
        }
    }

    /// Whether this record belongs in a derived-card listing
    pub fn is_derivable(&self) -> bool {
        self.card_type
            .as_ref()
            .map(CardType::is_derivable)
            .unwrap_or(false)
    }
}

/// Game format stored in a deck code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatType {
    Unknown,
    Wild,
    Standard,
    Classic,
    Twist,
    /// A value this version does not know about, kept verbatim
    Other(u32),
}

impl FormatType {
    pub fn from_raw(value: u32) -> Self {
        match value {
            0 => FormatType::Unknown,
            1 => FormatType::Wild,
            2 => FormatType::Standard,
            3 => FormatType::Classic,
            4 => FormatType::Twist,
            other => FormatType::Other(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            FormatType::Unknown => 0,
            FormatType::Wild => 1,
            FormatType::Standard => 2,
            FormatType::Classic => 3,
            FormatType::Twist => 4,
            FormatType::Other(value) => value,
        }
    }

    /// Enumerator name as the game client spells it
    pub fn token(self) -> Option<&'static str> {
        match self {
            FormatType::Unknown => Some("FT_UNKNOWN"),
            FormatType::Wild => Some("FT_WILD"),
            FormatType::Standard => Some("FT_STANDARD"),
            FormatType::Classic => Some("FT_CLASSIC"),
            FormatType::Twist => Some("FT_TWIST"),
            FormatType::Other(_) => None,
        }
    }

    /// Human readable name: `Standard`, `Wild`, ... or the raw number
    pub fn display_name(self) -> String {
        match self.token() {
            Some(token) => title_case(token.strip_prefix("FT_").unwrap_or(token)),
            None => self.raw().to_string(),
        }
    }
}

/// A decoded deck code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub format: FormatType,
    /// Hero card ids, normally exactly one
    pub heroes: Vec<DbfId>,
    /// `(dbfId, copies)` pairs
    pub cards: Vec<(DbfId, u32)>,
    /// `(dbfId, copies, ownerDbfId)` triples
    pub sideboards: Vec<(DbfId, u32, DbfId)>,
}

/// Structured form of a card created by another card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedCardEntry {
    pub id: Option<String>,
    pub dbf_id: Option<DbfId>,
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub cost: Option<u32>,
    pub text: String,
}

/// Report-ready projection of one deck slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCardEntry {
    pub dbf_id: DbfId,
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub cost: Option<u32>,
    pub copies: u32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
    /// Set when the catalog has no card with this dbfId
    #[serde(default, skip_serializing_if = "is_false")]
    pub missing: bool,
    pub summary: String,
    pub derived_summaries: Vec<String>,
    pub derived: Vec<DerivedCardEntry>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Hero line of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSummary {
    pub dbf_id: DbfId,
    pub id: Option<String>,
    pub name: Option<String>,
    pub card_class: Option<String>,
    pub summary: String,
}

/// Cards attached to a sideboard owner (e.g. E.T.C. or Zilliax modules)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideboardGroup {
    pub owner_dbf_id: DbfId,
    pub owner_name: String,
    pub cards: Vec<ResolvedCardEntry>,
}

/// Fully resolved deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckReport {
    pub deck_code: String,
    pub format: String,
    pub heroes: Vec<HeroSummary>,
    pub cards: Vec<ResolvedCardEntry>,
    pub sideboards: Vec<SideboardGroup>,
}
