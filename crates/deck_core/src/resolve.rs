//! Deck resolution
//!
//! Joins a decoded [`Deck`] against a [`CatalogIndex`] and produces a
//! [`DeckReport`]. Resolution never fails: ids the catalog does not know
//! become placeholder entries.

use crate::index::CatalogIndex;
use crate::markup::title_case;
use crate::types::{
    CardRecord, DbfId, Deck, DeckReport, DerivedCardEntry, HeroSummary, ResolvedCardEntry,
    SideboardGroup,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Memoised derived-card lookups for one resolution run
///
/// The catalog is immutable while a run is in progress, so entries never
/// need invalidating. Create a fresh cache for every run.
#[derive(Debug, Default)]
pub struct DerivedCardCache {
    entries: HashMap<String, Vec<Arc<CardRecord>>>,
}

impl DerivedCardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards whose string id starts with `card_id`
    ///
    /// Only derivable card types are returned, the card itself is excluded,
    /// and the result is ordered by id length, then cost, then name.
    pub fn collect_prefixed_cards(
        &mut self,
        card_id: &str,
        index: &CatalogIndex,
    ) -> &[Arc<CardRecord>] {
        if card_id.is_empty() {
            return &[];
        }

        if !self.entries.contains_key(card_id) {
            let mut related: Vec<(&str, &Arc<CardRecord>)> = index
                .by_id()
                .iter()
                .filter(|(other_id, card)| {
                    other_id.as_str() != card_id
                        && other_id.starts_with(card_id)
                        && card.is_derivable()
                })
                .map(|(other_id, card)| (other_id.as_str(), card))
                .collect();

            related.sort_by(|(a_id, a), (b_id, b)| {
                a_id.len()
                    .cmp(&b_id.len())
                    .then_with(|| a.cost_or_zero().cmp(&b.cost_or_zero()))
                    .then_with(|| a.name.cmp(&b.name))
                    .then_with(|| a_id.cmp(b_id))
            });

            debug!(card_id, derived = related.len(), "Collected derived cards");
            let related = related.into_iter().map(|(_, card)| Arc::clone(card)).collect();
            self.entries.insert(card_id.to_string(), related);
        }

        self.entries.get(card_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves decks against one catalog, owning the derived-card cache for the run
pub struct DeckResolver<'a> {
    index: &'a CatalogIndex,
    derived: DerivedCardCache,
}

impl<'a> DeckResolver<'a> {
    pub fn new(index: &'a CatalogIndex) -> Self {
        Self {
            index,
            derived: DerivedCardCache::new(),
        }
    }

    /// Build the full report for a decoded deck
    pub fn resolve(&mut self, deck: &Deck, deck_code: &str) -> DeckReport {
        let index = self.index;

        let heroes = deck
            .heroes
            .iter()
            .map(|&hero_id| describe_hero(hero_id, index.card_by_dbf_id(hero_id)))
            .collect();

        let mut sorted_cards = deck.cards.clone();
        sorted_cards.sort_by_key(|&(dbf_id, _)| {
            let cost = index
                .card_by_dbf_id(dbf_id)
                .map(CardRecord::cost_or_zero)
                .unwrap_or(0);
            (cost, dbf_id)
        });

        let cards = sorted_cards
            .into_iter()
            .map(|(dbf_id, copies)| self.resolve_slot(dbf_id, copies))
            .collect();

        let sideboards = group_sideboards(&deck.sideboards)
            .into_iter()
            .map(|(owner_dbf_id, contents)| {
                let owner_name = match index.card_by_dbf_id(owner_dbf_id) {
                    Some(owner) => owner.name.clone().unwrap_or_else(|| "Unknown".to_string()),
                    None => format!("dbfId={}", owner_dbf_id),
                };
                let cards = contents
                    .into_iter()
                    .map(|(dbf_id, copies)| self.resolve_slot(dbf_id, copies))
                    .collect();
                SideboardGroup {
                    owner_dbf_id,
                    owner_name,
                    cards,
                }
            })
            .collect();

        DeckReport {
            deck_code: deck_code.to_string(),
            format: deck.format.display_name(),
            heroes,
            cards,
            sideboards,
        }
    }

    /// Resolve one `(dbfId, copies)` slot, falling back to a placeholder
    pub fn resolve_slot(&mut self, dbf_id: DbfId, copies: u32) -> ResolvedCardEntry {
        let index = self.index;
        match index.card_by_dbf_id(dbf_id) {
            Some(card) => self.describe_card(card, dbf_id, copies),
            None => {
                warn!(dbf_id, "Card not found in catalog");
                missing_card_entry(dbf_id, copies)
            }
        }
    }

    /// Describe a known card, including the cards it creates
    pub fn describe_card(
        &mut self,
        card: &CardRecord,
        dbf_id: DbfId,
        copies: u32,
    ) -> ResolvedCardEntry {
        let name = card.name.clone().unwrap_or_else(|| "Unknown".to_string());
        let card_type = card.type_label();
        let text = card.clean_text();
        let cost = card
            .cost
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string());
        let summary = with_text(format!("({}) {} x{} [{}]", cost, name, copies, card_type), &text);

        let mut derived_summaries = Vec::new();
        let mut derived = Vec::new();
        for related in self.derived.collect_prefixed_cards(card.id_or_empty(), self.index) {
            let entry = describe_derived(related);
            derived_summaries.push(with_text(
                format!("-> {} [{}]", entry.name, entry.card_type),
                &entry.text,
            ));
            derived.push(entry);
        }

        ResolvedCardEntry {
            dbf_id: card.dbf_id.unwrap_or(dbf_id),
            id: card.id.clone(),
            name: Some(name),
            card_type: Some(card_type),
            cost: card.cost,
            copies,
            text,
            rarity: card.rarity.clone(),
            set: card.set.clone(),
            attack: card.attack,
            health: card.health,
            missing: false,
            summary,
            derived_summaries,
            derived,
        }
    }
}

fn with_text(line: String, text: &str) -> String {
    if text.is_empty() {
        line
    } else {
        format!("{} - {}", line, text)
    }
}

fn describe_derived(card: &CardRecord) -> DerivedCardEntry {
    let name = card
        .name
        .clone()
        .or_else(|| card.id.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    DerivedCardEntry {
        id: card.id.clone(),
        dbf_id: card.dbf_id,
        name,
        card_type: card.type_label(),
        cost: card.cost,
        text: card.clean_text(),
    }
}

/// Hero line for a hero id, `Unknown hero (dbfId=N)` when the catalog lacks it
pub fn describe_hero(dbf_id: DbfId, card: Option<&CardRecord>) -> HeroSummary {
    let Some(card) = card else {
        warn!(dbf_id, "Hero not found in catalog");
        return HeroSummary {
            dbf_id,
            id: None,
            name: None,
            card_class: None,
            summary: format!("Unknown hero (dbfId={})", dbf_id),
        };
    };

    let class = card
        .card_class
        .as_deref()
        .unwrap_or("UNKNOWN")
        .replace("DEMONHUNTER", "DEMON HUNTER");
    let name = card.name.as_deref().unwrap_or("Unknown Hero");

    HeroSummary {
        dbf_id,
        id: card.id.clone(),
        name: card.name.clone(),
        card_class: card.card_class.clone(),
        summary: format!("{} ({})", name, title_case(&class)),
    }
}

/// Placeholder entry for an id the catalog does not contain
pub fn missing_card_entry(dbf_id: DbfId, copies: u32) -> ResolvedCardEntry {
    ResolvedCardEntry {
        dbf_id,
        id: None,
        name: None,
        card_type: None,
        cost: None,
        copies,
        text: String::new(),
        rarity: None,
        set: None,
        attack: None,
        health: None,
        missing: true,
        summary: format!("Unknown card (dbfId={}) x{}", dbf_id, copies),
        derived_summaries: Vec::new(),
        derived: Vec::new(),
    }
}

/// Group sideboard triples by owner, keeping first-seen owner order
fn group_sideboards(entries: &[(DbfId, u32, DbfId)]) -> Vec<(DbfId, Vec<(DbfId, u32)>)> {
    let mut groups: Vec<(DbfId, Vec<(DbfId, u32)>)> = Vec::new();
    for &(dbf_id, copies, owner) in entries {
        match groups.iter_mut().find(|(id, _)| *id == owner) {
            Some((_, contents)) => contents.push((dbf_id, copies)),
            None => groups.push((owner, vec![(dbf_id, copies)])),
        }
    }
    groups
}
