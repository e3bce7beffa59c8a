//! Catalog indexing
//!
//! Builds the two lookup tables used during resolution: by numeric
//! `dbfId` and by string id.

use crate::types::{CardRecord, DbfId};
use std::collections::HashMap;
use std::sync::Arc;

/// Cards keyed by numeric id
pub type DbfIndex = HashMap<DbfId, Arc<CardRecord>>;

/// Cards keyed by string id
pub type IdIndex = HashMap<String, Arc<CardRecord>>;

/// Lookup tables over one loaded catalog
///
/// Built once per run and read-only afterwards, apart from
/// [`CatalogIndex::merge_ids_from`] during loading.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    by_dbf_id: DbfIndex,
    by_id: IdIndex,
}

impl CatalogIndex {
    /// Index a sequence of records; later duplicates replace earlier ones
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CardRecord>,
    {
        let mut by_dbf_id = DbfIndex::new();
        let mut by_id = IdIndex::new();

        for record in records {
            let record = Arc::new(record);
            if let Some(dbf_id) = record.dbf_id {
                by_dbf_id.insert(dbf_id, Arc::clone(&record));
            }
            if let Some(id) = record.id.as_deref().filter(|id| !id.is_empty()) {
                by_id.insert(id.to_string(), Arc::clone(&record));
            }
        }

        Self { by_dbf_id, by_id }
    }

    /// Broaden the string-id table with entries from another index.
    ///
    /// Existing entries are kept; the numeric table is untouched.
    /// Returns the number of ids added.
    pub fn merge_ids_from(&mut self, other: &CatalogIndex) -> usize {
        let before = self.by_id.len();
        self.by_id = merge_id_index(&self.by_id, &other.by_id);
        self.by_id.len() - before
    }

    pub fn card_by_dbf_id(&self, dbf_id: DbfId) -> Option<&CardRecord> {
        self.by_dbf_id.get(&dbf_id).map(Arc::as_ref)
    }

    pub fn card_by_id(&self, id: &str) -> Option<&CardRecord> {
        self.by_id.get(id).map(Arc::as_ref)
    }

    pub fn by_dbf_id(&self) -> &DbfIndex {
        &self.by_dbf_id
    }

    pub fn by_id(&self) -> &IdIndex {
        &self.by_id
    }
}

/// Merge two string-id tables without overwriting entries of `primary`
pub fn merge_id_index(primary: &IdIndex, supplementary: &IdIndex) -> IdIndex {
    let mut merged = primary.clone();
    for (id, card) in supplementary {
        merged
            .entry(id.clone())
            .or_insert_with(|| Arc::clone(card));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(dbf_id: Option<DbfId>, id: Option<&str>, name: &str) -> CardRecord {
        CardRecord {
            dbf_id,
            id: id.map(str::to_string),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_indexes_both_ids() {
        let index = CatalogIndex::build(vec![
            card(Some(1), Some("AAA_001"), "First"),
            card(Some(2), Some("AAA_002"), "Second"),
        ]);

        assert_eq!(index.by_dbf_id().len(), 2);
        assert_eq!(index.by_id().len(), 2);
        assert_eq!(index.card_by_dbf_id(2).unwrap().name.as_deref(), Some("Second"));
        assert_eq!(index.card_by_id("AAA_001").unwrap().dbf_id, Some(1));
        assert!(index.card_by_dbf_id(3).is_none());
        assert!(index.card_by_id("missing").is_none());
    }

    #[test]
    fn test_build_last_duplicate_wins() {
        let index = CatalogIndex::build(vec![
            card(Some(1), Some("AAA_001"), "Old"),
            card(Some(1), Some("AAA_001"), "New"),
        ]);

        assert_eq!(index.card_by_dbf_id(1).unwrap().name.as_deref(), Some("New"));
        assert_eq!(index.card_by_id("AAA_001").unwrap().name.as_deref(), Some("New"));
    }

    #[test]
    fn test_build_skips_absent_ids() {
        let index = CatalogIndex::build(vec![
            card(None, Some("TOKEN_01"), "Token"),
            card(Some(9), None, "No string id"),
            card(Some(10), Some(""), "Empty string id"),
        ]);

        assert_eq!(index.by_dbf_id().len(), 2);
        assert_eq!(index.by_id().len(), 1);
        assert!(index.card_by_id("TOKEN_01").is_some());
    }

    #[test]
    fn test_merge_never_overwrites_primary() {
        let mut primary = CatalogIndex::build(vec![card(Some(1), Some("AAA_001"), "Collectible")]);
        let full = CatalogIndex::build(vec![
            card(Some(1), Some("AAA_001"), "Full copy"),
            card(Some(2), Some("AAA_001t"), "Token"),
        ]);

        let added = primary.merge_ids_from(&full);

        assert_eq!(added, 1);
        assert_eq!(
            primary.card_by_id("AAA_001").unwrap().name.as_deref(),
            Some("Collectible")
        );
        assert_eq!(primary.card_by_id("AAA_001t").unwrap().name.as_deref(), Some("Token"));
        // Numeric table is left alone
        assert!(primary.card_by_dbf_id(2).is_none());
    }

    #[test]
    fn test_merge_id_index_keeps_primary_values() {
        let primary = CatalogIndex::build(vec![card(None, Some("X"), "primary")]);
        let other = CatalogIndex::build(vec![
            card(None, Some("X"), "other"),
            card(None, Some("Y"), "other"),
        ]);

        let merged = merge_id_index(primary.by_id(), other.by_id());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["X"].name.as_deref(), Some("primary"));
        assert_eq!(merged["Y"].name.as_deref(), Some("other"));
    }
}
