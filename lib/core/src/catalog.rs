//! Catalog of sales
//!
//! Bidirectional lookup between display names and sale identifiers, built once
//! from `(sale_uid, sale_display_name)` rows that may contain duplicates.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result, SaleId};

/// One row of the display-name table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "sale_uid")]
    pub sale_id: SaleId,
    #[serde(rename = "sale_display_name")]
    pub display_name: String,
}

impl CatalogEntry {
    pub fn new(sale_id: impl Into<SaleId>, display_name: impl Into<String>) -> Self {
        Self {
            sale_id: sale_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Immutable name <-> identifier index.
///
/// When one display name maps to several identifiers the first identifier in
/// source order wins, and likewise for an identifier listed under several names.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    names: Vec<String>,
    name_to_id: AHashMap<String, SaleId>,
    id_to_name: AHashMap<SaleId, String>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut seen = AHashSet::new();
        let mut catalog = Catalog::default();

        for entry in entries {
            if !seen.insert(entry.clone()) {
                continue;
            }
            let CatalogEntry {
                sale_id,
                display_name,
            } = entry;

            match catalog.name_to_id.get(&display_name) {
                Some(existing) => {
                    warn!(
                        name = %display_name,
                        kept = %existing,
                        ignored = %sale_id,
                        "ambiguous display name, keeping first identifier"
                    );
                }
                None => {
                    catalog.names.push(display_name.clone());
                    catalog.name_to_id.insert(display_name.clone(), sale_id.clone());
                }
            }
            catalog.id_to_name.entry(sale_id).or_insert(display_name);
        }

        catalog
    }

    /// Identifier for a display name.
    pub fn resolve(&self, display_name: &str) -> Result<&SaleId> {
        self.name_to_id
            .get(display_name)
            .ok_or_else(|| Error::NotFound(format!("display name '{}'", display_name)))
    }

    /// Display name for an identifier.
    pub fn label_of(&self, sale_id: &str) -> Result<&str> {
        self.id_to_name
            .get(sale_id)
            .map(String::as_str)
            .ok_or_else(|| Error::NotFound(format!("sale '{}'", sale_id)))
    }

    /// Locale code of an identifier. Does not require a catalog entry.
    pub fn locale_of<'a>(&self, sale_id: &'a SaleId) -> Result<&'a str> {
        sale_id.locale()
    }

    /// Numeric id of an identifier. Does not require a catalog entry.
    pub fn numeric_id_of(&self, sale_id: &SaleId) -> Result<u64> {
        sale_id.numeric_id()
    }

    #[inline]
    pub fn contains(&self, sale_id: &str) -> bool {
        self.id_to_name.contains_key(sale_id)
    }

    /// De-duplicated display names in first-seen order.
    pub fn display_names(&self) -> &[String] {
        &self.names
    }

    /// Number of distinct identifiers.
    #[inline]
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}
