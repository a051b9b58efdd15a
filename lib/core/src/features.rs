//! Feature store
//!
//! Per-sale feature vectors keyed by fully qualified column names
//! (`<dimension_key>__<feature>`). Values are usually 0/1 flags but numeric
//! values are kept as-is.

use ahash::{AHashMap, AHashSet};

use crate::{DimensionRegistry, Error, Result, SaleId};

/// Feature values of one sale. Absent columns read as `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    values: AHashMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: f64) {
        self.values.insert(column.into(), value);
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: f64) -> Self {
        self.insert(column, value);
        self
    }

    /// Value of a column, `0.0` when absent.
    #[inline]
    pub fn value(&self, column: &str) -> f64 {
        self.values.get(column).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn has(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Columnar feature table: one vector per sale plus the table header.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    columns: Vec<String>,
    column_set: AHashSet<String>,
    vectors: AHashMap<SaleId, FeatureVector>,
}

impl FeatureStore {
    /// Empty store with the given header (excluding the sale id column).
    pub fn new(columns: Vec<String>) -> Self {
        let column_set = columns.iter().cloned().collect();
        Self {
            columns,
            column_set,
            vectors: AHashMap::new(),
        }
    }

    /// Insert or replace a sale's vector.
    pub fn insert(&mut self, sale_id: SaleId, vector: FeatureVector) {
        self.vectors.insert(sale_id, vector);
    }

    /// Vector of a sale, or `UnknownEntity` when the sale has no row.
    pub fn get(&self, sale_id: &str) -> Result<&FeatureVector> {
        self.vectors
            .get(sale_id)
            .ok_or_else(|| Error::UnknownEntity(sale_id.to_string()))
    }

    #[inline]
    pub fn contains(&self, sale_id: &str) -> bool {
        self.vectors.contains_key(sale_id)
    }

    /// Table header, in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn has_column(&self, column: &str) -> bool {
        self.column_set.contains(column)
    }

    /// Columns declared by the registry that the table header lacks.
    pub fn missing_columns<'a>(&self, registry: &'a DimensionRegistry) -> Vec<&'a str> {
        registry
            .all_columns()
            .into_iter()
            .filter(|c| !self.has_column(c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
