//! Dimension registry
//!
//! A dimension is a thematic group of comparison features ("Location",
//! "Pricing", ...). The registry is declared once and shared by the ranking
//! engine, the feature comparator and the presentation shell, so labels, keys,
//! emojis and feature columns can never drift apart between call sites.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Error, Result};

/// Separator between a dimension key and a feature name in column names.
pub const FEATURE_SEPARATOR: &str = "__";

/// Label used for the weighted (all-dimension) ranking.
pub const GLOBAL_LABEL: &str = "Global";
pub const GLOBAL_EMOJI: &str = "🌐";

/// Descriptor of one thematic dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dimension {
    /// Human-readable label shown in selectors
    pub label: String,
    /// Internal key used to build column and row names
    pub key: String,
    /// Presentation emoji
    #[serde(default)]
    pub emoji: String,
    /// Fully qualified feature columns (`<key>__<feature>`), in display order
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Dimension {
    pub fn new(label: &str, key: &str, emoji: &str) -> Self {
        Self {
            label: label.to_string(),
            key: key.to_string(),
            emoji: emoji.to_string(),
            columns: Vec::new(),
        }
    }

    /// Fully qualified column name for a feature of this dimension.
    pub fn column_for(&self, feature: &str) -> String {
        format!("{}{}{}", self.key, FEATURE_SEPARATOR, feature)
    }

    /// Feature name with this dimension's key prefix removed.
    ///
    /// Columns that do not carry the prefix are returned unchanged.
    pub fn feature_name<'a>(&self, column: &'a str) -> &'a str {
        column
            .strip_prefix(self.key.as_str())
            .and_then(|rest| rest.strip_prefix(FEATURE_SEPARATOR))
            .unwrap_or(column)
    }

    /// `"📍 Location"` style heading.
    pub fn heading(&self) -> String {
        if self.emoji.is_empty() {
            self.label.clone()
        } else {
            format!("{} {}", self.emoji, self.label)
        }
    }
}

/// Ordered set of dimensions addressable by key or label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Dimension>", into = "Vec<Dimension>")]
pub struct DimensionRegistry {
    dimensions: Vec<Dimension>,
    by_key: AHashMap<String, usize>,
    by_label: AHashMap<String, usize>,
}

impl DimensionRegistry {
    /// Build a registry, rejecting empty or duplicated keys and labels.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(Error::InvalidConfig("dimension registry cannot be empty".into()));
        }

        let mut by_key: AHashMap<&str, usize> = AHashMap::with_capacity(dimensions.len());
        let mut by_label: AHashMap<&str, usize> = AHashMap::with_capacity(dimensions.len());
        for (idx, dim) in dimensions.iter().enumerate() {
            if dim.key.is_empty() || dim.label.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "dimension #{} has an empty key or label",
                    idx
                )));
            }
            if dim.key.contains(FEATURE_SEPARATOR) {
                return Err(Error::InvalidConfig(format!(
                    "dimension key '{}' must not contain '{}'",
                    dim.key, FEATURE_SEPARATOR
                )));
            }
            if by_key.insert(&dim.key, idx).is_some() {
                return Err(Error::InvalidConfig(format!("duplicate dimension key '{}'", dim.key)));
            }
            if by_label.insert(&dim.label, idx).is_some() {
                return Err(Error::InvalidConfig(format!(
                    "duplicate dimension label '{}'",
                    dim.label
                )));
            }
        }

        Ok(Self::indexed(dimensions))
    }

    /// The dimensions the sale dashboards compare on.
    pub fn builtin() -> Self {
        let dimensions = vec![
            Dimension::new("Location", "location", "📍"),
            Dimension::new("Pricing", "pricing", "💰"),
            Dimension::new("Stay Type", "stay_type", "🕶️"),
            Dimension::new("Equipment & Services", "equipment_service", "⛳"),
            Dimension::new("Accessibility", "accessibility", "♿"),
            Dimension::new("Landscape", "landscape", "🏞️"),
            Dimension::new("Fundamentals", "fundamentals", "🧱"),
            Dimension::new("Wellness", "wellness", "🧘"),
            Dimension::new("Family", "family", "👨‍👩‍👧"),
            Dimension::new("Activity", "activity", "🚴"),
        ];
        Self::indexed(dimensions)
    }

    // Caller guarantees unique, non-empty keys and labels.
    fn indexed(dimensions: Vec<Dimension>) -> Self {
        let by_key = dimensions
            .iter()
            .enumerate()
            .map(|(idx, d)| (d.key.clone(), idx))
            .collect();
        let by_label = dimensions
            .iter()
            .enumerate()
            .map(|(idx, d)| (d.label.clone(), idx))
            .collect();
        Self {
            dimensions,
            by_key,
            by_label,
        }
    }

    /// Parse a registry from a JSON list of dimension descriptors.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let dimensions: Vec<Dimension> = serde_json::from_str(json)?;
        Self::new(dimensions)
    }

    /// Attach feature columns from a `key -> [column, ...]` mapping.
    ///
    /// Dimensions missing from the mapping keep an empty column list. Keys in
    /// the mapping that are not registered are rejected.
    pub fn with_feature_columns(mut self, mapping: &HashMap<String, Vec<String>>) -> Result<Self> {
        for key in mapping.keys() {
            if !self.by_key.contains_key(key) {
                return Err(Error::InvalidConfig(format!(
                    "feature column mapping references unknown dimension '{}'",
                    key
                )));
            }
        }
        for dim in &mut self.dimensions {
            if let Some(columns) = mapping.get(&dim.key) {
                dim.columns = columns.clone();
            }
        }
        Ok(self)
    }

    /// Look up a dimension by its key.
    pub fn get(&self, key: &str) -> Result<&Dimension> {
        self.by_key
            .get(key)
            .map(|&idx| &self.dimensions[idx])
            .ok_or_else(|| Error::UnknownDimension(key.to_string()))
    }

    /// Look up a dimension by key, falling back to its display label.
    pub fn resolve(&self, key_or_label: &str) -> Result<&Dimension> {
        self.by_key
            .get(key_or_label)
            .or_else(|| self.by_label.get(key_or_label))
            .map(|&idx| &self.dimensions[idx])
            .ok_or_else(|| Error::UnknownDimension(key_or_label.to_string()))
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.key.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Union of every dimension's columns, in registry order, without repeats.
    pub fn all_columns(&self) -> Vec<&str> {
        let mut seen = ahash::AHashSet::new();
        self.dimensions
            .iter()
            .flat_map(|d| d.columns.iter())
            .filter(|c| seen.insert(c.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl TryFrom<Vec<Dimension>> for DimensionRegistry {
    type Error = Error;

    fn try_from(dimensions: Vec<Dimension>) -> Result<Self> {
        Self::new(dimensions)
    }
}

impl From<DimensionRegistry> for Vec<Dimension> {
    fn from(registry: DimensionRegistry) -> Self {
        registry.dimensions
    }
}

impl Default for DimensionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
