//! Feature comparator
//!
//! Explains a ranking row by comparing the feature vectors of two sales:
//! which active features they share, which ones only one of them has, and a
//! full side-by-side table for drill-down views.

use salesim_core::{Dataset, Dimension, DimensionRegistry, FeatureStore, FeatureVector, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Which columns a comparison covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Union of every dimension's columns
    All,
    /// One dimension, by key or label
    Dimension(String),
}

impl FromStr for Scope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Scope::All)
        } else {
            Ok(Scope::Dimension(s.to_string()))
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("all"),
            Scope::Dimension(d) => f.write_str(d),
        }
    }
}

/// Active agreements and disagreements between two sales.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureDiff {
    /// Columns where both sales have value 1
    pub shared: BTreeSet<String>,
    /// Columns where the values differ and at least one is 1
    pub differing: BTreeSet<String>,
}

/// One line of a side-by-side table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    /// Feature name without its dimension prefix
    pub feature: String,
    pub value_a: f64,
    pub value_b: f64,
}

/// Side-by-side table for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionTable {
    pub dimension: String,
    pub label: String,
    pub rows: Vec<FeatureRow>,
}

/// Diff plus tables, everything an "explain" drill-down shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub sale_a: String,
    pub sale_b: String,
    pub scope: String,
    #[serde(flatten)]
    pub diff: FeatureDiff,
    pub tables: Vec<DimensionTable>,
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureComparator<'a> {
    registry: &'a DimensionRegistry,
    features: &'a FeatureStore,
}

impl<'a> FeatureComparator<'a> {
    pub fn new(registry: &'a DimensionRegistry, features: &'a FeatureStore) -> Self {
        Self { registry, features }
    }

    pub fn from_dataset(dataset: &'a Dataset) -> Self {
        Self::new(&dataset.registry, &dataset.features)
    }

    fn vectors(&self, sale_a: &str, sale_b: &str) -> Result<(&'a FeatureVector, &'a FeatureVector)> {
        Ok((self.features.get(sale_a)?, self.features.get(sale_b)?))
    }

    fn columns(&self, scope: &Scope) -> Result<Vec<&'a str>> {
        match scope {
            Scope::All => Ok(self.registry.all_columns()),
            Scope::Dimension(d) => Ok(self
                .registry
                .resolve(d)?
                .columns
                .iter()
                .map(String::as_str)
                .collect()),
        }
    }

    /// Shared and differing active features of two sales.
    ///
    /// Symmetric in `sale_a`/`sale_b`. Pairs where both values are 0, or equal
    /// but not 1, are reported in neither set.
    pub fn diff(&self, sale_a: &str, sale_b: &str, scope: &Scope) -> Result<FeatureDiff> {
        let (a, b) = self.vectors(sale_a, sale_b)?;
        let mut diff = FeatureDiff::default();

        for column in self.columns(scope)? {
            let (va, vb) = (a.value(column), b.value(column));
            if va == 1.0 && vb == 1.0 {
                diff.shared.insert(column.to_string());
            } else if va != vb && (va == 1.0 || vb == 1.0) {
                diff.differing.insert(column.to_string());
            }
        }
        Ok(diff)
    }

    /// Every declared feature of one dimension with both sales' values, in
    /// declared column order.
    pub fn side_by_side(&self, sale_a: &str, sale_b: &str, dimension: &str) -> Result<Vec<FeatureRow>> {
        let (a, b) = self.vectors(sale_a, sale_b)?;
        let dimension = self.registry.resolve(dimension)?;
        Ok(Self::table_rows(dimension, a, b))
    }

    /// Side-by-side tables for every dimension that declares columns.
    pub fn side_by_side_all(&self, sale_a: &str, sale_b: &str) -> Result<Vec<DimensionTable>> {
        let (a, b) = self.vectors(sale_a, sale_b)?;
        Ok(self
            .registry
            .iter()
            .filter(|d| !d.columns.is_empty())
            .map(|d| DimensionTable {
                dimension: d.key.clone(),
                label: d.label.clone(),
                rows: Self::table_rows(d, a, b),
            })
            .collect())
    }

    /// Diff and side-by-side tables for the given scope.
    pub fn explain(&self, sale_a: &str, sale_b: &str, scope: &Scope) -> Result<Explanation> {
        let diff = self.diff(sale_a, sale_b, scope)?;
        let tables = match scope {
            Scope::All => self.side_by_side_all(sale_a, sale_b)?,
            Scope::Dimension(d) => {
                let dimension = self.registry.resolve(d)?;
                vec![DimensionTable {
                    dimension: dimension.key.clone(),
                    label: dimension.label.clone(),
                    rows: self.side_by_side(sale_a, sale_b, &dimension.key)?,
                }]
            }
        };
        Ok(Explanation {
            sale_a: sale_a.to_string(),
            sale_b: sale_b.to_string(),
            scope: scope.to_string(),
            diff,
            tables,
        })
    }

    fn table_rows(dimension: &Dimension, a: &FeatureVector, b: &FeatureVector) -> Vec<FeatureRow> {
        dimension
            .columns
            .iter()
            .map(|column| FeatureRow {
                feature: dimension.feature_name(column).to_string(),
                value_a: a.value(column),
                value_b: b.value(column),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesim_core::{Error, SaleId};
    use std::collections::HashMap;

    fn fixture() -> (DimensionRegistry, FeatureStore) {
        let mapping = HashMap::from([
            (
                "location".to_string(),
                vec![
                    "location__beach".to_string(),
                    "location__city".to_string(),
                    "location__mountain".to_string(),
                ],
            ),
            (
                "pricing".to_string(),
                vec!["pricing__budget".to_string(), "pricing__stars".to_string()],
            ),
        ]);
        let registry = DimensionRegistry::builtin().with_feature_columns(&mapping).unwrap();

        let mut store = FeatureStore::new(registry.all_columns().iter().map(|c| c.to_string()).collect());
        store.insert(
            SaleId::new("A"),
            FeatureVector::new()
                .with("location__beach", 1.0)
                .with("location__city", 1.0)
                .with("location__mountain", 0.0)
                .with("pricing__budget", 1.0)
                .with("pricing__stars", 4.0),
        );
        store.insert(
            SaleId::new("B"),
            FeatureVector::new()
                .with("location__beach", 1.0)
                .with("location__mountain", 0.0)
                .with("pricing__stars", 3.0),
        );
        (registry, store)
    }

    #[test]
    fn test_diff_classifies_active_features() {
        let (registry, store) = fixture();
        let cmp = FeatureComparator::new(&registry, &store);
        let diff = cmp.diff("A", "B", &Scope::Dimension("location".into())).unwrap();

        assert_eq!(diff.shared, BTreeSet::from(["location__beach".to_string()]));
        // city is absent for B and reads as 0
        assert_eq!(diff.differing, BTreeSet::from(["location__city".to_string()]));
    }

    #[test]
    fn test_diff_ignores_inactive_pairs() {
        let (registry, store) = fixture();
        let cmp = FeatureComparator::new(&registry, &store);
        let diff = cmp.diff("A", "B", &Scope::Dimension("Pricing".into())).unwrap();
        // stars differ (4 vs 3) but neither is 1
        assert!(!diff.differing.contains("pricing__stars"));
        assert!(diff.differing.contains("pricing__budget"));
        assert!(diff.shared.is_empty());
    }

    #[test]
    fn test_diff_all_is_union() {
        let (registry, store) = fixture();
        let cmp = FeatureComparator::new(&registry, &store);
        let diff = cmp.diff("A", "B", &"all".parse().unwrap()).unwrap();
        assert_eq!(diff.shared.len(), 1);
        assert_eq!(diff.differing.len(), 2);
    }

    #[test]
    fn test_diff_symmetric_and_disjoint() {
        let (registry, store) = fixture();
        let cmp = FeatureComparator::new(&registry, &store);
        for scope in [Scope::All, Scope::Dimension("location".into()), Scope::Dimension("pricing".into())] {
            let ab = cmp.diff("A", "B", &scope).unwrap();
            let ba = cmp.diff("B", "A", &scope).unwrap();
            assert_eq!(ab, ba);
            assert!(ab.shared.is_disjoint(&ab.differing));
        }
    }

    #[test]
    fn test_diff_unknown_entity() {
        let (registry, store) = fixture();
        let cmp = FeatureComparator::new(&registry, &store);
        assert!(matches!(
            cmp.diff("A", "Z", &Scope::All),
            Err(Error::UnknownEntity(ref id)) if id == "Z"
        ));
        assert!(matches!(
            cmp.diff("Z", "A", &Scope::All),
            Err(Error::UnknownEntity(ref id)) if id == "Z"
        ));
    }

    #[test]
    fn test_diff_unknown_dimension() {
        let (registry, store) = fixture();
        let cmp = FeatureComparator::new(&registry, &store);
        assert!(matches!(
            cmp.diff("A", "B", &Scope::Dimension("Nonexistent".into())),
            Err(Error::UnknownDimension(_))
        ));
    }

    #[test]
    fn test_side_by_side_strips_prefix() {
        let (registry, store) = fixture();
        let cmp = FeatureComparator::new(&registry, &store);
        let rows = cmp.side_by_side("A", "B", "location").unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(names, vec!["beach", "city", "mountain"]);
        assert_eq!(rows[1].value_a, 1.0);
        assert_eq!(rows[1].value_b, 0.0);
    }

    #[test]
    fn test_side_by_side_all_skips_empty_dimensions() {
        let (registry, store) = fixture();
        let cmp = FeatureComparator::new(&registry, &store);
        let tables = cmp.side_by_side_all("A", "B").unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].label, "Pricing");
        assert_eq!(tables[1].rows[1].value_a, 4.0);
    }

    #[test]
    fn test_explain_serializes_flat_diff() {
        let (registry, store) = fixture();
        let cmp = FeatureComparator::new(&registry, &store);
        let explanation = cmp.explain("A", "B", &Scope::Dimension("Location".into())).unwrap();
        assert_eq!(explanation.tables.len(), 1);
        assert_eq!(explanation.tables[0].dimension, "location");

        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json["shared"][0], "location__beach");
        assert_eq!(json["scope"], "Location");
    }
}
