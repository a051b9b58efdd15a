use std::sync::Arc;

use crate::{Catalog, DimensionRegistry, Error, FeatureStore, RankingTable, Result};

/// Everything one analysis session reads: registry, catalog, features and
/// rankings. Immutable once built and cheap to share behind an [`Arc`].
#[derive(Debug, Clone)]
pub struct Dataset {
    pub registry: Arc<DimensionRegistry>,
    pub catalog: Catalog,
    pub features: FeatureStore,
    pub rankings: RankingTable,
}

impl Dataset {
    /// Assemble a dataset, checking cross-table consistency:
    /// every column the registry declares exists in the feature table and
    /// every dimension key in the ranking table is registered.
    pub fn new(
        registry: DimensionRegistry,
        catalog: Catalog,
        features: FeatureStore,
        rankings: RankingTable,
    ) -> Result<Self> {
        let missing = features.missing_columns(&registry);
        if !missing.is_empty() {
            return Err(Error::load(
                "features",
                format!("declared feature columns missing from table: {}", missing.join(", ")),
            ));
        }

        if let Some(unknown) = rankings
            .dimension_keys()
            .iter()
            .find(|k| !registry.contains(k))
        {
            return Err(Error::UnknownDimension(unknown.clone()));
        }

        Ok(Self {
            registry: Arc::new(registry),
            catalog,
            features,
            rankings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogEntry, RankingRow};
    use std::collections::HashMap;

    fn registry() -> DimensionRegistry {
        let mapping = HashMap::from([("location".to_string(), vec!["location__beach".to_string()])]);
        DimensionRegistry::builtin().with_feature_columns(&mapping).unwrap()
    }

    #[test]
    fn test_consistent_dataset() {
        let dataset = Dataset::new(
            registry(),
            Catalog::new(vec![CatalogEntry::new("fr_FR1", "One")]),
            FeatureStore::new(vec!["location__beach".into()]),
            RankingTable::new(vec![RankingRow::new("fr_FR1", "fr_FR2", "location", 0.3, 1)]).unwrap(),
        );
        assert!(dataset.is_ok());
    }

    #[test]
    fn test_missing_feature_column() {
        let dataset = Dataset::new(
            registry(),
            Catalog::default(),
            FeatureStore::new(vec![]),
            RankingTable::default(),
        );
        assert!(matches!(dataset, Err(Error::Load { .. })));
    }

    #[test]
    fn test_unregistered_ranking_dimension() {
        let dataset = Dataset::new(
            registry(),
            Catalog::default(),
            FeatureStore::new(vec!["location__beach".into()]),
            RankingTable::new(vec![RankingRow::new("a", "b", "weather", 0.3, 1)]).unwrap(),
        );
        assert!(matches!(dataset, Err(Error::UnknownDimension(ref k)) if k == "weather"));
    }
}
