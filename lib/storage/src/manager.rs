use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use salesim_core::{Catalog, Dataset, DimensionRegistry, Error, RankingTable, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::DataFiles;
use crate::loader;

/// What a successful load read, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub loaded_at: DateTime<Utc>,
    pub dimensions: usize,
    pub catalog_entries: usize,
    pub feature_rows: usize,
    pub feature_columns: usize,
    pub ranking_rows: usize,
    pub ranked_sales: usize,
}

impl LoadReport {
    fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            loaded_at: Utc::now(),
            dimensions: dataset.registry.len(),
            catalog_entries: dataset.catalog.len(),
            feature_rows: dataset.features.len(),
            feature_columns: dataset.features.columns().len(),
            ranking_rows: dataset.rankings.len(),
            ranked_sales: dataset.rankings.sale_count(),
        }
    }
}

#[derive(Debug)]
struct Loaded {
    dataset: Arc<Dataset>,
    report: LoadReport,
}

/// Loads the snapshot tables once and serves the cached dataset afterwards.
///
/// The cached [`Dataset`] is immutable; concurrent readers share it through
/// an [`Arc`] without further locking. A failed load caches nothing.
pub struct SnapshotStore {
    files: DataFiles,
    loaded: RwLock<Option<Loaded>>,
}

impl SnapshotStore {
    pub fn new(files: DataFiles) -> Self {
        Self {
            files,
            loaded: RwLock::new(None),
        }
    }

    #[inline]
    pub fn files(&self) -> &DataFiles {
        &self.files
    }

    /// The dataset, reading storage only on the first successful call.
    pub fn dataset(&self) -> Result<Arc<Dataset>> {
        if let Some(loaded) = self.loaded.read().as_ref() {
            return Ok(loaded.dataset.clone());
        }

        let mut slot = self.loaded.write();
        // Another caller may have loaded while we waited for the write lock.
        if let Some(loaded) = slot.as_ref() {
            return Ok(loaded.dataset.clone());
        }

        let dataset = match load_dataset(&self.files) {
            Ok(dataset) => Arc::new(dataset),
            Err(e) => {
                error!(error = %e, "failed to load snapshot tables");
                return Err(e);
            }
        };
        let report = LoadReport::from_dataset(&dataset);
        info!(
            dimensions = report.dimensions,
            catalog_entries = report.catalog_entries,
            feature_rows = report.feature_rows,
            ranking_rows = report.ranking_rows,
            ranked_sales = report.ranked_sales,
            "snapshot tables loaded"
        );
        *slot = Some(Loaded {
            dataset: dataset.clone(),
            report,
        });
        Ok(dataset)
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded.read().is_some()
    }

    /// Report of the cached load, if any.
    pub fn report(&self) -> Option<LoadReport> {
        self.loaded.read().as_ref().map(|l| l.report.clone())
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path).map(BufReader::new).map_err(|e| {
        Error::load(path.display().to_string(), format!("cannot open file: {}", e))
    })
}

/// Read and cross-check all snapshot tables described by `files`.
pub fn load_dataset(files: &DataFiles) -> Result<Dataset> {
    let registry = match &files.dimensions {
        Some(path) => loader::read_registry(open(path)?, &path.display().to_string())?,
        None => DimensionRegistry::builtin(),
    };

    let source = files.feature_columns.display().to_string();
    let mapping = loader::read_feature_columns(open(&files.feature_columns)?, &source)?;
    let registry = registry.with_feature_columns(&mapping)?;

    let source = files.rankings.display().to_string();
    let rows = loader::read_rankings(open(&files.rankings)?, &source, &registry)?;
    let rankings = RankingTable::new(rows)?;

    let source = files.display_names.display().to_string();
    let catalog = Catalog::new(loader::read_display_names(open(&files.display_names)?, &source)?);

    let source = files.features.display().to_string();
    let features = loader::read_features(open(&files.features)?, &source)?;

    Dataset::new(registry, catalog, features, rankings)
}
