use salesim_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const RANKINGS_FILE: &str = "similar_products_rankings.csv";
pub const DISPLAY_NAMES_FILE: &str = "similar_products_display_names.csv";
pub const FEATURES_FILE: &str = "similar_products_features.csv";
pub const FEATURE_COLUMNS_FILE: &str = "similar_products_feature_cols.json";

/// Locations of the four snapshot tables, plus an optional dimension
/// registry file replacing the built-in registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFiles {
    #[serde(default = "default_rankings")]
    pub rankings: PathBuf,
    #[serde(default = "default_display_names")]
    pub display_names: PathBuf,
    #[serde(default = "default_features")]
    pub features: PathBuf,
    #[serde(default = "default_feature_columns")]
    pub feature_columns: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<PathBuf>,
}

fn default_rankings() -> PathBuf {
    Path::new(DEFAULT_DATA_DIR).join(RANKINGS_FILE)
}

fn default_display_names() -> PathBuf {
    Path::new(DEFAULT_DATA_DIR).join(DISPLAY_NAMES_FILE)
}

fn default_features() -> PathBuf {
    Path::new(DEFAULT_DATA_DIR).join(FEATURES_FILE)
}

fn default_feature_columns() -> PathBuf {
    Path::new(DEFAULT_DATA_DIR).join(FEATURE_COLUMNS_FILE)
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            rankings: default_rankings(),
            display_names: default_display_names(),
            features: default_features(),
            feature_columns: default_feature_columns(),
            dimensions: None,
        }
    }
}

impl DataFiles {
    /// Default file names under `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            rankings: dir.join(RANKINGS_FILE),
            display_names: dir.join(DISPLAY_NAMES_FILE),
            features: dir.join(FEATURES_FILE),
            feature_columns: dir.join(FEATURE_COLUMNS_FILE),
            dimensions: None,
        }
    }

    /// Read a `DataFiles` JSON document; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    #[must_use]
    pub fn with_dimensions<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dimensions = Some(path.into());
        self
    }
}
