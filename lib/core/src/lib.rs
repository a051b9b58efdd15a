//! # salesim Core
//!
//! Core data model for salesim, the similar-sale explorer.
//!
//! This crate provides the read-only tables every ranking and comparison
//! request works over:
//!
//! - [`SaleId`] - Sale identifier with locale and numeric id extraction
//! - [`DimensionRegistry`] - The single declaration of thematic dimensions
//! - [`Catalog`] - Display name <-> identifier lookup
//! - [`FeatureStore`] - Per-sale feature vectors
//! - [`RankingTable`] - Precomputed pairwise similarity and rank rows
//! - [`RankWindow`] - Inclusive rank range for paginating results
//!
//! ## Example
//!
//! ```rust
//! use salesim_core::{Catalog, CatalogEntry, RankingRow, RankingTable, RankWindow};
//!
//! let catalog = Catalog::new(vec![CatalogEntry::new("fr_FR1234", "Villa Azur")]);
//! let id = catalog.resolve("Villa Azur").unwrap();
//! assert_eq!(id.locale().unwrap(), "fr_FR");
//! assert_eq!(id.numeric_id().unwrap(), 1234);
//!
//! let table = RankingTable::new(vec![
//!     RankingRow::new("fr_FR1234", "fr_FR99", "pricing", 0.8, 1),
//! ]).unwrap();
//! let window = RankWindow::new(1, 5).unwrap();
//! let rows = table.rows_for("fr_FR1234", "pricing").unwrap();
//! assert_eq!(window.slice(rows).len(), 1);
//! ```

pub mod catalog;
pub mod dataset;
pub mod dimension;
pub mod error;
pub mod features;
pub mod ranking;
pub mod sale;
pub mod window;

pub use catalog::{Catalog, CatalogEntry};
pub use dataset::Dataset;
pub use dimension::{Dimension, DimensionRegistry, FEATURE_SEPARATOR, GLOBAL_EMOJI, GLOBAL_LABEL};
pub use error::{Error, Result};
pub use features::{FeatureStore, FeatureVector};
pub use ranking::{RankingRow, RankingTable};
pub use sale::{SaleId, LOCALE_LEN};
pub use window::{RankWindow, WINDOW_SLIDER_BOUNDS};
