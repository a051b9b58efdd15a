//! # salesim
//!
//! Explore sales similar to a chosen sale, dimension by dimension or through a
//! single weighted ranking, and explain every match feature by feature.
//!
//! Similarity scores and ranks are computed upstream and delivered as static
//! tables; salesim selects, re-ranks, paginates and compares.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! salesim --data-dir ./data thematic --sale "Villa Azur" --dimension Location --top 1-5
//! salesim --data-dir ./data global --sale "Villa Azur" --weight Location=0.7 --weight Pricing=0.3
//! salesim --data-dir ./data explain --sale "Villa Azur" --peer fr_FR123456 --dimension all
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use salesim::prelude::*;
//!
//! let store = SnapshotStore::new(DataFiles::in_dir("data"));
//! let dataset = store.dataset().unwrap();
//!
//! let focal = dataset.catalog.resolve("Villa Azur").unwrap();
//! let engine = RankingEngine::from_dataset(&dataset);
//! let weights = Weights::from_pairs(&dataset.registry, [("Location", 0.7), ("Pricing", 0.3)]).unwrap();
//! let top = engine.rank_weighted(focal.as_str(), &weights, RankWindow::default()).unwrap();
//!
//! let comparator = FeatureComparator::from_dataset(&dataset);
//! let why = comparator.diff(focal.as_str(), top[0].peer_id.as_str(), &Scope::All).unwrap();
//! println!("shared: {:?}", why.shared);
//! ```
//!
//! ## Crate Structure
//!
//! - `salesim-core` - Data model (SaleId, DimensionRegistry, Catalog, FeatureStore, RankingTable)
//! - `salesim-similarity` - Ranking engine, weights and feature comparator
//! - `salesim-storage` - Snapshot loading and caching

pub mod present;

// Re-export core types
pub use salesim_core::{
    Catalog, CatalogEntry, Dataset, Dimension, DimensionRegistry, Error, FeatureStore,
    FeatureVector, RankWindow, RankingRow, RankingTable, Result, SaleId, GLOBAL_EMOJI, GLOBAL_LABEL,
};

// Re-export ranking and comparison
pub use salesim_similarity::{
    rank_similarity_points, DimensionRanking, Explanation, FeatureComparator, FeatureDiff,
    FeatureRow, RankSimilarityPoint, RankedPeer, RankingEngine, RankingSummary, Scope,
    WeightedPeer, Weights,
};

// Re-export storage
pub use salesim_storage::{DataFiles, LoadReport, SnapshotStore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, DataFiles, Dataset, DimensionRegistry, Error, FeatureComparator, RankWindow,
        RankingEngine, Result, SaleId, Scope, SnapshotStore, Weights,
    };
}
