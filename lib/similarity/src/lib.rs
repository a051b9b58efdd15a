//! # salesim Similarity
//!
//! Ranking and explanation over precomputed sale similarity tables.
//!
//! This crate turns the read-only tables of `salesim-core` into ordered result
//! lists and feature-level explanations.
//!
//! ## Features
//!
//! - **Thematic ranking**: peers of a sale in one dimension, in upstream rank order
//! - **Weighted global ranking**: per-request dimension weights combined into one score
//! - **Rank windows**: inclusive `[min, max]` pagination applied last
//! - **Explainability**: shared/differing features and side-by-side tables
//!
//! ## Example
//!
//! ```rust
//! use salesim_core::{DimensionRegistry, RankWindow, RankingRow, RankingTable};
//! use salesim_similarity::{RankingEngine, Weights};
//!
//! let registry = DimensionRegistry::builtin();
//! let table = RankingTable::new(vec![
//!     RankingRow::new("fr_FR1", "fr_FR2", "location", 0.8, 1),
//!     RankingRow::new("fr_FR1", "fr_FR2", "pricing", 0.9, 1),
//! ]).unwrap();
//!
//! let engine = RankingEngine::new(&registry, &table);
//! let weights = Weights::from_pairs(&registry, [("Location", 1.0), ("Pricing", 0.0)]).unwrap();
//! let results = engine.rank_weighted("fr_FR1", &weights, RankWindow::default()).unwrap();
//! assert!((results[0].weighted_similarity - 0.8).abs() < 1e-12);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────>│   Engine    │────>│  Windowed   │
//! │ (dimensions)│     │(rank/weight)│     │   results   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │                                        │
//!       │              ┌─────────────┐           │
//!       └─────────────>│ Comparator  │<──────────┘
//!                      │ (features)  │  "explain"
//!                      └─────────────┘
//! ```

pub mod compare;
pub mod engine;
pub mod explain;
pub mod weights;

pub use compare::{DimensionTable, Explanation, FeatureComparator, FeatureDiff, FeatureRow, Scope};
pub use engine::{DimensionRanking, RankedPeer, RankingEngine, WeightedPeer};
pub use explain::{rank_similarity_points, RankSimilarityPoint, RankingSummary, Scored};
pub use weights::{Weights, NORMALIZATION_TOLERANCE};
