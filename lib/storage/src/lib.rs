//! # salesim Storage
//!
//! Loads the immutable snapshot tables (rankings, display names, features and
//! the feature-column mapping) and caches them for the rest of the process.

pub mod config;
pub mod loader;
pub mod manager;

pub use config::DataFiles;
pub use manager::{load_dataset, LoadReport, SnapshotStore};
