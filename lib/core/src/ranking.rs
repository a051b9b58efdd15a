//! Precomputed ranking table
//!
//! Holds one row per `(sale, peer, dimension)` with the upstream similarity
//! score and rank. Rows are grouped per focal sale and per dimension at build
//! time; within a group they are ordered by the stored rank, with ties kept in
//! source order.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, SaleId};

/// One precomputed pairwise row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    #[serde(rename = "sale_uid")]
    pub sale_id: SaleId,
    #[serde(rename = "similar_sale_uid")]
    pub peer_id: SaleId,
    /// Dimension key
    pub dimension: String,
    pub similarity: f64,
    pub rank: u32,
}

impl RankingRow {
    pub fn new(
        sale_id: impl Into<SaleId>,
        peer_id: impl Into<SaleId>,
        dimension: impl Into<String>,
        similarity: f64,
        rank: u32,
    ) -> Self {
        Self {
            sale_id: sale_id.into(),
            peer_id: peer_id.into(),
            dimension: dimension.into(),
            similarity,
            rank,
        }
    }

    /// Check the row-level invariants: similarity in `[0, 1]`, rank >= 1.
    pub fn check(&self) -> std::result::Result<(), String> {
        if !self.similarity.is_finite() || !(0.0..=1.0).contains(&self.similarity) {
            return Err(format!(
                "similarity {} for ({}, {}, {}) is outside [0, 1]",
                self.similarity, self.sale_id, self.peer_id, self.dimension
            ));
        }
        if self.rank < 1 {
            return Err(format!(
                "rank must be >= 1 for ({}, {}, {})",
                self.sale_id, self.peer_id, self.dimension
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct DimensionRows {
    rows: Vec<RankingRow>,
    by_peer: AHashMap<SaleId, usize>,
}

#[derive(Debug, Clone, Default)]
struct FocalRows {
    peer_order: Vec<SaleId>,
    dimensions: AHashMap<String, DimensionRows>,
}

/// Read-only index over all ranking rows.
#[derive(Debug, Clone, Default)]
pub struct RankingTable {
    focals: AHashMap<SaleId, FocalRows>,
    dimension_keys: Vec<String>,
    row_count: usize,
}

impl RankingTable {
    /// Index rows, rejecting invalid rows and duplicated `(sale, peer, dimension)` triples.
    pub fn new(rows: impl IntoIterator<Item = RankingRow>) -> Result<Self> {
        let mut table = RankingTable::default();
        let mut seen_dimensions = AHashSet::new();
        let mut seen_peers: AHashMap<SaleId, AHashSet<SaleId>> = AHashMap::new();

        for (idx, row) in rows.into_iter().enumerate() {
            row.check()
                .map_err(|msg| Error::load_at("ranking rows", idx + 1, msg))?;

            if seen_dimensions.insert(row.dimension.clone()) {
                table.dimension_keys.push(row.dimension.clone());
            }

            let focal = table.focals.entry(row.sale_id.clone()).or_default();
            if seen_peers
                .entry(row.sale_id.clone())
                .or_default()
                .insert(row.peer_id.clone())
            {
                focal.peer_order.push(row.peer_id.clone());
            }

            let group = focal.dimensions.entry(row.dimension.clone()).or_default();
            if group.by_peer.contains_key(&row.peer_id) {
                return Err(Error::load_at(
                    "ranking rows",
                    idx + 1,
                    format!(
                        "duplicate row for ({}, {}, {})",
                        row.sale_id, row.peer_id, row.dimension
                    ),
                ));
            }
            group.by_peer.insert(row.peer_id.clone(), group.rows.len());
            group.rows.push(row);
            table.row_count += 1;
        }

        for focal in table.focals.values_mut() {
            for group in focal.dimensions.values_mut() {
                // Stable: equal stored ranks keep source order.
                group.rows.sort_by_key(|r| r.rank);
                group.by_peer = group
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(pos, r)| (r.peer_id.clone(), pos))
                    .collect();
            }
        }

        Ok(table)
    }

    /// Rows of `sale_id` for one dimension, ordered by stored rank.
    ///
    /// `None` when the sale has no row for that dimension.
    pub fn rows_for(&self, sale_id: &str, dimension: &str) -> Option<&[RankingRow]> {
        self.focals
            .get(sale_id)
            .and_then(|f| f.dimensions.get(dimension))
            .map(|g| g.rows.as_slice())
    }

    /// Similarity of `(sale_id, peer_id)` in a dimension, if a row exists.
    pub fn similarity(&self, sale_id: &str, peer_id: &str, dimension: &str) -> Option<f64> {
        let group = self.focals.get(sale_id)?.dimensions.get(dimension)?;
        group.by_peer.get(peer_id).map(|&pos| group.rows[pos].similarity)
    }

    /// Peers of a sale in the order they first appear in the source rows.
    pub fn peers_of(&self, sale_id: &str) -> Option<&[SaleId]> {
        self.focals.get(sale_id).map(|f| f.peer_order.as_slice())
    }

    #[inline]
    pub fn has_sale(&self, sale_id: &str) -> bool {
        self.focals.contains_key(sale_id)
    }

    /// Dimension keys present in the table, in first-seen order.
    pub fn dimension_keys(&self) -> &[String] {
        &self.dimension_keys
    }

    /// Number of focal sales.
    pub fn sale_count(&self) -> usize {
        self.focals.len()
    }

    /// Total number of rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}
