//! Ranking engine
//!
//! Two modes over the precomputed ranking table:
//!
//! - **thematic**: one dimension, rows in the stored upstream rank order;
//! - **weighted global**: `Σ weight[d] × similarity(focal, peer, d)` over the
//!   weighted dimensions, re-ranked on every call.
//!
//! Both apply a [`RankWindow`] last. A focal sale without rows is reported as
//! [`Error::UnknownEntity`], never as an empty result.

use ordered_float::OrderedFloat;
use salesim_core::{
    Dataset, Dimension, DimensionRegistry, Error, RankWindow, RankingTable, Result, SaleId,
};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::weights::Weights;

/// A peer in a single-dimension ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPeer {
    pub peer_id: SaleId,
    pub similarity: f64,
    /// Stored upstream rank
    pub rank: u32,
}

/// A peer in the weighted global ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedPeer {
    pub peer_id: SaleId,
    pub weighted_similarity: f64,
    /// 1-based position in the weighted order
    pub rank: u32,
    /// Weighted contribution of each weighted dimension, by key
    pub contributions: BTreeMap<String, f64>,
}

/// Thematic results for one dimension.
#[derive(Debug, Clone, Serialize)]
pub struct DimensionRanking {
    pub dimension: String,
    pub label: String,
    pub emoji: String,
    pub results: Vec<RankedPeer>,
}

/// Ranking engine over an immutable registry and ranking table.
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine<'a> {
    registry: &'a DimensionRegistry,
    table: &'a RankingTable,
}

impl<'a> RankingEngine<'a> {
    pub fn new(registry: &'a DimensionRegistry, table: &'a RankingTable) -> Self {
        Self { registry, table }
    }

    pub fn from_dataset(dataset: &'a Dataset) -> Self {
        Self::new(&dataset.registry, &dataset.rankings)
    }

    pub fn registry(&self) -> &DimensionRegistry {
        self.registry
    }

    /// Peers of `focal_id` in one dimension, ordered by stored rank and
    /// sliced to `window`.
    pub fn rank_by_dimension(
        &self,
        focal_id: &str,
        dimension: &str,
        window: RankWindow,
    ) -> Result<Vec<RankedPeer>> {
        let dimension = self.registry.get(dimension)?;
        self.rank_dimension(focal_id, dimension, window)
    }

    fn rank_dimension(
        &self,
        focal_id: &str,
        dimension: &Dimension,
        window: RankWindow,
    ) -> Result<Vec<RankedPeer>> {
        let rows = self
            .table
            .rows_for(focal_id, &dimension.key)
            .ok_or_else(|| Error::UnknownEntity(focal_id.to_string()))?;

        let results: Vec<RankedPeer> = window
            .slice(rows)
            .iter()
            .map(|row| RankedPeer {
                peer_id: row.peer_id.clone(),
                similarity: row.similarity,
                rank: row.rank,
            })
            .collect();

        debug!(
            focal = focal_id,
            dimension = %dimension.key,
            window = %window,
            available = rows.len(),
            returned = results.len(),
            "thematic ranking"
        );
        Ok(results)
    }

    /// Thematic rankings for several dimensions (keys or labels), in the
    /// order given. Repeated dimensions are ranked once.
    pub fn rank_thematic<S: AsRef<str>>(
        &self,
        focal_id: &str,
        dimensions: &[S],
        window: RankWindow,
    ) -> Result<Vec<DimensionRanking>> {
        let mut rankings: Vec<DimensionRanking> = Vec::with_capacity(dimensions.len());
        for requested in dimensions {
            let dimension = self.registry.resolve(requested.as_ref())?;
            if rankings.iter().any(|r| r.dimension == dimension.key) {
                continue;
            }
            rankings.push(DimensionRanking {
                dimension: dimension.key.clone(),
                label: dimension.label.clone(),
                emoji: dimension.emoji.clone(),
                results: self.rank_dimension(focal_id, dimension, window)?,
            });
        }
        Ok(rankings)
    }

    /// Weighted global ranking of the peers of `focal_id`.
    ///
    /// Weights are used as supplied. Peers with equal weighted similarity keep
    /// the order in which they first appear in the ranking table. With no
    /// weights every peer scores 0 and the result is that source order.
    pub fn rank_weighted(
        &self,
        focal_id: &str,
        weights: &Weights,
        window: RankWindow,
    ) -> Result<Vec<WeightedPeer>> {
        for (key, _) in weights.iter() {
            self.registry.get(key)?;
        }
        if !weights.is_empty() && !weights.is_normalized() {
            warn!(total = weights.total(), "dimension weights do not sum to 1; using them as supplied");
        }

        let peers = self
            .table
            .peers_of(focal_id)
            .ok_or_else(|| Error::UnknownEntity(focal_id.to_string()))?;

        let mut scored: Vec<WeightedPeer> = Vec::with_capacity(peers.len());
        for peer in peers {
            let mut contributions = BTreeMap::new();
            let mut total = 0.0;
            let mut has_row = weights.is_empty();
            for (key, weight) in weights.iter() {
                let Some(similarity) = self.table.similarity(focal_id, peer.as_str(), key) else {
                    continue;
                };
                has_row = true;
                let contribution = weight * similarity;
                total += contribution;
                contributions.insert(key.to_string(), contribution);
            }
            if has_row {
                scored.push(WeightedPeer {
                    peer_id: peer.clone(),
                    weighted_similarity: total,
                    rank: 0,
                    contributions,
                });
            }
        }

        if scored.is_empty() {
            return Err(Error::UnknownEntity(focal_id.to_string()));
        }

        // Stable sort: equal scores keep first-seen order.
        scored.sort_by_key(|p| Reverse(OrderedFloat(p.weighted_similarity)));
        for (pos, peer) in scored.iter_mut().enumerate() {
            peer.rank = pos as u32 + 1;
        }

        let results = window.slice(&scored).to_vec();
        debug!(
            focal = focal_id,
            dimensions = weights.len(),
            window = %window,
            available = scored.len(),
            returned = results.len(),
            "weighted ranking"
        );
        Ok(results)
    }
}
