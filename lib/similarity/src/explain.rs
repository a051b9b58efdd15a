//! Result summaries
//!
//! Plain-data aggregates over ranking results for the presentation layer:
//! headline statistics and the flattened rank-vs-similarity series used for
//! charting thematic results side by side.

use serde::Serialize;

use crate::engine::{DimensionRanking, RankedPeer, WeightedPeer};

/// Anything with a similarity-like score.
pub trait Scored {
    fn score(&self) -> f64;
}

impl Scored for RankedPeer {
    fn score(&self) -> f64 {
        self.similarity
    }
}

impl Scored for WeightedPeer {
    fn score(&self) -> f64 {
        self.weighted_similarity
    }
}

/// Summary statistics for one ranked result list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingSummary {
    pub results_count: usize,
    pub best_score: f64,
    pub mean_score: f64,
    pub worst_score: f64,
}

impl RankingSummary {
    /// Compute stats from results already in rank order.
    pub fn compute<T: Scored>(results: &[T]) -> Self {
        if results.is_empty() {
            return Self {
                results_count: 0,
                best_score: 0.0,
                mean_score: 0.0,
                worst_score: 0.0,
            };
        }

        let scores: Vec<f64> = results.iter().map(Scored::score).collect();
        let mean_score = scores.iter().sum::<f64>() / scores.len() as f64;
        let best_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst_score = scores.iter().copied().fold(f64::INFINITY, f64::min);

        Self {
            results_count: results.len(),
            best_score,
            mean_score,
            worst_score,
        }
    }
}

/// One point of the rank-vs-similarity chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSimilarityPoint {
    pub dimension: String,
    pub rank: u32,
    pub similarity: f64,
}

/// Flatten thematic rankings into chart points, dimension by dimension.
pub fn rank_similarity_points(rankings: &[DimensionRanking]) -> Vec<RankSimilarityPoint> {
    rankings
        .iter()
        .flat_map(|ranking| {
            ranking.results.iter().map(move |peer| RankSimilarityPoint {
                dimension: ranking.label.clone(),
                rank: peer.rank,
                similarity: peer.similarity,
            })
        })
        .collect()
}
