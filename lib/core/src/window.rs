use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Smallest and largest rank offered by the dashboard's "Top" slider.
pub const WINDOW_SLIDER_BOUNDS: (u32, u32) = (1, 10);

/// Inclusive rank range `[min_rank, max_rank]` used to paginate results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(i64, i64)", into = "(i64, i64)")]
pub struct RankWindow {
    min_rank: usize,
    max_rank: usize,
}

impl RankWindow {
    /// Validate a window. Non-positive bounds and `min_rank > max_rank` are
    /// rejected instead of clamped.
    pub fn new(min_rank: i64, max_rank: i64) -> Result<Self> {
        if min_rank < 1 || max_rank < 1 || min_rank > max_rank {
            return Err(Error::InvalidWindow { min_rank, max_rank });
        }
        Ok(Self {
            min_rank: min_rank as usize,
            max_rank: max_rank as usize,
        })
    }

    #[inline]
    pub fn min_rank(&self) -> usize {
        self.min_rank
    }

    #[inline]
    pub fn max_rank(&self) -> usize {
        self.max_rank
    }

    #[inline]
    pub fn contains(&self, rank: usize) -> bool {
        (self.min_rank..=self.max_rank).contains(&rank)
    }

    /// Positions `[min_rank - 1, max_rank)` of an ordered slice, truncated to
    /// what is available. Empty when `min_rank` is past the end.
    pub fn slice<'a, T>(&self, ordered: &'a [T]) -> &'a [T] {
        let start = (self.min_rank - 1).min(ordered.len());
        let end = self.max_rank.min(ordered.len());
        &ordered[start..end]
    }
}

impl Default for RankWindow {
    /// The dashboard's default selection: top 1 through 5.
    fn default() -> Self {
        Self {
            min_rank: 1,
            max_rank: 5,
        }
    }
}

impl TryFrom<(i64, i64)> for RankWindow {
    type Error = Error;

    fn try_from((min_rank, max_rank): (i64, i64)) -> Result<Self> {
        Self::new(min_rank, max_rank)
    }
}

impl From<RankWindow> for (i64, i64) {
    fn from(w: RankWindow) -> Self {
        (w.min_rank as i64, w.max_rank as i64)
    }
}

impl fmt::Display for RankWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min_rank, self.max_rank)
    }
}

/// Parses `"1-5"` (or a single rank such as `"3"`).
impl FromStr for RankWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim().parse::<i64>().map_err(|_| {
                Error::InvalidConfig(format!("invalid rank window '{}': expected MIN-MAX", s))
            })
        };
        match s.split_once('-') {
            Some((min, max)) => Self::new(parse(min)?, parse(max)?),
            None => {
                let rank = parse(s)?;
                Self::new(rank, rank)
            }
        }
    }
}
