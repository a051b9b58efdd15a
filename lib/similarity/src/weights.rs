//! Per-request dimension weights
//!
//! Weights live for a single ranking computation. Each weight must be a finite
//! value in `[0, 1]`; the total is advisory only and is never forced to 1.

use salesim_core::{DimensionRegistry, Error, Result};
use serde::Serialize;

/// Tolerance used by [`Weights::is_normalized`].
pub const NORMALIZATION_TOLERANCE: f64 = 0.001;

/// Ordered `dimension key -> weight` assignment.
///
/// Insertion order is kept so that weighted sums are always accumulated in
/// the same order for the same request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Weights {
    entries: Vec<(String, f64)>,
}

impl Weights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(dimension, weight)` pairs; dimensions may be keys or labels.
    pub fn from_pairs<I, S>(registry: &DimensionRegistry, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut weights = Self::new();
        for (dimension, weight) in pairs {
            weights.set(registry, dimension.as_ref(), weight)?;
        }
        Ok(weights)
    }

    /// Same weight `1 / n` for each of the `n` given dimensions.
    pub fn uniform<S: AsRef<str>>(registry: &DimensionRegistry, dimensions: &[S]) -> Result<Self> {
        if dimensions.is_empty() {
            return Ok(Self::new());
        }
        let share = 1.0 / dimensions.len() as f64;
        Self::from_pairs(registry, dimensions.iter().map(|d| (d.as_ref(), share)))
    }

    /// Weight `1.0` on one dimension, nothing else.
    pub fn single(registry: &DimensionRegistry, dimension: &str) -> Result<Self> {
        Self::from_pairs(registry, [(dimension, 1.0)])
    }

    /// Assign a weight, replacing any previous weight for the same dimension.
    pub fn set(&mut self, registry: &DimensionRegistry, dimension: &str, weight: f64) -> Result<()> {
        let key = registry.resolve(dimension)?.key.clone();
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(Error::InvalidWeight {
                dimension: key,
                weight,
            });
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((key, weight)),
        }
        Ok(())
    }

    /// Weight of a dimension key, `0.0` when unassigned.
    pub fn get(&self, key: &str) -> f64 {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Whether the weights sum to 1 within [`NORMALIZATION_TOLERANCE`].
    pub fn is_normalized(&self) -> bool {
        (self.total() - 1.0).abs() <= NORMALIZATION_TOLERANCE
    }

    /// Copy scaled so the weights sum to 1. A zero total is returned unchanged.
    ///
    /// The engine never calls this; callers opt in explicitly.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return self.clone();
        }
        Self {
            entries: self
                .entries
                .iter()
                .map(|(k, w)| (k.clone(), w / total))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_accepts_labels_and_keys() {
        let registry = DimensionRegistry::builtin();
        let weights = Weights::from_pairs(&registry, [("Location", 0.6), ("pricing", 0.4)]).unwrap();
        assert_eq!(weights.get("location"), 0.6);
        assert_eq!(weights.get("pricing"), 0.4);
        assert_eq!(weights.get("wellness"), 0.0);
        assert!(weights.is_normalized());
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let registry = DimensionRegistry::builtin();
        assert!(matches!(
            Weights::from_pairs(&registry, [("location", 1.2)]),
            Err(Error::InvalidWeight { .. })
        ));
        assert!(matches!(
            Weights::from_pairs(&registry, [("location", -0.1)]),
            Err(Error::InvalidWeight { .. })
        ));
        assert!(Weights::from_pairs(&registry, [("location", f64::NAN)]).is_err());
    }

    #[test]
    fn test_unknown_dimension_rejected() {
        let registry = DimensionRegistry::builtin();
        assert!(matches!(
            Weights::single(&registry, "Nonexistent"),
            Err(Error::UnknownDimension(_))
        ));
    }

    #[test]
    fn test_set_replaces() {
        let registry = DimensionRegistry::builtin();
        let mut weights = Weights::new();
        weights.set(&registry, "location", 0.2).unwrap();
        weights.set(&registry, "Location", 0.7).unwrap();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights.get("location"), 0.7);
    }

    #[test]
    fn test_not_normalized_is_kept_as_is() {
        let registry = DimensionRegistry::builtin();
        let weights = Weights::from_pairs(&registry, [("location", 1.0), ("pricing", 1.0)]).unwrap();
        assert!(!weights.is_normalized());
        assert_eq!(weights.total(), 2.0);

        let normalized = weights.normalized();
        assert!(normalized.is_normalized());
        assert_eq!(normalized.get("pricing"), 0.5);
    }

    #[test]
    fn test_uniform() {
        let registry = DimensionRegistry::builtin();
        let weights = Weights::uniform(&registry, &["Location", "Pricing", "Stay Type", "Family"]).unwrap();
        assert_eq!(weights.get("family"), 0.25);
        assert!(weights.is_normalized());
        assert!(Weights::uniform::<&str>(&registry, &[]).unwrap().is_empty());
    }
}
