//! HNSW index configuration.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::error::VectorError;

/// Configuration parameters for an HNSW index.
///
/// # Parameters
///
/// * `dimensions` - The fixed dimensionality of every vector in the index.
///
/// * `m` - Maximum number of connections per node in each layer.
///   Recommended values: 5-48. Higher values give better recall but use
///   more memory.
///
/// * `ef_construction` - Width of the dynamic candidate list during
///   insertion. Recommended values: 100-200. Higher values give better
///   graph quality but slower construction.
///
/// * `ef_search` - Width of the dynamic candidate list during search.
///   Should be at least `k`; higher values trade latency for recall.
///
/// * `distance_type` - The distance metric vectors are compared with.
///
/// The serialized form matches the on-disk `config.json` layout, with
/// `distance_type` encoded as an integer tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Vector dimensionality.
    pub dimensions: usize,
    /// Maximum connections per node per layer (M parameter).
    #[serde(default = "default_m")]
    pub m: usize,
    /// Candidate-list width during insertion.
    #[serde(default = "default_ef_construction")]
    pub ef_construction: usize,
    /// Candidate-list width during search.
    #[serde(default = "default_ef_search")]
    pub ef_search: usize,
    /// The distance metric.
    #[serde(default)]
    pub distance_type: DistanceMetric,
}

fn default_m() -> usize {
    16
}

fn default_ef_construction() -> usize {
    200
}

fn default_ef_search() -> usize {
    100
}

impl HnswConfig {
    /// Create a configuration for the given dimensionality with default
    /// hyperparameters (M=16, ef_construction=200, ef_search=100,
    /// Euclidean).
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            m: default_m(),
            ef_construction: default_ef_construction(),
            ef_search: default_ef_search(),
            distance_type: DistanceMetric::Euclidean,
        }
    }

    /// Set the neighbor cap per layer.
    #[must_use]
    pub const fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    /// Set the candidate-list width for insertion.
    #[must_use]
    pub const fn with_ef_construction(mut self, ef: usize) -> Self {
        self.ef_construction = ef;
        self
    }

    /// Set the candidate-list width for search.
    #[must_use]
    pub const fn with_ef_search(mut self, ef: usize) -> Self {
        self.ef_search = ef;
        self
    }

    /// Set the distance metric.
    #[must_use]
    pub const fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_type = metric;
        self
    }

    /// Check that every hyperparameter is positive.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidParameter`] naming the offending field.
    pub fn validate(&self) -> Result<(), VectorError> {
        if self.dimensions == 0 {
            return Err(VectorError::InvalidParameter("dimensions must be positive"));
        }
        if self.m == 0 {
            return Err(VectorError::InvalidParameter("m must be positive"));
        }
        if self.ef_construction == 0 {
            return Err(VectorError::InvalidParameter("ef_construction must be positive"));
        }
        if self.ef_search == 0 {
            return Err(VectorError::InvalidParameter("ef_search must be positive"));
        }
        Ok(())
    }

    /// The level-generation normalization constant `1 / ln(M)`.
    ///
    /// When `M == 1` the constant is 1.0, avoiding division by `ln(1) = 0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // m is small, no precision loss
    pub fn level_multiplier(&self) -> f64 {
        if self.m > 1 {
            1.0 / (self.m as f64).ln()
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hyperparameters() {
        let config = HnswConfig::new(128);
        assert_eq!(config.dimensions, 128);
        assert_eq!(config.m, 16);
        assert_eq!(config.ef_construction, 200);
        assert_eq!(config.ef_search, 100);
        assert_eq!(config.distance_type, DistanceMetric::Euclidean);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = HnswConfig::new(64)
            .with_m(32)
            .with_ef_construction(400)
            .with_ef_search(200)
            .with_metric(DistanceMetric::Cosine);

        assert_eq!(config.m, 32);
        assert_eq!(config.ef_construction, 400);
        assert_eq!(config.ef_search, 200);
        assert_eq!(config.distance_type, DistanceMetric::Cosine);
    }

    #[test]
    fn test_validate_rejects_zero_parameters() {
        assert!(HnswConfig::new(0).validate().is_err());
        assert!(HnswConfig::new(4).with_m(0).validate().is_err());
        assert!(HnswConfig::new(4).with_ef_construction(0).validate().is_err());
        assert!(HnswConfig::new(4).with_ef_search(0).validate().is_err());
    }

    #[test]
    fn test_level_multiplier() {
        let config = HnswConfig::new(4).with_m(16);
        assert!((config.level_multiplier() - 1.0 / 16_f64.ln()).abs() < 1e-10);

        // M=1 uses 1.0 rather than dividing by ln(1).
        let config = HnswConfig::new(4).with_m(1);
        assert!((config.level_multiplier() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_serde_matches_on_disk_layout() {
        let config = HnswConfig::new(8).with_metric(DistanceMetric::Hamming);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["dimensions"], 8);
        assert_eq!(json["m"], 16);
        assert_eq!(json["ef_construction"], 200);
        assert_eq!(json["ef_search"], 100);
        assert_eq!(json["distance_type"], 3);

        let parsed: HnswConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_serde_missing_fields_use_defaults() {
        let parsed: HnswConfig = serde_json::from_str(r#"{"dimensions": 42}"#).unwrap();
        assert_eq!(parsed, HnswConfig::new(42));
    }
}
