//! Distance functions for vector similarity.
//!
//! This module provides the [`DistanceMetric`] enum and the scalar kernels
//! it dispatches to. All kernels operate on equal-length `f32` slices;
//! callers guarantee equal lengths through the database dimension check.

mod scalar;

pub use scalar::{
    cosine_distance, cosine_similarity, dot_product, euclidean_distance, hamming_distance,
    l2_norm, manhattan_distance,
};

/// Distance metric for comparing vectors.
///
/// Serialized as an integer tag (`0` = Euclidean, `1` = Cosine,
/// `2` = Manhattan, `3` = Hamming) to match the on-disk configuration
/// format. Unknown tags decode as Euclidean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    #[default]
    Euclidean,
    /// Cosine distance (1 - cosine similarity).
    Cosine,
    /// Manhattan (L1) distance.
    Manhattan,
    /// Hamming distance (count of differing components).
    Hamming,
}

impl DistanceMetric {
    /// Calculate the distance between two vectors using this metric.
    #[inline]
    #[must_use]
    pub fn calculate(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Euclidean => euclidean_distance(a, b),
            Self::Cosine => cosine_distance(a, b),
            Self::Manhattan => manhattan_distance(a, b),
            Self::Hamming => hamming_distance(a, b),
        }
    }

    /// Parse a metric from its lowercase name.
    ///
    /// Unknown names fall back to Euclidean, matching the configuration
    /// parsing policy.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "cosine" => Self::Cosine,
            "manhattan" => Self::Manhattan,
            "hamming" => Self::Hamming,
            _ => Self::Euclidean,
        }
    }

    /// The lowercase name of this metric.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Cosine => "cosine",
            Self::Manhattan => "manhattan",
            Self::Hamming => "hamming",
        }
    }
}

impl From<u8> for DistanceMetric {
    fn from(tag: u8) -> Self {
        match tag {
            1 => Self::Cosine,
            2 => Self::Manhattan,
            3 => Self::Hamming,
            _ => Self::Euclidean,
        }
    }
}

impl From<DistanceMetric> for u8 {
    fn from(metric: DistanceMetric) -> Self {
        match metric {
            DistanceMetric::Euclidean => 0,
            DistanceMetric::Cosine => 1,
            DistanceMetric::Manhattan => 2,
            DistanceMetric::Hamming => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_near(a: f32, b: f32, epsilon: f32) {
        assert!(
            (a - b).abs() < epsilon,
            "assertion failed: {} !~ {} (diff: {})",
            a,
            b,
            (a - b).abs()
        );
    }

    #[test]
    fn test_metric_dispatch() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];

        assert_near(DistanceMetric::Euclidean.calculate(&a, &b), 5.0, EPSILON);
        assert_near(DistanceMetric::Manhattan.calculate(&a, &b), 7.0, EPSILON);
        assert_near(DistanceMetric::Hamming.calculate(&a, &b), 2.0, EPSILON);
    }

    #[test]
    fn test_identity_distance_is_zero() {
        let v = [1.5, -2.5, 3.0];
        assert_near(DistanceMetric::Euclidean.calculate(&v, &v), 0.0, EPSILON);
        assert_near(DistanceMetric::Manhattan.calculate(&v, &v), 0.0, EPSILON);
        assert_near(DistanceMetric::Cosine.calculate(&v, &v), 0.0, EPSILON);
        assert_near(DistanceMetric::Hamming.calculate(&v, &v), 0.0, EPSILON);
    }

    #[test]
    fn test_non_negativity() {
        let a = [1.0, -3.0, 2.0];
        let b = [-4.0, 0.5, 7.0];
        assert!(DistanceMetric::Euclidean.calculate(&a, &b) >= 0.0);
        assert!(DistanceMetric::Manhattan.calculate(&a, &b) >= 0.0);
        assert!(DistanceMetric::Cosine.calculate(&a, &b) >= 0.0);
        assert!(DistanceMetric::Hamming.calculate(&a, &b) >= 0.0);
    }

    #[test]
    fn test_cosine_collinear_same_sign_is_zero() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 4.0, 6.0];
        assert_near(DistanceMetric::Cosine.calculate(&a, &b), 0.0, EPSILON);
    }

    #[test]
    fn test_cosine_zero_vector_is_max_distance() {
        let zero = [0.0, 0.0];
        let v = [1.0, 0.0];
        assert_near(DistanceMetric::Cosine.calculate(&zero, &v), 1.0, EPSILON);
        assert_near(DistanceMetric::Cosine.calculate(&zero, &zero), 1.0, EPSILON);
    }

    #[test]
    fn test_parse_unknown_falls_back_to_euclidean() {
        assert_eq!(DistanceMetric::parse("cosine"), DistanceMetric::Cosine);
        assert_eq!(DistanceMetric::parse("chebyshev"), DistanceMetric::Euclidean);
        assert_eq!(DistanceMetric::parse(""), DistanceMetric::Euclidean);
    }

    #[test]
    fn test_integer_tag_roundtrip() {
        for metric in [
            DistanceMetric::Euclidean,
            DistanceMetric::Cosine,
            DistanceMetric::Manhattan,
            DistanceMetric::Hamming,
        ] {
            let tag = u8::from(metric);
            assert_eq!(DistanceMetric::from(tag), metric);
        }
        // Unknown tags decode as Euclidean.
        assert_eq!(DistanceMetric::from(42), DistanceMetric::Euclidean);
    }

    #[test]
    fn test_serde_as_integer() {
        let json = serde_json::to_string(&DistanceMetric::Manhattan).unwrap();
        assert_eq!(json, "2");
        let metric: DistanceMetric = serde_json::from_str("1").unwrap();
        assert_eq!(metric, DistanceMetric::Cosine);
    }
}
