//! Scalar distance kernels.
//!
//! Pure functions over equal-length `f32` slices. Behavior is undefined
//! when lengths differ; the database dimension check prevents that
//! upstream.

/// Calculate the Euclidean (L2) distance between two vectors.
#[inline]
#[must_use]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

/// Calculate the Manhattan (L1) distance between two vectors.
#[inline]
#[must_use]
pub fn manhattan_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Calculate the Hamming distance between two vectors.
///
/// Components are compared with exact float inequality.
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)] // Component counts are far below f32 precision limits
pub fn hamming_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).filter(|(x, y)| x != y).count() as f32
}

/// Calculate the dot product between two vectors.
#[inline]
#[must_use]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Calculate the L2 norm (magnitude) of a vector.
#[inline]
#[must_use]
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Calculate the cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 means identical direction, 0 means
/// orthogonal, and -1 means opposite direction. The raw quotient is clamped
/// to [-1, 1] to absorb floating point rounding. Returns 0.0 if either
/// vector has zero magnitude.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let dot = dot_product(a, b);
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Calculate the cosine distance between two vectors.
///
/// Cosine distance = 1 - cosine similarity. Zero-magnitude vectors are at
/// maximum distance (1.0) from everything.
#[inline]
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - cosine_similarity(a, b)
}
