//! Vector arithmetic.
//!
//! Element-wise operations over dense vectors, used for embedding algebra
//! (e.g. analogy queries of the form `king - man + woman`). Operations that
//! combine two vectors check dimensions and fail with
//! [`VectorError::DifferentDimensions`]; single-vector operations are
//! infallible.

use crate::distance;
use crate::error::VectorError;

fn check_dimensions(a: &[f32], b: &[f32]) -> Result<(), VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::DifferentDimensions { expected: a.len(), actual: b.len() });
    }
    Ok(())
}

/// Add two vectors element-wise.
///
/// # Errors
///
/// Returns [`VectorError::DifferentDimensions`] if the lengths differ.
pub fn add(a: &[f32], b: &[f32]) -> Result<Vec<f32>, VectorError> {
    check_dimensions(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x + y).collect())
}

/// Subtract vector `b` from vector `a` element-wise.
///
/// # Errors
///
/// Returns [`VectorError::DifferentDimensions`] if the lengths differ.
pub fn subtract(a: &[f32], b: &[f32]) -> Result<Vec<f32>, VectorError> {
    check_dimensions(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x - y).collect())
}

/// Compute the dot product of two vectors.
///
/// # Errors
///
/// Returns [`VectorError::DifferentDimensions`] if the lengths differ.
pub fn dot_product(a: &[f32], b: &[f32]) -> Result<f32, VectorError> {
    check_dimensions(a, b)?;
    Ok(distance::dot_product(a, b))
}

/// Compute the cosine similarity of two vectors.
///
/// Returns a value in [-1, 1]; zero-magnitude operands yield 0.
///
/// # Errors
///
/// Returns [`VectorError::DifferentDimensions`] if the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, VectorError> {
    check_dimensions(a, b)?;
    Ok(distance::cosine_similarity(a, b))
}

/// Normalize a vector to unit length in place.
///
/// A zero vector is left untouched.
pub fn normalize(v: &mut [f32]) {
    let norm = distance::l2_norm(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Compute the magnitude (L2 norm) of a vector.
#[inline]
#[must_use]
pub fn magnitude(v: &[f32]) -> f32 {
    distance::l2_norm(v)
}

/// Multiply a vector by a scalar, returning a new vector.
#[must_use]
pub fn scalar_multiply(v: &[f32], scalar: f32) -> Vec<f32> {
    v.iter().map(|x| x * scalar).collect()
}
