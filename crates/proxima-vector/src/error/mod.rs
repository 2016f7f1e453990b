//! Error types for the vector crate.

use thiserror::Error;

/// Errors that can occur in vector and index operations.
#[derive(Debug, Error)]
pub enum VectorError {
    /// A vector data array or query was empty.
    #[error("vector is empty")]
    EmptyVector,

    /// Two vectors given to an arithmetic operation differ in length.
    #[error("vectors have different dimensions: {expected} and {actual}")]
    DifferentDimensions {
        /// Length of the first operand.
        expected: usize,
        /// Length of the second operand.
        actual: usize,
    },

    /// An invalid parameter was provided (empty id, zero `k`, zero
    /// hyperparameter).
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// A vector with this id is already present in the index.
    #[error("vector with id '{0}' already exists")]
    Duplicate(String),

    /// Lock poisoned - indicates a panic in another thread corrupted the
    /// index.
    ///
    /// This error is unrecoverable - the index must be dropped and rebuilt.
    #[error("index corrupted: lock poisoned due to prior panic in another thread")]
    LockPoisoned,
}
