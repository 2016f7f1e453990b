//! Error types for the database crate.
//!
//! This module provides the [`enum@Error`] type covering every failure a
//! manager, database, or snapshot operation can surface.

use std::io;

use thiserror::Error;

use proxima_vector::VectorError;

/// Errors that can occur when operating on databases and snapshots.
#[derive(Debug, Error)]
pub enum Error {
    /// A vector or query does not match the database's dimensionality.
    #[error("invalid vector dimensions: expected {expected}, got {actual}")]
    InvalidDimensions {
        /// The database's configured dimensionality.
        expected: usize,
        /// The length that was provided.
        actual: usize,
    },

    /// No database with this name exists.
    #[error("database not found: {0}")]
    DatabaseNotFound(String),

    /// No vector with this id exists in the database.
    #[error("vector not found: {0}")]
    VectorNotFound(String),

    /// A database with this name already exists.
    #[error("database already exists: {0}")]
    DatabaseExists(String),

    /// A snapshot read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The underlying index rejected an operation.
    #[error("index error: {0}")]
    Index(#[from] VectorError),

    /// An internal lock was poisoned by a panic in another thread.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// A specialized `Result` type for database operations.
pub type Result<T> = std::result::Result<T, Error>;
