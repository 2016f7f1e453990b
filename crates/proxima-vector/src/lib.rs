//! Proxima Vector
//!
//! This crate provides the vector index engine for Proxima: identified
//! vectors, distance kernels, vector arithmetic, and an in-memory HNSW
//! (Hierarchical Navigable Small World) index for approximate
//! nearest-neighbor search.
//!
//! # Overview
//!
//! - **Vectors**: An identified point — a stable string id, dense `f32`
//!   data, and an opaque metadata map preserved through persistence.
//! - **Distance kernels**: Euclidean, cosine, Manhattan, and Hamming
//!   distances over equal-length `f32` slices.
//! - **HNSW index**: A layered proximity graph supporting insertion and
//!   k-nearest-neighbor queries with sub-linear latency.
//!
//! # Example
//!
//! ```
//! use proxima_vector::index::{HnswConfig, HnswIndex};
//! use proxima_vector::types::Vector;
//!
//! let index = HnswIndex::new(HnswConfig::new(3));
//! index.insert(Vector::new("a", vec![1.0, 2.0, 3.0]))?;
//! index.insert(Vector::new("b", vec![4.0, 5.0, 6.0]))?;
//!
//! let results = index.search(&[1.0, 2.0, 3.0], 1)?;
//! assert_eq!(results[0].id, "a");
//! # Ok::<(), proxima_vector::VectorError>(())
//! ```
//!
//! # Modules
//!
//! - [`types`] - Core types ([`Vector`])
//! - [`distance`] - Distance metrics and kernels
//! - [`ops`] - Vector arithmetic (embedding algebra)
//! - [`index`] - The HNSW index
//! - [`error`] - Error types

pub mod distance;
pub mod error;
pub mod index;
pub mod ops;
pub mod types;

// Re-export commonly used types
pub use distance::DistanceMetric;
pub use error::VectorError;
pub use index::{HnswConfig, HnswIndex};
pub use types::Vector;
