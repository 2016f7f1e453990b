//! Proxima
//!
//! An in-memory approximate-nearest-neighbor vector database. Clients
//! create named databases, each bound to a dimensionality and distance
//! metric, insert identified vectors, and issue k-nearest-neighbor
//! queries answered by an HNSW index with sub-linear latency.
//!
//! # Overview
//!
//! - [`Manager`] owns the set of named databases and routes operations.
//! - [`Database`] binds a name, a [`DatabaseConfig`], and one HNSW index
//!   over its vectors.
//! - [`SnapshotStore`] persists each database as a directory of JSON
//!   documents and restores it with the graph rebuilt.
//! - [`SnapshotScheduler`] drives periodic snapshot passes from a
//!   background thread.
//! - [`Config`] is the application configuration surface consumed by
//!   external collaborators (servers, CLIs).
//!
//! # Example
//!
//! ```
//! use proxima::{HnswConfig, Manager, Vector};
//!
//! let manager = Manager::new();
//! manager.create_database("words", HnswConfig::new(2).into())?;
//!
//! manager.add_vector("words", Vector::new("origin", vec![0.0, 0.0]))?;
//! manager.add_vector("words", Vector::new("east", vec![1.0, 0.0]))?;
//!
//! let nearest = manager.search("words", &[0.1, 0.0], 1)?;
//! assert_eq!(nearest[0].id, "origin");
//! # Ok::<(), proxima::Error>(())
//! ```
//!
//! # Concurrency
//!
//! All types are internally synchronized and safe to share behind `Arc`.
//! Locks nest manager → database/index → snapshot store, mutations take
//! writer locks, and a search that begins after an insert completes
//! observes the inserted vector.

pub mod config;
pub mod database;
pub mod error;
pub mod manager;
pub mod scheduler;
pub mod snapshot;

// Re-export commonly used types
pub use config::{Config, DatabaseConfig, LogLevel, ServerConfig, StorageConfig};
pub use database::Database;
pub use error::{Error, Result};
pub use manager::Manager;
pub use scheduler::{save_all, SnapshotScheduler};
pub use snapshot::SnapshotStore;

// Re-export the index engine's core types
pub use proxima_vector::{DistanceMetric, HnswConfig, HnswIndex, Vector, VectorError};
