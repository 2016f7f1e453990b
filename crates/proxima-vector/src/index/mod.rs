//! The HNSW (Hierarchical Navigable Small World) index.
//!
//! - [`HnswConfig`] - Index hyperparameters
//! - [`HnswIndex`] - The index itself: insert and k-NN search
//!
//! The graph data structure and search primitives live in the private
//! `graph` module; the index drives them under its own lock.

mod config;
mod graph;
mod hnsw;

pub use config::HnswConfig;
pub use hnsw::HnswIndex;
