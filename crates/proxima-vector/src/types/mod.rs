//! Core types for vector storage.
//!
//! - [`Vector`] - An identified vector with opaque metadata
//! - [`Metadata`] - The attribute map attached to a vector

mod vector;

pub use vector::{Metadata, Vector};
