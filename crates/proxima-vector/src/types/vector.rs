//! The identified vector type.

use serde::{Deserialize, Serialize};

/// Opaque attribute map attached to a vector.
///
/// Keys are strings; values are arbitrary JSON scalars, strings, booleans,
/// or nested maps. The engine preserves metadata through persistence but
/// never interprets it during search.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// An identified point in a vector database.
///
/// A vector is immutable once inserted: reinserting under the same id is
/// rejected by the index.
///
/// # Example
///
/// ```
/// use proxima_vector::types::Vector;
///
/// let v = Vector::new("doc-1", vec![0.1, 0.2, 0.3]);
/// assert_eq!(v.dimension(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Stable identifier, unique within a database.
    pub id: String,
    /// Dense vector data.
    pub data: Vec<f32>,
    /// Opaque attribute map, preserved through snapshotting.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Vector {
    /// Create a new vector with empty metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, data: Vec<f32>) -> Self {
        Self { id: id.into(), data, metadata: Metadata::new() }
    }

    /// Attach a metadata map to this vector.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The number of components in the vector data.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.data.len()
    }
}
