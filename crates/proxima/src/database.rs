//! A single named vector database.

use std::collections::HashMap;

use proxima_vector::index::HnswIndex;
use proxima_vector::types::Vector;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// A named vector database: a dimensionality and metric fixed at creation,
/// an identity map `id -> Vector`, and the HNSW index built over it.
///
/// The identity map lives inside the index so that insertion validates and
/// mutates map and graph atomically under one writer lock - a rejected
/// insert (duplicate id, empty data) leaves both untouched.
///
/// All methods take `&self`; the index synchronizes internally.
pub struct Database {
    name: String,
    config: DatabaseConfig,
    index: HnswIndex,
}

impl Database {
    /// Create an empty database.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if any HNSW hyperparameter is zero.
    pub fn new(name: impl Into<String>, config: DatabaseConfig) -> Result<Self> {
        config.hnsw.validate()?;
        let index = HnswIndex::new(config.hnsw.clone());
        Ok(Self { name: name.into(), config, index })
    }

    /// The database name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration this database was created with.
    #[must_use]
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// The underlying HNSW index.
    #[must_use]
    pub fn index(&self) -> &HnswIndex {
        &self.index
    }

    /// Insert a vector.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if the data length differs from the
    ///   configured dimensionality.
    /// - [`Error::Index`] for index-level rejections (duplicate id, empty
    ///   id).
    pub fn add_vector(&self, vector: Vector) -> Result<()> {
        self.check_dimensions(vector.data.len())?;
        self.index.insert(vector)?;
        Ok(())
    }

    /// Look up a stored vector by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VectorNotFound`] if the id is absent.
    pub fn get_vector(&self, id: &str) -> Result<Vector> {
        self.index.get(id)?.ok_or_else(|| Error::VectorNotFound(id.to_string()))
    }

    /// Remove a vector from the identity map.
    ///
    /// The HNSW graph is not updated: edges referencing the id remain and
    /// searches skip it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VectorNotFound`] if the id is absent.
    pub fn delete_vector(&self, id: &str) -> Result<()> {
        match self.index.remove(id)? {
            Some(_) => Ok(()),
            None => Err(Error::VectorNotFound(id.to_string())),
        }
    }

    /// Find up to `k` stored vectors nearest to `query`, ordered by
    /// ascending distance.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if the query length differs from the
    ///   configured dimensionality.
    /// - [`Error::Index`] for index-level rejections (zero `k`).
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Vector>> {
        self.check_dimensions(query.len())?;
        Ok(self.index.search(query, k)?)
    }

    /// The number of stored vectors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Index`] if the index lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.index.len()?)
    }

    /// Whether the database holds no vectors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Index`] if the index lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.index.is_empty()?)
    }

    /// A consistent snapshot of the identity map, for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Index`] if the index lock is poisoned.
    pub fn vectors(&self) -> Result<HashMap<String, Vector>> {
        Ok(self.index.vectors()?)
    }

    fn check_dimensions(&self, actual: usize) -> Result<()> {
        let expected = self.config.hnsw.dimensions;
        if actual != expected {
            return Err(Error::InvalidDimensions { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proxima_vector::index::HnswConfig;
    use proxima_vector::VectorError;

    use super::*;

    fn test_db(dimensions: usize) -> Database {
        Database::new("test", DatabaseConfig::new(HnswConfig::new(dimensions))).unwrap()
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let result = Database::new("bad", DatabaseConfig::new(HnswConfig::new(0)));
        assert!(matches!(result, Err(Error::Index(VectorError::InvalidParameter(_)))));
    }

    #[test]
    fn test_add_and_get_vector() {
        let db = test_db(3);
        db.add_vector(Vector::new("a", vec![1.0, 2.0, 3.0])).unwrap();

        let fetched = db.get_vector("a").unwrap();
        assert_eq!(fetched.data, vec![1.0, 2.0, 3.0]);
        assert_eq!(db.len().unwrap(), 1);
    }

    #[test]
    fn test_dimension_mismatch_on_insert() {
        let db = test_db(4);
        let result = db.add_vector(Vector::new("a", vec![1.0, 2.0, 3.0]));
        assert!(matches!(
            result,
            Err(Error::InvalidDimensions { expected: 4, actual: 3 })
        ));
        assert!(db.is_empty().unwrap());
    }

    #[test]
    fn test_dimension_mismatch_on_search() {
        let db = test_db(4);
        let result = db.search(&[1.0, 2.0], 1);
        assert!(matches!(
            result,
            Err(Error::InvalidDimensions { expected: 4, actual: 2 })
        ));
    }

    #[test]
    fn test_duplicate_insert_leaves_map_and_graph_consistent() {
        let db = test_db(2);
        db.add_vector(Vector::new("x", vec![1.0, 1.0])).unwrap();

        let result = db.add_vector(Vector::new("x", vec![2.0, 2.0]));
        assert!(matches!(result, Err(Error::Index(VectorError::Duplicate(_)))));

        // Exactly one "x", holding the original data.
        assert_eq!(db.len().unwrap(), 1);
        assert_eq!(db.get_vector("x").unwrap().data, vec![1.0, 1.0]);
        assert_eq!(db.search(&[1.0, 1.0], 5).unwrap().len(), 1);
    }

    #[test]
    fn test_get_missing_vector() {
        let db = test_db(2);
        assert!(matches!(db.get_vector("ghost"), Err(Error::VectorNotFound(_))));
    }

    #[test]
    fn test_delete_vector_identity_map_only() {
        let db = test_db(2);
        db.add_vector(Vector::new("a", vec![0.0, 0.0])).unwrap();
        db.add_vector(Vector::new("b", vec![1.0, 0.0])).unwrap();

        db.delete_vector("a").unwrap();
        assert!(matches!(db.get_vector("a"), Err(Error::VectorNotFound(_))));
        assert!(matches!(db.delete_vector("a"), Err(Error::VectorNotFound(_))));

        // The graph still references "a" but search never returns it.
        let results = db.search(&[0.0, 0.0], 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "b");
    }

    #[test]
    fn test_search_empty_database() {
        let db = test_db(2);
        assert!(db.search(&[0.0, 0.0], 5).unwrap().is_empty());
    }
}
