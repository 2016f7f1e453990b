//! The database manager.
//!
//! Owns the set of named databases and routes vector operations by
//! database name. The name map sits behind the outermost lock of the
//! hierarchy; each database synchronizes its own operations below it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use proxima_vector::types::Vector;

use crate::config::DatabaseConfig;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::snapshot::SnapshotStore;

/// Manages a set of named vector databases.
///
/// ```
/// use proxima::{HnswConfig, Manager, Vector};
///
/// let manager = Manager::new();
/// manager.create_database("embeddings", HnswConfig::new(3).into())?;
/// manager.add_vector("embeddings", Vector::new("a", vec![1.0, 2.0, 3.0]))?;
///
/// let results = manager.search("embeddings", &[1.0, 2.0, 3.0], 1)?;
/// assert_eq!(results[0].id, "a");
/// # Ok::<(), proxima::Error>(())
/// ```
#[derive(Default)]
pub struct Manager {
    databases: RwLock<HashMap<String, Arc<Database>>>,
}

impl Manager {
    /// Create a manager with no databases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new database.
    ///
    /// # Errors
    ///
    /// - [`Error::DatabaseExists`] if the name is taken.
    /// - [`Error::Index`] if the configuration has a zero hyperparameter.
    pub fn create_database(&self, name: &str, config: DatabaseConfig) -> Result<Arc<Database>> {
        let mut databases = self.databases.write().map_err(|_| Error::LockPoisoned)?;
        if databases.contains_key(name) {
            return Err(Error::DatabaseExists(name.to_string()));
        }

        let database = Arc::new(Database::new(name, config)?);
        databases.insert(name.to_string(), Arc::clone(&database));
        Ok(database)
    }

    /// Get a database by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseNotFound`] if no such database exists.
    pub fn get_database(&self, name: &str) -> Result<Arc<Database>> {
        let databases = self.databases.read().map_err(|_| Error::LockPoisoned)?;
        databases
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DatabaseNotFound(name.to_string()))
    }

    /// Remove a database by name.
    ///
    /// Only the in-memory database is dropped; any snapshot on disk is
    /// left for the snapshot store to manage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseNotFound`] if no such database exists.
    pub fn delete_database(&self, name: &str) -> Result<()> {
        let mut databases = self.databases.write().map_err(|_| Error::LockPoisoned)?;
        match databases.remove(name) {
            Some(_) => Ok(()),
            None => Err(Error::DatabaseNotFound(name.to_string())),
        }
    }

    /// The names of all databases, in arbitrary order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the name map lock is poisoned.
    pub fn list_databases(&self) -> Result<Vec<String>> {
        let databases = self.databases.read().map_err(|_| Error::LockPoisoned)?;
        Ok(databases.keys().cloned().collect())
    }

    /// Insert a vector into the named database.
    ///
    /// # Errors
    ///
    /// Routes [`Database::add_vector`] errors, or
    /// [`Error::DatabaseNotFound`].
    pub fn add_vector(&self, db_name: &str, vector: Vector) -> Result<()> {
        self.get_database(db_name)?.add_vector(vector)
    }

    /// Look up a vector in the named database.
    ///
    /// # Errors
    ///
    /// Routes [`Database::get_vector`] errors, or
    /// [`Error::DatabaseNotFound`].
    pub fn get_vector(&self, db_name: &str, vector_id: &str) -> Result<Vector> {
        self.get_database(db_name)?.get_vector(vector_id)
    }

    /// Remove a vector from the named database's identity map.
    ///
    /// # Errors
    ///
    /// Routes [`Database::delete_vector`] errors, or
    /// [`Error::DatabaseNotFound`].
    pub fn delete_vector(&self, db_name: &str, vector_id: &str) -> Result<()> {
        self.get_database(db_name)?.delete_vector(vector_id)
    }

    /// Search the named database for the `k` nearest vectors to `query`.
    ///
    /// # Errors
    ///
    /// Routes [`Database::search`] errors, or [`Error::DatabaseNotFound`].
    pub fn search(&self, db_name: &str, query: &[f32], k: usize) -> Result<Vec<Vector>> {
        self.get_database(db_name)?.search(query, k)
    }

    /// Load every database found under the snapshot store's root.
    ///
    /// Each snapshot is restored with its graph rebuilt by reinsertion.
    /// Failures are logged per database and do not abort the pass; a
    /// snapshot whose name is already taken in this manager is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] only if the snapshot root cannot be listed.
    pub fn restore_from(&self, store: &SnapshotStore) -> Result<()> {
        for name in store.list_databases()? {
            let database = match store.load_database(&name) {
                Ok(db) => db,
                Err(err) => {
                    warn!(database = %name, error = %err, "failed to load database snapshot");
                    continue;
                }
            };

            let mut databases = self.databases.write().map_err(|_| Error::LockPoisoned)?;
            if databases.contains_key(&name) {
                warn!(database = %name, "database already exists, skipping snapshot");
                continue;
            }
            let count = database.len().unwrap_or(0);
            databases.insert(name.clone(), Arc::new(database));
            info!(database = %name, vectors = count, "restored database from snapshot");
        }
        Ok(())
    }
}
