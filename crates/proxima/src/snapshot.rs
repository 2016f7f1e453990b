//! Snapshot persistence.
//!
//! Each database persists as a directory `<data_root>/<db_name>/` holding
//! two JSON documents:
//!
//! ```text
//! <data_root>/
//!   <db_name>/
//!     config.json    the DatabaseConfig
//!     vectors.json   the identity map, id -> {id, data, metadata}
//! ```
//!
//! The HNSW graph is not serialized. Restoring a snapshot rebuilds the
//! graph by reinserting every vector; reinsertion order varies the graph,
//! which is acceptable because level assignment is random by design.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::warn;

use proxima_vector::types::Vector;

use crate::config::DatabaseConfig;
use crate::database::Database;
use crate::error::{Error, Result};

/// File names inside a database snapshot directory.
mod files {
    pub const CONFIG: &str = "config.json";
    pub const VECTORS: &str = "vectors.json";
}

/// Reads and writes database snapshots under a root directory.
///
/// Snapshot I/O is serialized per store instance; saving takes a
/// consistent clone of the database's identity map before touching disk.
pub struct SnapshotStore {
    base_path: PathBuf,
    io_lock: RwLock<()>,
}

impl SnapshotStore {
    /// Create a store rooted at `base_path`. The directory is created
    /// lazily on first save.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into(), io_lock: RwLock::new(()) }
    }

    /// The snapshot root directory.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write a database's configuration and identity map to disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] or [`Error::Serialization`] if either file
    /// cannot be written.
    pub fn save(&self, database: &Database) -> Result<()> {
        let _io = self.io_lock.write().map_err(|_| Error::LockPoisoned)?;

        let dir = self.base_path.join(database.name());
        fs::create_dir_all(&dir)?;

        let mut config_writer = BufWriter::new(File::create(dir.join(files::CONFIG))?);
        serde_json::to_writer(&mut config_writer, database.config())?;
        config_writer.flush()?;

        let vectors = database.vectors()?;
        let mut vectors_writer = BufWriter::new(File::create(dir.join(files::VECTORS))?);
        serde_json::to_writer(&mut vectors_writer, &vectors)?;
        vectors_writer.flush()?;

        Ok(())
    }

    /// Load a database snapshot, rebuilding its HNSW graph by reinserting
    /// every stored vector.
    ///
    /// Vectors that fail reinsertion (for example after a configuration
    /// edit changed the dimensionality) are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] or [`Error::Serialization`] if either file
    /// cannot be read, or `InvalidParameter` if the stored configuration
    /// is invalid.
    pub fn load_database(&self, name: &str) -> Result<Database> {
        let _io = self.io_lock.read().map_err(|_| Error::LockPoisoned)?;

        let dir = self.base_path.join(name);

        let config_file = File::open(dir.join(files::CONFIG))?;
        let config: DatabaseConfig = serde_json::from_reader(BufReader::new(config_file))?;

        let vectors_file = File::open(dir.join(files::VECTORS))?;
        let vectors: HashMap<String, Vector> =
            serde_json::from_reader(BufReader::new(vectors_file))?;

        let database = Database::new(name, config)?;
        for (_, vector) in vectors {
            let id = vector.id.clone();
            if let Err(err) = database.add_vector(vector) {
                warn!(database = name, vector = %id, error = %err, "skipping vector during graph rebuild");
            }
        }

        Ok(database)
    }

    /// The names of all snapshot directories under the root.
    ///
    /// A missing root directory reads as no snapshots rather than an
    /// error, so a fresh data path restores cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the root exists but cannot be listed.
    pub fn list_databases(&self) -> Result<Vec<String>> {
        let _io = self.io_lock.read().map_err(|_| Error::LockPoisoned)?;

        let entries = match fs::read_dir(&self.base_path) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// Remove a database's snapshot directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be removed.
    pub fn delete_database(&self, name: &str) -> Result<()> {
        let _io = self.io_lock.write().map_err(|_| Error::LockPoisoned)?;
        fs::remove_dir_all(self.base_path.join(name))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proxima_vector::index::HnswConfig;
    use proxima_vector::DistanceMetric;

    use super::*;

    fn temp_store() -> (tempfile::TempDir, SnapshotStore) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = SnapshotStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_save_writes_expected_layout() {
        let (_dir, store) = temp_store();
        let db = Database::new(
            "db1",
            DatabaseConfig::new(HnswConfig::new(2).with_metric(DistanceMetric::Cosine)),
        )
        .unwrap();
        db.add_vector(Vector::new("a", vec![1.0, 0.0])).unwrap();

        store.save(&db).unwrap();

        let dir = store.base_path().join("db1");
        assert!(dir.join("config.json").is_file());
        assert!(dir.join("vectors.json").is_file());

        let config: serde_json::Value =
            serde_json::from_reader(File::open(dir.join("config.json")).unwrap()).unwrap();
        assert_eq!(config["hnsw"]["dimensions"], 2);
        assert_eq!(config["hnsw"]["distance_type"], 1);

        let vectors: serde_json::Value =
            serde_json::from_reader(File::open(dir.join("vectors.json")).unwrap()).unwrap();
        assert_eq!(vectors["a"]["id"], "a");
        assert_eq!(vectors["a"]["data"][0], 1.0);
    }

    #[test]
    fn test_roundtrip_preserves_config_and_vectors() {
        let (_dir, store) = temp_store();
        let db = Database::new(
            "db1",
            DatabaseConfig::new(HnswConfig::new(3).with_m(8)),
        )
        .unwrap();

        let mut metadata = proxima_vector::types::Metadata::new();
        metadata.insert("lang".to_string(), serde_json::json!("en"));
        db.add_vector(Vector::new("a", vec![1.0, 2.0, 3.0]).with_metadata(metadata)).unwrap();
        db.add_vector(Vector::new("b", vec![4.0, 5.0, 6.0])).unwrap();

        store.save(&db).unwrap();
        let restored = store.load_database("db1").unwrap();

        assert_eq!(restored.config(), db.config());
        assert_eq!(restored.len().unwrap(), 2);

        let a = restored.get_vector("a").unwrap();
        assert_eq!(a.data, vec![1.0, 2.0, 3.0]);
        assert_eq!(a.metadata["lang"], "en");
    }

    #[test]
    fn test_restore_rebuilds_searchable_graph() {
        let (_dir, store) = temp_store();
        let db = Database::new("db1", DatabaseConfig::new(HnswConfig::new(2))).unwrap();
        for i in 0..20 {
            db.add_vector(Vector::new(format!("v{i}"), vec![i as f32, 0.0])).unwrap();
        }

        store.save(&db).unwrap();
        let restored = store.load_database("db1").unwrap();

        let results = restored.search(&[3.2, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "v3");
    }

    #[test]
    fn test_list_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("never-created"));
        assert!(store.list_databases().unwrap().is_empty());
    }

    #[test]
    fn test_list_and_delete() {
        let (_dir, store) = temp_store();
        for name in ["db1", "db2"] {
            let db = Database::new(name, DatabaseConfig::new(HnswConfig::new(2))).unwrap();
            store.save(&db).unwrap();
        }

        let mut names = store.list_databases().unwrap();
        names.sort();
        assert_eq!(names, vec!["db1".to_string(), "db2".to_string()]);

        store.delete_database("db1").unwrap();
        assert_eq!(store.list_databases().unwrap(), vec!["db2".to_string()]);
    }

    #[test]
    fn test_load_missing_database_is_io_error() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.load_database("ghost"), Err(Error::Io(_))));
    }
}
