//! Snapshot persistence integration tests.
//!
//! Exercises the full save/restore cycle the way a process restart would:
//! populate a manager, snapshot it, then bring up a second manager over
//! the same data root and verify what it sees.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use proxima::{
    save_all, DatabaseConfig, HnswConfig, Manager, SnapshotScheduler, SnapshotStore, Vector,
};
use proxima_vector::types::Metadata;

#[test]
fn snapshot_roundtrip_preserves_config_and_vectors() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());

    let mut rng = StdRng::seed_from_u64(42);
    let config = DatabaseConfig::new(HnswConfig::new(8));

    let manager = Manager::new();
    manager.create_database("db1", config.clone()).unwrap();

    let mut originals = Vec::new();
    for i in 0..100 {
        let data: Vec<f32> = (0..8).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let mut metadata = Metadata::new();
        metadata.insert("index".to_string(), serde_json::json!(i));
        let vector = Vector::new(format!("vec_{i}"), data).with_metadata(metadata);
        originals.push(vector.clone());
        manager.add_vector("db1", vector).unwrap();
    }

    save_all(&manager, &store);

    // A second manager over the same data root sees the same database.
    let restored_manager = Manager::new();
    restored_manager.restore_from(&store).unwrap();

    assert_eq!(restored_manager.list_databases().unwrap(), vec!["db1".to_string()]);

    let restored = restored_manager.get_database("db1").unwrap();
    assert_eq!(restored.config(), &config);
    assert_eq!(restored.len().unwrap(), 100);

    for original in &originals {
        let loaded = restored_manager.get_vector("db1", &original.id).unwrap();
        assert_eq!(&loaded, original, "vector {} changed across the roundtrip", original.id);
    }
}

#[test]
fn restored_database_answers_queries() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());

    let manager = Manager::new();
    manager.create_database("grid", DatabaseConfig::new(HnswConfig::new(2))).unwrap();
    for i in 0..30 {
        manager.add_vector("grid", Vector::new(format!("p{i}"), vec![i as f32, 0.0])).unwrap();
    }
    save_all(&manager, &store);

    let restored_manager = Manager::new();
    restored_manager.restore_from(&store).unwrap();

    // The graph was rebuilt by reinsertion, so queries work immediately.
    let results = restored_manager.search("grid", &[7.3, 0.0], 3).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, "p7");
}

#[test]
fn restore_skips_names_already_present() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());

    let manager = Manager::new();
    manager.create_database("db1", DatabaseConfig::new(HnswConfig::new(2))).unwrap();
    manager.add_vector("db1", Vector::new("persisted", vec![1.0, 1.0])).unwrap();
    save_all(&manager, &store);

    // A live database under the same name wins over its snapshot.
    let second = Manager::new();
    second.create_database("db1", DatabaseConfig::new(HnswConfig::new(2))).unwrap();
    second.add_vector("db1", Vector::new("live", vec![2.0, 2.0])).unwrap();
    second.restore_from(&store).unwrap();

    assert!(second.get_vector("db1", "live").is_ok());
    assert!(second.get_vector("db1", "persisted").is_err());
}

#[test]
fn restore_from_empty_root_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("fresh"));

    let manager = Manager::new();
    manager.restore_from(&store).unwrap();
    assert!(manager.list_databases().unwrap().is_empty());
}

#[test]
fn scheduler_persists_databases_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SnapshotStore::new(dir.path()));

    let manager = Arc::new(Manager::new());
    manager.create_database("db1", DatabaseConfig::new(HnswConfig::new(2))).unwrap();
    manager.add_vector("db1", Vector::new("a", vec![1.0, 2.0])).unwrap();

    // Shut down before any tick: the final pass must cover the write.
    let mut scheduler = SnapshotScheduler::start(
        Arc::clone(&manager),
        Arc::clone(&store),
        Duration::from_secs(3600),
    );
    scheduler.shutdown();

    let restored_manager = Manager::new();
    restored_manager.restore_from(&store).unwrap();
    assert_eq!(restored_manager.get_vector("db1", "a").unwrap().data, vec![1.0, 2.0]);
}
