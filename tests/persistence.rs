//! End-to-end persistence properties through the public facade.

use covstore::{sentinel_path, ClassRecord, CoverageSnapshot, DataStore, StoreConfig};
use tempfile::TempDir;

fn increment(names: &[&str]) -> CoverageSnapshot {
    let mut snapshot = CoverageSnapshot::new();
    for name in names {
        let mut record = ClassRecord::new(*name);
        record.touch_line(7);
        snapshot.add_class(record);
    }
    snapshot
}

#[test]
fn round_trip_preserves_names_and_counters() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("round-trip.cov");
    let store = DataStore::new(StoreConfig::default());

    let mut snapshot = CoverageSnapshot::new();
    let mut record = ClassRecord::new("org.example.Widget");
    record.add_hits(1, 3);
    record.add_hits(99, 1);
    snapshot.add_class(record);
    snapshot.add_class(ClassRecord::new("org.example.Empty"));

    store.save(&snapshot, &path);
    let loaded = store.load(&path).expect("saved file must load");

    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.class("org.example.Widget").unwrap().hits_for(1), 3);
    assert_eq!(loaded.class("org.example.Widget").unwrap().hits_for(99), 1);
}

#[test]
fn accumulate_dont_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.cov");
    let store = DataStore::new(StoreConfig::default());

    let a = increment(&["runtime.a.One", "runtime.a.Two"]);
    let b = increment(&["runtime.b.Three", "runtime.b.Four", "runtime.b.Five"]);

    store.save(&a, &path);
    store.save(&b, &path);

    let merged = store.load(&path).unwrap();
    assert_eq!(merged.class_count(), a.class_count() + b.class_count());
}

#[test]
fn no_sentinel_or_handle_survives_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hygiene.cov");
    let store = DataStore::new(StoreConfig::default());

    store.save(&increment(&["x.Y"]), &path);
    assert!(!sentinel_path(&path).exists());

    // A fresh acquire must succeed immediately, proving nothing is
    // still held.
    let locker = covstore::FileLocker::new(covstore::LockBackend::Os);
    let handle = locker.acquire(&path).expect("lock must be free");
    handle.release();
    assert!(!sentinel_path(&path).exists());
}

#[test]
fn interleaved_saves_from_two_stores_serialize() {
    // Two DataStore values in one process model two class-loading
    // contexts; the process-wide gate still serializes them.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("two-contexts.cov");
    let store_a = DataStore::new(StoreConfig::default());
    let store_b = DataStore::new(StoreConfig::default());

    let handle = {
        let path = path.clone();
        std::thread::spawn(move || {
            for i in 0..10 {
                store_b.save(&increment(&[&format!("ctx.b.C{i}")]), &path);
            }
        })
    };
    for i in 0..10 {
        store_a.save(&increment(&[&format!("ctx.a.C{i}")]), &path);
    }
    handle.join().unwrap();

    let merged = store_a.load(&path).unwrap();
    assert_eq!(merged.class_count(), 20);
}
