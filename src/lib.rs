//! covstore — cross-process coverage snapshot accumulation and
//! segregation.
//!
//! Independent processes (or class-loading contexts within one
//! process) each build an in-memory coverage increment and persist it
//! into one shared on-disk snapshot. Persistence is a load-merge-save
//! cycle guarded by an advisory cross-process file lock plus an
//! in-process per-path gate, so no successfully saved increment is
//! ever silently dropped. A snapshot can later be segregated into
//! per-package shard files for independent consumption.
//!
//! # Quick start
//!
//! ```no_run
//! use covstore::{ClassRecord, CoverageSnapshot, DataStore, StoreConfig};
//!
//! let mut increment = CoverageSnapshot::new();
//! let mut record = ClassRecord::new("org.example.Greeter");
//! record.touch_line(42);
//! increment.add_class(record);
//!
//! let store = DataStore::new(StoreConfig::from_env());
//! store.save_default(&increment);
//! ```

// Re-export the public API of the member crates.
pub use covstore_core::{namespace, ClassRecord, CoverageSnapshot, Error, Result};
pub use covstore_durability::{
    sentinel_path, ConfigResource, DataStore, FileLocker, LockBackend, LockHandle, StoreConfig,
    SNAPSHOT_EXTENSION,
};
pub use covstore_segregate::{bucket_name, segregate, shard_file_name};
