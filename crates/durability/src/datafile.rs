//! The load-merge-save protocol for coverage data files
//!
//! `DataStore::save` is the single externally visible persistence
//! operation: it folds a transient increment into whatever already
//! sits on disk, under both the in-process gate and the cross-process
//! file lock. The on-disk format is an opaque bincode blob of the
//! whole snapshot.
//!
//! The write overwrites the file in place — no temp file, no rename. A
//! crash mid-write can leave a partial file; the next `load` treats it
//! as absent and the next `save` starts fresh. That trade-off favors
//! simplicity over crash-atomicity and is deliberate.
//!
//! Nothing here propagates an error to the caller: failures become log
//! lines, `load` reports absence, `save` becomes a no-op.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, error, info};

use covstore_core::{CoverageSnapshot, Error, Result};

use crate::config::StoreConfig;
use crate::filelock::{FileLocker, LockBackend};
use crate::gate;

/// Extension shared by the main data file and segregated shard files
pub const SNAPSHOT_EXTENSION: &str = "cov";

/// Read buffer size for snapshot loads
const READ_BUFFER_BYTES: usize = 16 * 1024;

/// Orchestrates load, merge, and save of coverage snapshots
#[derive(Debug)]
pub struct DataStore {
    config: StoreConfig,
    locker: FileLocker,
}

impl DataStore {
    /// Build a store from an explicit configuration
    pub fn new(config: StoreConfig) -> Self {
        let backend = if config.os_locking() {
            LockBackend::Os
        } else {
            LockBackend::Disabled
        };
        DataStore {
            config,
            locker: FileLocker::new(backend),
        }
    }

    /// Build a store from the environment and the on-disk resource
    pub fn from_env() -> Self {
        Self::new(StoreConfig::from_env())
    }

    /// The configuration this store was built with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The resolved shared data-file location (cached after first use)
    pub fn default_datafile(&self) -> &Path {
        self.config.resolve_datafile()
    }

    /// Load a snapshot from `path`.
    ///
    /// Returns `None` for a missing file, an unreadable file, or an
    /// undecodable blob — the caller must treat all three like an empty
    /// snapshot. Failures are logged, never raised.
    pub fn load(&self, path: &Path) -> Option<CoverageSnapshot> {
        if !path.is_file() {
            info!(
                target: "covstore::store",
                path = %path.display(),
                "coverage data file does not exist or is not readable, starting fresh"
            );
            return None;
        }
        match read_snapshot(path) {
            Ok(snapshot) => {
                info!(
                    target: "covstore::store",
                    path = %path.display(),
                    classes = snapshot.class_count(),
                    "loaded coverage data"
                );
                Some(snapshot)
            }
            Err(e) => {
                error!(
                    target: "covstore::store",
                    path = %path.display(),
                    error = %e,
                    "error reading coverage data file"
                );
                None
            }
        }
    }

    /// Persist `increment` into the shared snapshot at `path`.
    ///
    /// The protected merge-write cycle:
    /// 1. serialize into the in-process gate for the path
    /// 2. acquire the cross-process lock; on failure the increment is
    ///    discarded (logged, sanctioned loss)
    /// 3. merge the increment into the prior on-disk state (or start
    ///    from the increment when there is none)
    /// 4. create parent directories best-effort and overwrite the file
    /// 5. release the lock unconditionally
    pub fn save(&self, increment: &CoverageSnapshot, path: &Path) {
        let gate = gate::gate_for(path);
        let _serial = gate.lock();

        let Some(lock) = self.locker.acquire(path) else {
            error!(
                target: "covstore::store",
                path = %path.display(),
                classes = increment.class_count(),
                "could not lock coverage data file, increment discarded"
            );
            return;
        };

        self.merge_and_write(increment, path);
        lock.release();
    }

    /// Persist `increment` into the configured default data file
    pub fn save_default(&self, increment: &CoverageSnapshot) {
        let path = self.default_datafile().to_path_buf();
        self.save(increment, &path);
    }

    // Phases 3-4 of the cycle. Infallible by construction so that the
    // caller can release the lock unconditionally afterwards.
    fn merge_and_write(&self, increment: &CoverageSnapshot, path: &Path) {
        let merged = match self.load(path) {
            Some(mut on_disk) => {
                on_disk.merge(increment);
                on_disk
            }
            None => increment.clone(),
        };

        match write_snapshot(&merged, path) {
            Ok(()) => {
                info!(
                    target: "covstore::store",
                    path = %path.display(),
                    classes = merged.class_count(),
                    "saved coverage data"
                );
            }
            Err(e) => {
                error!(
                    target: "covstore::store",
                    path = %path.display(),
                    error = %e,
                    "error writing coverage data file"
                );
            }
        }
    }
}

fn read_snapshot(path: &Path) -> Result<CoverageSnapshot> {
    let file = File::open(path)?;
    let reader = BufReader::with_capacity(READ_BUFFER_BYTES, file);
    let snapshot = bincode::deserialize_from(reader)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(snapshot)
}

fn write_snapshot(snapshot: &CoverageSnapshot, path: &Path) -> Result<()> {
    // Idempotent, best-effort: a failure here surfaces as the create
    // error below.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    debug!(target: "covstore::store", path = %path.display(), "writing coverage data");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, snapshot)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    writer.flush()?;
    Ok(())
}
