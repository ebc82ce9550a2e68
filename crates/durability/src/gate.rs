//! In-process critical section per data-file path
//!
//! The OS advisory lock alone is not enough inside one process: two
//! threads can both pass the lock call in rapid succession before
//! either's effect on the sentinel is externally visible. Every caller
//! therefore serializes on a process-wide mutex keyed by the
//! absolutized path *before* attempting the cross-process lock.
//!
//! Keys are absolutized (cwd-joined), not canonicalized: the data file
//! may not exist yet on the first save, and `canonicalize` would fail.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Global registry of per-path gates (absolute path -> mutex)
static PATH_GATES: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// The gate guarding one data-file path, created on first use.
///
/// Callers holding the returned mutex own the in-process critical
/// section for that path; distinct paths get independent gates.
pub fn gate_for(path: &Path) -> Arc<Mutex<()>> {
    let key = absolutize(path);
    let mut gates = PATH_GATES.lock();
    Arc::clone(gates.entry(key).or_insert_with(|| Arc::new(Mutex::new(()))))
}

/// Join a relative path onto the current working directory.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
