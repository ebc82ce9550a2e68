//! Cross-process mutual exclusion via a sentinel file
//!
//! A data file at `<path>` is guarded by a companion sentinel at
//! `<path>.lock`. Exclusivity comes from the OS advisory lock on the
//! sentinel, never from the sentinel's mere existence: a stale sentinel
//! left by a crashed process is an operational leftover, not state.
//!
//! Acquisition blocks indefinitely. There is no timeout and no
//! cancellation; a permanently held lock blocks forever. Callers treat
//! acquisition failure as "skip this operation", never as permission to
//! proceed unprotected.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How exclusivity is obtained for a sentinel file.
///
/// `Disabled` is the configuration-time escape hatch for platforms or
/// filesystems where advisory locking misbehaves: the caller then
/// relies on the in-process gate alone, with no cross-process
/// guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockBackend {
    /// OS advisory exclusive lock on the sentinel (the normal case)
    #[default]
    Os,
    /// No OS-level lock; in-process gate only
    Disabled,
}

/// Grants exclusive access to a data file across process boundaries
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLocker {
    backend: LockBackend,
}

/// Exclusive ownership of one data file's sentinel.
///
/// Released explicitly via [`LockHandle::release`]; `Drop` performs the
/// same best-effort steps as a backstop, so a handle can never outlive
/// the save cycle it guards.
#[derive(Debug)]
pub struct LockHandle {
    file: Option<File>,
    lock_path: PathBuf,
    os_locked: bool,
}

/// Sentinel path for a data file: the path with `.lock` appended.
pub fn sentinel_path(data_path: &Path) -> PathBuf {
    let mut name = data_path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

impl FileLocker {
    /// Create a locker using the given backend
    pub fn new(backend: LockBackend) -> Self {
        FileLocker { backend }
    }

    /// Acquire exclusive ownership of `data_path`'s sentinel.
    ///
    /// Blocks the calling thread until the OS grants the lock. Returns
    /// `None` if the sentinel cannot be opened or the platform refuses
    /// to lock it; the failure is logged and the caller must skip the
    /// protected operation.
    pub fn acquire(&self, data_path: &Path) -> Option<LockHandle> {
        let lock_path = sentinel_path(data_path);

        if self.backend == LockBackend::Disabled {
            debug!(
                target: "covstore::lock",
                path = %lock_path.display(),
                "OS locking disabled, proceeding on in-process gate only"
            );
            return Some(LockHandle {
                file: None,
                lock_path,
                os_locked: false,
            });
        }

        let file = match OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)
        {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    target: "covstore::lock",
                    path = %lock_path.display(),
                    error = %e,
                    "unable to open sentinel file"
                );
                return None;
            }
        };

        // Blocking exclusive lock, no timeout.
        if let Err(e) = fs2::FileExt::lock_exclusive(&file) {
            warn!(
                target: "covstore::lock",
                path = %lock_path.display(),
                error = %e,
                "unable to acquire exclusive lock"
            );
            return None;
        }

        debug!(target: "covstore::lock", path = %lock_path.display(), "lock acquired");
        Some(LockHandle {
            file: Some(file),
            lock_path,
            os_locked: true,
        })
    }
}

impl LockHandle {
    /// Sentinel file this handle owns
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Release the lock: unlock, close, delete the sentinel.
    ///
    /// The three steps are independent and best-effort. A failure in
    /// any one (say, the delete races another process that reopened the
    /// sentinel) is logged and the remaining steps still run; nothing
    /// propagates to the caller.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };

        if self.os_locked {
            if let Err(e) = fs2::FileExt::unlock(&file) {
                warn!(
                    target: "covstore::lock",
                    path = %self.lock_path.display(),
                    error = %e,
                    "unable to release OS lock"
                );
            }
            self.os_locked = false;
        }

        // Closing the handle also drops the OS lock if the explicit
        // unlock failed.
        drop(file);

        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            warn!(
                target: "covstore::lock",
                path = %self.lock_path.display(),
                error = %e,
                "unable to delete sentinel file"
            );
        } else {
            debug!(target: "covstore::lock", path = %self.lock_path.display(), "lock released");
        }
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sentinel_path_appends_suffix() {
        assert_eq!(
            sentinel_path(Path::new("/tmp/data.cov")),
            PathBuf::from("/tmp/data.cov.lock")
        );
    }

    #[test]
    fn test_acquire_creates_sentinel_and_release_removes_it() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.cov");
        let sentinel = sentinel_path(&data);

        let locker = FileLocker::new(LockBackend::Os);
        let handle = locker.acquire(&data).expect("lock should be granted");
        assert!(sentinel.exists());
        assert_eq!(handle.lock_path(), sentinel.as_path());

        handle.release();
        assert!(!sentinel.exists());
    }

    #[test]
    fn test_reacquire_after_release() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.cov");
        let locker = FileLocker::new(LockBackend::Os);

        let first = locker.acquire(&data).unwrap();
        first.release();
        let second = locker.acquire(&data).expect("lock must be reacquirable");
        second.release();
    }

    #[test]
    fn test_drop_releases_and_deletes_sentinel() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.cov");
        let sentinel = sentinel_path(&data);
        let locker = FileLocker::new(LockBackend::Os);

        {
            let _handle = locker.acquire(&data).unwrap();
            assert!(sentinel.exists());
        }
        assert!(!sentinel.exists());
    }

    #[test]
    fn test_disabled_backend_grants_without_sentinel() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.cov");
        let sentinel = sentinel_path(&data);
        let locker = FileLocker::new(LockBackend::Disabled);

        let handle = locker.acquire(&data).expect("disabled backend always grants");
        assert!(!sentinel.exists());
        handle.release();
        assert!(!sentinel.exists());
    }

    #[test]
    fn test_acquire_fails_when_sentinel_unopenable() {
        let dir = TempDir::new().unwrap();
        // Parent of the sentinel does not exist, so opening it fails.
        let data = dir.path().join("missing-subdir").join("data.cov");
        let locker = FileLocker::new(LockBackend::Os);
        assert!(locker.acquire(&data).is_none());
    }
}
