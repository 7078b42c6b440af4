//! File-based locking to prevent overlapping batch runs

use anyhow::{Context, Result};
use fd_lock::RwLock;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lock guard for a batch run
pub struct RunLock {
    // Store the lock and file together
    _lock: Box<(RwLock<File>, Option<fd_lock::RwLockWriteGuard<'static, File>>)>,
    lock_path: PathBuf,
}

impl RunLock {
    /// Acquire an exclusive lock for the given scope
    /// Returns error if another run is already holding it
    pub fn acquire(scope: &str) -> Result<Self> {
        let lock_path = Self::lock_path(scope);

        debug!("Attempting to acquire lock: {:?}", lock_path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create lock directory")?;
        }

        // Open or create the lock file
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&lock_path)
            .context(format!("Failed to open lock file: {:?}", lock_path))?;

        // Create boxed lock
        let mut boxed_lock = Box::new((RwLock::new(file), None));

        // SAFETY: We're creating a self-referential structure here.
        // The lock guard references the RwLock, which is stored in the same Box.
        // This is safe because:
        // 1. The Box won't move once created
        // 2. The guard and RwLock will be dropped together
        // 3. The guard is dropped before the RwLock in the tuple drop order
        let lock_ptr = &mut boxed_lock.0 as *mut RwLock<File>;
        let guard = unsafe { (*lock_ptr).try_write() }.context(format!(
            "Another dbdump-manager run is already in progress (lock '{}' held)",
            scope
        ))?;

        // Store the guard - casting to 'static is safe because we control the lifetime
        let static_guard: fd_lock::RwLockWriteGuard<'static, File> =
            unsafe { std::mem::transmute(guard) };
        boxed_lock.1 = Some(static_guard);

        info!("Acquired run lock: {}", scope);

        Ok(Self {
            _lock: boxed_lock,
            lock_path,
        })
    }

    /// Get the lock file path for a scope
    fn lock_path(scope: &str) -> PathBuf {
        #[cfg(unix)]
        let base = Path::new("/tmp");

        #[cfg(windows)]
        let base = std::env::temp_dir();

        base.join(format!("dbdump-manager-{}.lock", scope))
    }

    /// Get the lock file path (for cleanup or inspection)
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        info!("Released run lock: {:?}", self.lock_path);

        // Try to remove the lock file (best effort)
        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            debug!("Failed to remove lock file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_lock_acquire_and_release() {
        let scope = "test-run";

        // Acquire lock
        let lock = RunLock::acquire(scope).expect("Failed to acquire lock");
        assert!(lock.path().exists());

        // Try to acquire again (should fail)
        let result = RunLock::acquire(scope);
        assert!(result.is_err());

        // Drop lock
        drop(lock);

        // Should be able to acquire again
        let lock2 = RunLock::acquire(scope).expect("Failed to acquire lock after release");
        drop(lock2);
    }
}
