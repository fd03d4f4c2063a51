//! # Store Directory Locking
//!
//! Prevents two handles (in this process or another) from opening the same
//! store directory. A second opener gets `LockError::AlreadyLocked`, which
//! surfaces as `KVStoreError::Locked` at startup.
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::domain::errors::KVStoreError;

/// Errors from store directory locking.
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock file could not be created.
    #[error("failed to create lock file: {0}")]
    CreateFailed(#[source] io::Error),

    /// Directory is already locked by another handle.
    #[error("store already in use ({})", path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    /// Failed to write PID to lock file.
    #[error("failed to write PID to lock file: {0}")]
    WriteFailed(#[source] io::Error),
}

impl From<LockError> for KVStoreError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::AlreadyLocked { pid, path } => KVStoreError::Locked { path, pid },
            other => KVStoreError::OpenFailed {
                path: PathBuf::new(),
                message: other.to_string(),
            },
        }
    }
}

/// Exclusive lock on a store directory.
///
/// Acquired when a store opens, released on drop (RAII).
pub struct DatabaseLock {
    /// The lock file handle (kept open to maintain lock)
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DatabaseLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Acquire an exclusive lock on `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `LockError::AlreadyLocked` if another handle holds the lock.
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        let lock_path = data_dir.join(Self::LOCK_FILE);

        // Truncating before the lock is held would wipe the owner's PID.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(LockError::CreateFailed)?;

        if file.try_lock_exclusive().is_err() {
            return Err(LockError::AlreadyLocked {
                pid: Self::read_existing_pid(&lock_path),
                path: lock_path,
            });
        }

        let pid = std::process::id();
        file.set_len(0).map_err(LockError::WriteFailed)?;
        file.seek(SeekFrom::Start(0))
            .map_err(LockError::WriteFailed)?;
        writeln!(file, "{}", pid).map_err(LockError::WriteFailed)?;
        file.sync_all().map_err(LockError::WriteFailed)?;

        Ok(Self {
            file,
            path: lock_path,
            pid,
        })
    }

    /// PID of the process holding the lock.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DatabaseLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
