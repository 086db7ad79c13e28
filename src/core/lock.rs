//! core::lock
//!
//! Exclusive writer lock for ref creation and checkout.
//!
//! One lock file per repository (`<common_dir>/lineage/lock`), shared by all
//! worktrees and processes. The holder writes its pid into the file so a
//! contended writer can say who is in the way. Readers never take the lock,
//! and acquisition never waits.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;
use tracing::debug;

use crate::core::paths::LineagePaths;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another writer holds the lock.
    #[error("repository is locked by another writer{}", holder_suffix(.holder))]
    AlreadyLocked {
        /// Pid recorded by the holder, when readable
        holder: Option<u32>,
    },

    /// The lock file or its directory could not be opened.
    #[error("cannot open lock file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OS refused the lock for a reason other than contention.
    #[error("failed to acquire lock: {0}")]
    Acquire(#[source] std::io::Error),
}

pub(crate) fn holder_suffix(holder: &Option<u32>) -> String {
    match holder {
        Some(pid) => format!(" (pid {pid})"),
        None => String::new(),
    }
}

/// An exclusive lock on the repository, released on drop.
#[derive(Debug)]
pub struct RepoLock {
    path: PathBuf,
    file: File,
}

impl RepoLock {
    /// Take the repository lock without waiting.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another writer has it
    /// - [`LockError::Open`] if the lock file cannot be created
    /// - [`LockError::Acquire`] for any other OS failure
    pub fn acquire(paths: &LineagePaths) -> Result<Self, LockError> {
        let path = paths.repo_lock_path();
        let open_err = |source| LockError::Open {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(paths.repo_lineage_dir()).map_err(open_err)?;
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(open_err)?;

        if let Err(e) = file.try_lock_exclusive() {
            let contended = e.kind() == std::io::ErrorKind::WouldBlock
                || e.raw_os_error() == fs2::lock_contended_error().raw_os_error();
            if !contended {
                return Err(LockError::Acquire(e));
            }
            let holder = read_holder(&mut file);
            debug!(?holder, "repository lock contended");
            return Err(LockError::AlreadyLocked { holder });
        }

        // The pid is informational; a failed write still leaves us holding the lock.
        let _ = record_holder(&mut file);
        Ok(Self { path, file })
    }

    /// Path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        let _ = self.file.set_len(0);
        let _ = self.file.unlock();
    }
}

fn read_holder(file: &mut File) -> Option<u32> {
    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    contents.trim().parse().ok()
}

fn record_holder(file: &mut File) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()
}
