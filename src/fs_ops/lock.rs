//! Advisory run lock.
//! One prism_shots process at a time may fill a destination directory; collision
//! resolution relies on that.
//!
//! Design:
//! - Lock by holding `.prism_shots.lock` inside the destination directory.
//! - fs2 maps this to flock(LOCK_EX|LOCK_NB) on Unix and LockFileEx on Windows.
//! - The lock is released (and the file removed, best-effort) when the guard drops.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

use super::util::LOCK_NAME;

/// RAII guard held while the run lock is active.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

fn lock_file_path(dir: &Path) -> PathBuf {
    dir.join(LOCK_NAME)
}

/// Try to take the run lock on `dir` without blocking.
/// Ok(None) means another process holds it.
pub fn try_acquire_run_lock(dir: &Path) -> io::Result<Option<RunLock>> {
    let path = lock_file_path(dir);
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)?;

    match file.try_lock_exclusive() {
        Ok(()) => {
            trace!(path = %path.display(), "run lock acquired");
            Ok(Some(RunLock { file, path }))
        }
        Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
            trace!(path = %path.display(), "run lock held elsewhere");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
