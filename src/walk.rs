//! Directory enumerator.
//!
//! Yields every regular file below a root as a lazy, finite, non-restartable
//! sequence. Access errors come through as `Err` items on the same iterator;
//! walkdir then skips the unreadable subtree and keeps going.
//!
//! Notes:
//! - Symlinks are neither followed nor yielded.
//! - Entries are visited in file-name order so collision numbering is stable.
//! - Our own staging/lock files are never yielded.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::errors::EnumerationError;
use crate::fs_ops::is_internal_name;

/// Iterator over the regular files under a source root.
pub struct ScreenshotWalker {
    inner: walkdir::IntoIter,
}

impl ScreenshotWalker {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let inner = WalkDir::new(root.as_ref())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Self { inner }
    }
}

impl Iterator for ScreenshotWalker {
    type Item = Result<PathBuf, EnumerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    let path = source.path().map(Path::to_path_buf);
                    return Some(Err(EnumerationError { path, source }));
                }
            };

            let ftype = entry.file_type();
            if ftype.is_dir() {
                trace!(path = %entry.path().display(), "descending");
                continue;
            }
            if !ftype.is_file() {
                debug!(path = %entry.path().display(), "skipping non-regular entry");
                continue;
            }
            if is_internal_name(entry.file_name()) {
                debug!(path = %entry.path().display(), "skipping staging or lock file");
                continue;
            }
            return Some(Ok(entry.into_path()));
        }
    }
}
