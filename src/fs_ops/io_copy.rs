//! Streaming copy with durability and length verification.
//!
//! - Writes to a newly created file (create_new; never clobbers).
//! - Buffered I/O with large (1 MiB) buffers to reduce syscall count.
//! - Flushes, fsyncs and explicitly closes the file before the length check.
//! - Removes the partial file on every failure path.
//!
//! Snapshot semantics: the source is read once from start to EOF. If it grows or
//! shrinks while being read, the byte count no longer matches the length recorded
//! up front and the copy is rejected.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read};
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::MoveError;
use crate::platform::close_checked;

pub(crate) const BUF_SIZE: usize = 1024 * 1024;

/// Copy everything from `reader` into a new file at `dst`, sync and close it,
/// then require exactly `expected` bytes. On error `dst` no longer exists.
///
/// `src` is only used for error context.
pub(crate) fn copy_into_new<R: Read>(
    reader: R,
    src: &Path,
    dst: &Path,
    expected: u64,
) -> Result<u64, MoveError> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)
        .map_err(|source| MoveError::DestinationCreate {
            path: dst.to_path_buf(),
            source,
        })?;

    // All handles are released when write_synced returns, on success or failure.
    let result = write_synced(reader, file, src, dst).and_then(|copied| {
        if copied == expected {
            Ok(copied)
        } else {
            Err(MoveError::SizeMismatch {
                path: dst.to_path_buf(),
                expected,
                copied,
            })
        }
    });

    if result.is_err() {
        discard_partial(dst);
    }
    result
}

fn write_synced<R: Read>(reader: R, file: File, src: &Path, dst: &Path) -> Result<u64, MoveError> {
    let copy_err = |source: io::Error| MoveError::Copy {
        src: src.to_path_buf(),
        dest: dst.to_path_buf(),
        source,
    };

    let mut reader = BufReader::with_capacity(BUF_SIZE, reader);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, file);
    let copied = io::copy(&mut reader, &mut writer).map_err(copy_err)?;
    let file = writer
        .into_inner()
        .map_err(|e| copy_err(e.into_error()))?;

    file.sync_all().map_err(|source| MoveError::Sync {
        path: dst.to_path_buf(),
        source,
    })?;
    close_checked(file).map_err(|source| MoveError::Close {
        path: dst.to_path_buf(),
        source,
    })?;

    debug!(bytes = copied, dest = %dst.display(), "copy synced and closed");
    Ok(copied)
}

fn discard_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed partial copy"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove partial copy"),
    }
}
