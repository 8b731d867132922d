//! File move implementation.
//! Attempts an atomic rename when source and destination share a volume; on a
//! different volume or a rename failure, falls back to copy-verify-delete.
//!
//! The copy is staged in a hidden sibling inside the destination directory and
//! only renamed onto the final name once it is synced, closed and length-checked.
//! The source is deleted last, so every failure before that point leaves it intact.

use std::fs::{self, File, Metadata};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::MoveError;
use crate::platform::same_volume;

use super::atomic::try_atomic_move;
use super::collision::resolve_destination;
use super::helpers::io_hint;
use super::io_copy::copy_into_new;
use super::meta::apply_source_metadata;
use super::space::ensure_space_for_copy;
use super::util::{is_cross_device, unique_temp_path};

/// How a successful move was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    /// Same-volume rename.
    Renamed,
    /// Verified copy followed by deletion of the source.
    Copied,
}

/// Result of relocating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub dest: PathBuf,
    pub method: MoveMethod,
}

/// Move `src` into `dest_root`, keeping its base name unless that name is taken.
pub fn relocate(src: &Path, dest_root: &Path) -> Result<MoveOutcome, MoveError> {
    let name = src
        .file_name()
        .ok_or_else(|| MoveError::NoFileName(src.to_path_buf()))?;
    let dest = resolve_destination(dest_root, name);
    safe_move(src, &dest)
}

/// Move one file to an exact, currently unused destination path.
pub fn safe_move(src: &Path, dest: &Path) -> Result<MoveOutcome, MoveError> {
    safe_move_with(src, dest, try_atomic_move)
}

/// [`safe_move`] with the same-volume rename step supplied by the caller.
fn safe_move_with<F>(src: &Path, dest: &Path, rename: F) -> Result<MoveOutcome, MoveError>
where
    F: FnOnce(&Path, &Path) -> io::Result<()>,
{
    let src = dunce::canonicalize(src).map_err(|source| MoveError::PathResolution {
        path: src.to_path_buf(),
        source,
    })?;
    let dest = std::path::absolute(dest).map_err(|source| MoveError::PathResolution {
        path: dest.to_path_buf(),
        source,
    })?;
    let dest_dir = dest
        .parent()
        .ok_or_else(|| MoveError::NoFileName(dest.clone()))?;

    match same_volume(&src, dest_dir) {
        Ok(true) => match rename(&src, &dest) {
            Ok(()) => {
                debug!(src = %src.display(), dest = %dest.display(), "renamed file atomically");
                return Ok(MoveOutcome {
                    dest,
                    method: MoveMethod::Renamed,
                });
            }
            Err(e) => {
                let hint = if is_cross_device(&e) {
                    "cross-filesystem; will copy instead"
                } else {
                    io_hint(&e).unwrap_or("falling back to copy")
                };
                warn!(error = %e, hint, src = %src.display(), "atomic rename failed, using verified copy");
            }
        },
        Ok(false) => {
            debug!(src = %src.display(), dest_dir = %dest_dir.display(), "different volumes; copying");
        }
        Err(e) => {
            debug!(error = %e, "could not compare volumes; copying");
        }
    }

    copy_verify_delete(&src, &dest)?;
    Ok(MoveOutcome {
        dest,
        method: MoveMethod::Copied,
    })
}

/// Copy `src` to `dest`, verify it, and only then delete `src`.
/// Returns the number of bytes copied.
///
/// `dest` must not exist. Its parent directory must.
pub fn copy_verify_delete(src: &Path, dest: &Path) -> Result<u64, MoveError> {
    let meta = fs::metadata(src).map_err(|source| MoveError::SourceStat {
        path: src.to_path_buf(),
        source,
    })?;
    let input = File::open(src).map_err(|source| MoveError::SourceOpen {
        path: src.to_path_buf(),
        source,
    })?;
    copy_verify_delete_from(input, src, dest, &meta)
}

fn copy_verify_delete_from<R: Read>(
    input: R,
    src: &Path,
    dest: &Path,
    src_meta: &Metadata,
) -> Result<u64, MoveError> {
    let expected = src_meta.len();
    let dest_dir = dest
        .parent()
        .ok_or_else(|| MoveError::NoFileName(dest.to_path_buf()))?;

    ensure_space_for_copy(dest_dir, expected)?;

    // The reader is consumed (and closed) inside copy_into_new, so the source is
    // no longer open by the time we try to delete it.
    let staged = unique_temp_path(dest_dir);
    let copied = copy_into_new(input, src, &staged, expected)?;
    apply_source_metadata(&staged, src_meta);

    if let Err(source) = try_atomic_move(&staged, dest) {
        let _ = fs::remove_file(&staged);
        return Err(MoveError::Promote {
            staged,
            dest: dest.to_path_buf(),
            source,
        });
    }
    info!(src = %src.display(), dest = %dest.display(), bytes = copied, "verified copy in place");

    fs::remove_file(src).map_err(|source| MoveError::SourceRemoval {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        source,
    })?;
    Ok(copied)
}
