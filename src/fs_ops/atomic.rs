//! No-clobber rename helper.
//! - Refuses to replace an existing destination (rename(2) would overwrite on Unix).
//! - On Unix, best-effort fsync of the destination directory after rename.

use std::fs;
use std::io;
use std::path::Path;

use super::collision::path_taken;

/// Rename `src` onto `dst`, failing with `AlreadyExists` if `dst` is occupied.
/// The existence check and the rename are not one atomic step; the run lock
/// keeps other instances of this tool out of the destination meanwhile.
pub(crate) fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    if path_taken(dst) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination already exists: {}", dst.display()),
        ));
    }

    fs::rename(src, dst)?;

    // Ignore fsync errors to avoid turning a successful rename into a failure.
    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        let _ = super::util::fsync_dir(parent);
    }

    Ok(())
}
