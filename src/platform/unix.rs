//! Unix implementations of platform helpers.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::fd::IntoRawFd;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions to avoid
/// clobbering administrator adjustments (e.g. group-readable for log shipping).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

/// True when both paths live on the same filesystem (same `st_dev`).
/// Both paths must exist; pass the destination's parent directory rather than the
/// not-yet-created destination file.
pub fn same_volume(a: &Path, b: &Path) -> io::Result<bool> {
    let da = fs::metadata(a)?.dev();
    let db = fs::metadata(b)?.dev();
    Ok(da == db)
}

/// Close `file` explicitly so deferred write errors (NFS, quota) surface.
/// Dropping a `File` ignores the result of close(2).
pub fn close_checked(file: File) -> io::Result<()> {
    let fd = file.into_raw_fd();
    let rc = unsafe { libc::close(fd) };
    if rc == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    // EINTR: the descriptor is released anyway and data was already fsynced.
    if err.raw_os_error() == Some(libc::EINTR) {
        return Ok(());
    }
    Err(err)
}
