//! Timestamp and permission carry-over for the copy path.
//! A rename keeps these for free; a copy has to apply them to the staged file.
//! Best-effort: failures are logged and never fail the move.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

pub(super) fn apply_source_metadata(dest: &Path, src_meta: &fs::Metadata) {
    #[cfg(unix)]
    let times = {
        use std::os::unix::fs::MetadataExt;
        Some((
            FileTime::from_unix_time(src_meta.atime(), src_meta.atime_nsec() as u32),
            FileTime::from_unix_time(src_meta.mtime(), src_meta.mtime_nsec() as u32),
        ))
    };
    #[cfg(not(unix))]
    let times = match (src_meta.accessed(), src_meta.modified()) {
        (Ok(a), Ok(m)) => Some((FileTime::from_system_time(a), FileTime::from_system_time(m))),
        _ => None,
    };

    if let Some((at, mt)) = times {
        match set_file_times(dest, at, mt) {
            Ok(()) => trace!(path = %dest.display(), "set atime/mtime on destination"),
            Err(e) => {
                warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination")
            }
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = src_meta.permissions().mode() & 0o777;
        if let Err(e) = fs::set_permissions(dest, fs::Permissions::from_mode(mode)) {
            warn!(path = %dest.display(), error = %e, "failed to set permissions on destination");
        }
    }
}
