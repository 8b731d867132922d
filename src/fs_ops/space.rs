//! Free-space precheck for the copy fallback.
//! statvfs on Unix, GetDiskFreeSpaceExW on Windows.

use std::io;
use std::path::Path;
use tracing::debug;

#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
#[cfg(windows)]
use std::os::windows::ffi::OsStrExt;

use crate::errors::MoveError;

pub(super) fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Fail early when `dst_dir` cannot hold `required` bytes plus a small cushion.
/// If free space cannot be determined the check is skipped.
pub(super) fn ensure_space_for_copy(dst_dir: &Path, required: u64) -> Result<(), MoveError> {
    let free = match free_space_bytes(dst_dir) {
        Ok(free) => free,
        Err(e) => {
            debug!(dir = %dst_dir.display(), error = %e, "free space unknown; skipping check");
            return Ok(());
        }
    };
    let cushion: u64 = 1024 * 1024;
    if free < required.saturating_add(cushion) {
        debug!(
            dir = %dst_dir.display(),
            need = %format_bytes(required),
            free = %format_bytes(free),
            "insufficient space for copy"
        );
        return Err(MoveError::InsufficientSpace {
            dir: dst_dir.to_path_buf(),
            required,
            available: free,
        });
    }
    Ok(())
}

#[cfg(unix)]
pub(super) fn free_space_bytes(path: &Path) -> io::Result<u64> {
    let mut s: libc::statvfs = unsafe { std::mem::zeroed() };
    let cpath = std::ffi::CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))?;
    let rc = unsafe { libc::statvfs(cpath.as_ptr(), &mut s) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    #[allow(clippy::unnecessary_cast)]
    Ok((s.f_bavail as u64).saturating_mul(s.f_frsize as u64))
}

#[cfg(windows)]
pub(super) fn free_space_bytes(path: &Path) -> io::Result<u64> {
    use std::iter::once;
    use windows_sys::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;
    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(once(0)).collect();
    let mut free_avail: u64 = 0;
    let mut _total: u64 = 0;
    let mut _total_free: u64 = 0;
    let ok = unsafe {
        GetDiskFreeSpaceExW(
            wide.as_ptr(),
            &mut free_avail as *mut u64,
            &mut _total as *mut u64,
            &mut _total_free as *mut u64,
        )
    };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(free_avail)
}
