use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix shared by every file this tool creates for itself (staging files, run lock).
pub(crate) const INTERNAL_PREFIX: &str = ".prism_shots.";

pub(crate) fn unique_temp_path(dst_dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dst_dir.join(format!("{INTERNAL_PREFIX}{pid}.{nanos}.tmp"))
}

/// File name of the run lock inside the destination directory.
pub(crate) const LOCK_NAME: &str = ".prism_shots.lock";

/// True for our run lock and for staging files named `.prism_shots.<pid>.<nanos>.tmp`.
/// Any other name, even one sharing the prefix, is an ordinary file.
pub(crate) fn is_internal_name(name: &OsStr) -> bool {
    let Some(s) = name.to_str() else {
        return false;
    };
    if s == LOCK_NAME {
        return true;
    }
    let Some(middle) = s
        .strip_prefix(INTERNAL_PREFIX)
        .and_then(|rest| rest.strip_suffix(".tmp"))
    else {
        return false;
    };
    match middle.split_once('.') {
        Some((pid, nanos)) => all_digits(pid) && all_digits(nanos),
        None => false,
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn is_cross_device(e: &io::Error) -> bool {
    // std::io::ErrorKind has no stable CrossDeviceLink variant,
    // so detect EXDEV / ERROR_NOT_SAME_DEVICE via raw OS error codes.
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            if code == libc::EXDEV {
                return true;
            }
        }
        #[cfg(windows)]
        {
            // ERROR_NOT_SAME_DEVICE
            if code == 17 {
                return true;
            }
        }
    }
    false
}

#[cfg(unix)]
pub(crate) fn fsync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(windows)]
pub(crate) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
