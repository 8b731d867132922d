//! I/O helper utilities.
//!
//! Provides small adapters to enrich io::Error with actionable context/hints,
//! usable with map_err in anyhow::Result code paths, plus a bare hint lookup
//! for structured log fields.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create dir", dir))?;
//!   warn!(error = %e, hint = io_hint(&e).unwrap_or(""), "...");

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Platform-aware hint for common OS error codes, if one applies.
pub fn io_hint(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let hint = match code {
                libc::EACCES | libc::EPERM => {
                    Some("permission denied; check ownership and write permissions")
                }
                libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
                libc::EBUSY => Some("resource busy; ensure no other process is writing"),
                libc::ENOENT => Some("path not found; verify it exists"),
                libc::EEXIST => Some("already exists; pick a unique name or remove the target"),
                libc::ENOSPC => Some("insufficient space on device"),
                libc::EDQUOT => Some("disk quota exceeded"),
                libc::EROFS => Some("read-only filesystem; cannot write here"),
                libc::EIO => Some("low-level I/O error; check the device"),
                libc::ENAMETOOLONG => Some("filename or path too long; shorten path segments"),
                libc::EMFILE => {
                    Some("process file descriptor limit reached; close files or raise limits")
                }
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        #[cfg(windows)]
        {
            let hint = match code {
                5 => Some("access denied; check permissions"), // ERROR_ACCESS_DENIED
                17 => Some("not same device; cross-filesystem move"), // ERROR_NOT_SAME_DEVICE
                32 => Some("sharing violation; file is in use"), // ERROR_SHARING_VIOLATION
                2 | 3 => Some("path not found; verify it exists"),
                80 => Some("already exists; pick a unique name"), // ERROR_FILE_EXISTS
                112 => Some("insufficient disk space"),           // ERROR_DISK_FULL
                19 => Some("write protected / read-only media"),  // ERROR_WRITE_PROTECT
                206 => Some("filename or path too long"),         // ERROR_FILENAME_EXCED_RANGE
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => {
            Some("permission denied; check ownership and write permissions")
        }
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists; remove or choose a unique name"),
        _ => None,
    }
}

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = io_hint(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {}]", code));
    }
    msg
}

/// Adapter for anyhow::Result code.
/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_fallback_hint() {
        let e = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(io_hint(&e), Some("path not found; verify it exists"));
    }

    #[test]
    fn message_carries_op_and_path() {
        let e = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let err = io_error_with_help("create destination directory", Path::new("/x/y"))(e);
        let s = err.to_string();
        assert!(s.contains("create destination directory '/x/y'"));
        assert!(s.contains("permission denied"));
    }

    #[cfg(unix)]
    #[test]
    fn exdev_hint_from_os_code() {
        let e = io::Error::from_raw_os_error(libc::EXDEV);
        assert_eq!(io_hint(&e), Some("cross-filesystem; atomic rename not possible"));
    }
}
