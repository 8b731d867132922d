//! Windows implementations of platform helpers.
//!
//! Notes:
//! - Windows lacks POSIX mode semantics; we do not attempt ACL management here.
//! - Volume identity is taken from the path prefix (drive letter or UNC share).

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Component, Path};

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn volume_of(path: &Path) -> Option<OsString> {
    match path.components().next() {
        Some(Component::Prefix(prefix)) => Some(prefix.as_os_str().to_ascii_uppercase()),
        _ => None,
    }
}

/// True when both absolute paths carry the same volume prefix.
pub fn same_volume(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(volume_of(a) == volume_of(b))
}

/// Windows reports deferred write failures through FlushFileBuffers (our prior
/// sync_all), and CloseHandle has nothing further to surface.
pub fn close_checked(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_letters_compare_case_insensitively() {
        assert!(same_volume(Path::new(r"C:\a"), Path::new(r"c:\b")).unwrap());
        assert!(!same_volume(Path::new(r"C:\a"), Path::new(r"D:\a")).unwrap());
    }
}
