//! Destination name collision resolution.
//!
//! Policy: keep the requested name when it is free, otherwise append `_<n>` to the
//! stem (n = 1, 2, 3, ...) and take the first free candidate. The search is unbounded.
//!
//! Examples:
//! - "shot.png" -> "shot_1.png", "shot_2.png", ...
//! - ".env" -> ".env_1"
//! - "archive.tar.gz" -> "archive.tar_1.gz"
//!
//! Notes:
//! - Resolution only reads the filesystem. A file created between resolution and the
//!   move is not detected here; the no-clobber rename in `atomic` refuses it instead.
//! - Non-UTF-8 names are preserved (OsString throughout).

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// A name is taken when anything occupies it, including a dangling symlink.
pub fn path_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Final collision-free path for a file called `name` inside `dest_root`.
pub fn resolve_destination(dest_root: &Path, name: &OsStr) -> PathBuf {
    unique_destination(&dest_root.join(name))
}

/// Return `candidate` if free on disk, else the first free numbered variant.
pub fn unique_destination(candidate: &Path) -> PathBuf {
    unique_destination_with(candidate, path_taken)
}

/// Same as [`unique_destination`] but with a caller-supplied occupancy test.
/// Dry runs use this to also treat names planned earlier in the run as taken.
pub fn unique_destination_with<F>(candidate: &Path, mut taken: F) -> PathBuf
where
    F: FnMut(&Path) -> bool,
{
    if !taken(candidate) {
        return candidate.to_path_buf();
    }

    let stem: OsString = candidate
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    let ext: Option<OsString> = candidate.extension().map(|e| e.to_os_string());

    let mut n: u64 = 1;
    loop {
        let next = candidate.with_file_name(numbered_name(&stem, ext.as_deref(), n));
        if !taken(&next) {
            return next;
        }
        if n % 1000 == 0 {
            trace!(name = ?candidate.file_name(), attempts = n, "collision: still searching for a free suffix");
        }
        n += 1;
    }
}

// Conservative filename limits (bytes/characters, platform-specific and approximate).
#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240;
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255;

#[cfg(unix)]
fn name_len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// Build `stem_<n>[.ext]`, shortening the stem when the result would exceed
/// the filename limit so the suffix and extension always survive.
fn numbered_name(stem: &OsStr, ext: Option<&OsStr>, n: u64) -> OsString {
    let suffix = format!("_{n}");
    let mut overhead = suffix.len();
    if let Some(e) = ext {
        overhead += 1 + name_len_units(e);
    }

    let budget = MAX_FILENAME_LEN.saturating_sub(overhead).max(1);
    let stem = if name_len_units(stem) > budget {
        truncate_stem(stem, budget)
    } else {
        stem.to_os_string()
    };

    let mut name = stem;
    name.push(&suffix);
    if let Some(e) = ext {
        name.push(".");
        name.push(e);
    }
    name
}

fn truncate_stem(stem: &OsStr, budget: usize) -> OsString {
    if let Some(s) = stem.to_str() {
        let mut end = 0;
        for (idx, ch) in s.char_indices() {
            if idx + ch.len_utf8() > budget {
                break;
            }
            end = idx + ch.len_utf8();
        }
        return OsString::from(&s[..end.max(s.chars().next().map_or(0, char::len_utf8))]);
    }
    #[cfg(unix)]
    {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};
        let bytes = stem.as_bytes();
        OsString::from_vec(bytes[..bytes.len().min(budget)].to_vec())
    }
    #[cfg(not(unix))]
    {
        let lossy = stem.to_string_lossy();
        truncate_stem(OsStr::new(lossy.as_ref()), budget)
    }
}
