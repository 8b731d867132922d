//! Config validation logic.
//! Makes both roots absolute, checks the source is a readable directory, and
//! rejects layouts where the walk would revisit files it just moved.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::ConfigError;

use super::types::Config;

/// Validate the roots in `cfg` and rewrite them as absolute paths.
/// The destination may be missing; the run creates it.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<(), ConfigError> {
    cfg.source = absolute(&cfg.source, "source directory")?;
    cfg.destination = absolute(&cfg.destination, "destination directory")?;

    ensure_readable_dir(&cfg.source, "source directory")?;
    if cfg.destination.exists() && !cfg.destination.is_dir() {
        return Err(ConfigError::NotADirectory {
            name: "destination directory",
            path: cfg.destination.clone(),
        });
    }

    // Compare resolved forms so symlinked roots cannot dodge the checks.
    let src_real = real_or_absolute(&cfg.source);
    let dst_real = real_or_absolute(&cfg.destination);
    if src_real == dst_real {
        return Err(ConfigError::SameDirectory(src_real));
    }
    if dst_real.starts_with(&src_real) {
        return Err(ConfigError::DestinationInsideSource {
            dest: dst_real,
            source_dir: src_real,
        });
    }

    debug!(
        source = %cfg.source.display(),
        destination = %cfg.destination.display(),
        "config validated"
    );
    Ok(())
}

fn absolute(path: &Path, name: &'static str) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|source| ConfigError::Absolute {
        name,
        path: path.to_path_buf(),
        source,
    })
}

/// Ensure path exists, is a directory, and its entries can be listed.
fn ensure_readable_dir(path: &Path, name: &'static str) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            name,
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory {
            name,
            path: path.to_path_buf(),
        });
    }
    fs::read_dir(path).map_err(|source| ConfigError::Unreadable {
        name,
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Canonical path when it exists; otherwise canonicalize the nearest existing
/// ancestor and re-append the missing tail.
fn real_or_absolute(path: &Path) -> PathBuf {
    if let Ok(real) = dunce::canonicalize(path) {
        return real;
    }
    let mut tail = Vec::new();
    let mut cur = path;
    while let Some(parent) = cur.parent() {
        if let Some(name) = cur.file_name() {
            tail.push(name.to_os_string());
        }
        if let Ok(real) = dunce::canonicalize(parent) {
            let mut out = real;
            for part in tail.iter().rev() {
                out.push(part);
            }
            return out;
        }
        cur = parent;
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn relative_roots_become_absolute() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let mut cfg = Config::new(&src, td.path().join("dst"));
        validate_and_normalize(&mut cfg).unwrap();
        assert!(cfg.source.is_absolute());
        assert!(cfg.destination.is_absolute());
    }

    #[test]
    fn missing_source_is_rejected() {
        let td = tempdir().unwrap();
        let mut cfg = Config::new(td.path().join("nope"), td.path().join("dst"));
        let err = validate_and_normalize(&mut cfg).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn source_file_is_rejected() {
        let td = tempdir().unwrap();
        let f = td.path().join("file");
        fs::write(&f, b"x").unwrap();
        let mut cfg = Config::new(&f, td.path().join("dst"));
        let err = validate_and_normalize(&mut cfg).unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory { .. }));
    }

    #[test]
    fn destination_file_is_rejected() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let dst = td.path().join("dst");
        fs::write(&dst, b"x").unwrap();
        let mut cfg = Config::new(&src, &dst);
        let err = validate_and_normalize(&mut cfg).unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory { .. }));
    }

    #[test]
    fn same_directory_is_rejected() {
        let td = tempdir().unwrap();
        let mut cfg = Config::new(td.path(), td.path().join("."));
        let err = validate_and_normalize(&mut cfg).unwrap_err();
        assert!(matches!(err, ConfigError::SameDirectory(_)));
    }

    #[test]
    fn missing_destination_inside_source_is_rejected() {
        let td = tempdir().unwrap();
        let mut cfg = Config::new(td.path(), td.path().join("a/b/out"));
        let err = validate_and_normalize(&mut cfg).unwrap_err();
        assert!(matches!(err, ConfigError::DestinationInsideSource { .. }));
    }

    #[test]
    fn source_inside_destination_is_allowed() {
        let td = tempdir().unwrap();
        let src = td.path().join("inst/screenshots");
        fs::create_dir_all(&src).unwrap();
        let mut cfg = Config::new(&src, td.path());
        validate_and_normalize(&mut cfg).unwrap();
    }
}
