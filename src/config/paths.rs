//! Default path helpers and symlink checks.
//! Derives the default source/destination roots and OS-appropriate config/log paths.

use dirs::{config_dir, data_dir};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Launcher-provided instance directory.
pub const INSTANCE_DIR_ENV: &str = "INST_MC_DIR";
/// Explicit config file location.
pub const CONFIG_ENV: &str = "PRISM_SHOTS_CONFIG";
/// Subdirectory holding screenshots, both in an instance and next to the executable.
pub const SCREENSHOTS_SUBDIR: &str = "screenshots";

/// `<instance dir>/screenshots`; an unset or empty instance dir is fatal.
pub fn default_source_from(instance_dir: Option<OsString>) -> Result<PathBuf, ConfigError> {
    match instance_dir {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir).join(SCREENSHOTS_SUBDIR)),
        _ => Err(ConfigError::MissingInstanceDir),
    }
}

/// `<directory of exe>/screenshots`.
pub fn default_destination_from(exe: &Path) -> PathBuf {
    exe.parent()
        .unwrap_or_else(|| Path::new("."))
        .join(SCREENSHOTS_SUBDIR)
}

/// Config file path: `$PRISM_SHOTS_CONFIG` if set, else the OS config dir.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(p));
    }
    if let Some(mut base) = config_dir() {
        base.push("prism_shots");
        base.push("config.xml");
        Some(base)
    } else {
        env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("prism_shots")
                .join("config.xml")
        })
    }
}

/// OS-appropriate default log file path (data dir). Suggested when file logging fails.
pub fn default_log_path() -> Option<PathBuf> {
    if let Some(mut base) = data_dir() {
        base.push("prism_shots");
        base.push("prism_shots.log");
        Some(base)
    } else {
        env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join(".local")
                .join("share")
                .join("prism_shots")
                .join("prism_shots.log")
        })
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
