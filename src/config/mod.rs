//! Configuration: types, default paths, XML loading, root resolution and validation.
//!
//! Precedence per field: CLI flag > XML config file > derived default.
//! The derived defaults are the only place the process environment is consulted;
//! everything downstream receives a finished [`Config`].

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use crate::errors::ConfigError;

pub use paths::{
    CONFIG_ENV, INSTANCE_DIR_ENV, SCREENSHOTS_SUBDIR, default_config_path,
    default_destination_from, default_log_path, default_source_from, path_has_symlink_ancestor,
};
pub use types::{Config, LogLevel, Origin};
pub use validate::validate_and_normalize;
pub use xml::{FileSettings, load_file_settings, locate_config_file, parse_file_settings};

/// A root directory and where its value came from.
pub type ResolvedRoot = (PathBuf, Origin);

/// Pick the source root: flag, then config file, then `$INST_MC_DIR/screenshots`.
/// The environment value is only consulted when nothing more specific was given.
pub fn resolve_source(
    flag: Option<PathBuf>,
    file: &FileSettings,
    instance_dir: impl FnOnce() -> Option<OsString>,
) -> Result<ResolvedRoot, ConfigError> {
    if let Some(p) = flag {
        return Ok((p, Origin::Flag));
    }
    if let Some(p) = file.source.clone() {
        return Ok((p, Origin::ConfigFile));
    }
    Ok((default_source_from(instance_dir())?, Origin::Default))
}

/// Pick the destination root: flag, then config file, then `<exe dir>/screenshots`.
pub fn resolve_destination_root(
    flag: Option<PathBuf>,
    file: &FileSettings,
    current_exe: impl FnOnce() -> io::Result<PathBuf>,
) -> Result<ResolvedRoot, ConfigError> {
    if let Some(p) = flag {
        return Ok((p, Origin::Flag));
    }
    if let Some(p) = file.destination.clone() {
        return Ok((p, Origin::ConfigFile));
    }
    let exe = current_exe().map_err(ConfigError::ExecutableDir)?;
    Ok((default_destination_from(&exe), Origin::Default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn no_env() -> Option<OsString> {
        None
    }

    #[test]
    fn flag_beats_file_and_env() {
        let file = FileSettings {
            source: Some(PathBuf::from("/from/file")),
            ..Default::default()
        };
        let (p, origin) =
            resolve_source(Some(PathBuf::from("/from/flag")), &file, || Some("/inst".into()))
                .unwrap();
        assert_eq!(p, PathBuf::from("/from/flag"));
        assert_eq!(origin, Origin::Flag);
    }

    #[test]
    fn file_beats_env() {
        let file = FileSettings {
            source: Some(PathBuf::from("/from/file")),
            ..Default::default()
        };
        let (p, origin) = resolve_source(None, &file, || Some("/inst".into())).unwrap();
        assert_eq!(p, PathBuf::from("/from/file"));
        assert_eq!(origin, Origin::ConfigFile);
    }

    #[test]
    fn env_default_appends_screenshots() {
        let (p, origin) =
            resolve_source(None, &FileSettings::default(), || Some("/inst".into())).unwrap();
        assert_eq!(p, Path::new("/inst").join(SCREENSHOTS_SUBDIR));
        assert_eq!(origin, Origin::Default);
    }

    #[test]
    fn missing_env_is_fatal() {
        let err = resolve_source(None, &FileSettings::default(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::MissingInstanceDir));
    }

    #[test]
    fn env_not_consulted_when_flag_given() {
        let mut called = false;
        let _ = resolve_source(Some(PathBuf::from("/x")), &FileSettings::default(), || {
            called = true;
            None
        });
        assert!(!called);
    }

    #[test]
    fn destination_defaults_next_to_executable() {
        let (p, origin) = resolve_destination_root(None, &FileSettings::default(), || {
            Ok(PathBuf::from("/opt/tools/prism_shots"))
        })
        .unwrap();
        assert_eq!(p, Path::new("/opt/tools").join(SCREENSHOTS_SUBDIR));
        assert_eq!(origin, Origin::Default);
    }

    #[test]
    fn executable_lookup_failure_is_fatal() {
        let err = resolve_destination_root(None, &FileSettings::default(), || {
            Err(io::Error::new(io::ErrorKind::NotFound, "no exe"))
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ExecutableDir(_)));
    }
}
