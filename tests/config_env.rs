use clap::Parser;
use serial_test::serial;
use std::ffi::OsString;
use std::fs;
use tempfile::tempdir;

use prism_shots::cli::Args;
use prism_shots::config::{CONFIG_ENV, INSTANCE_DIR_ENV, SCREENSHOTS_SUBDIR};
use prism_shots::{ConfigError, Origin};

fn args(extra: &[OsString]) -> Args {
    let mut argv: Vec<OsString> = vec!["prism_shots".into()];
    argv.extend_from_slice(extra);
    Args::parse_from(argv)
}

fn clear_env() {
    unsafe {
        std::env::remove_var(INSTANCE_DIR_ENV);
        std::env::remove_var(CONFIG_ENV);
    }
}

fn write_config(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let p = dir.join("config.xml");
    fs::write(&p, format!("<config>\n{body}\n</config>\n")).unwrap();
    p
}

#[test]
#[serial]
fn source_defaults_to_instance_screenshots() {
    let td = tempdir().unwrap();
    let cfg_file = write_config(td.path(), "");
    clear_env();
    unsafe {
        std::env::set_var(INSTANCE_DIR_ENV, td.path().join("inst"));
    }

    let cfg = args(&["--config".into(), cfg_file.into()]).build_config();
    clear_env();

    let cfg = cfg.unwrap();
    assert_eq!(cfg.source, td.path().join("inst").join(SCREENSHOTS_SUBDIR));
    assert_eq!(cfg.source_origin, Origin::Default);
    assert_eq!(cfg.destination.file_name().unwrap(), SCREENSHOTS_SUBDIR);
    assert_eq!(cfg.destination_origin, Origin::Default);
}

#[test]
#[serial]
fn missing_instance_dir_is_fatal() {
    let td = tempdir().unwrap();
    let cfg_file = write_config(td.path(), "");
    clear_env();

    let err = args(&["--config".into(), cfg_file.into()])
        .build_config()
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingInstanceDir)
    ));
}

#[test]
#[serial]
fn empty_instance_dir_is_fatal() {
    let td = tempdir().unwrap();
    let cfg_file = write_config(td.path(), "");
    clear_env();
    unsafe {
        std::env::set_var(INSTANCE_DIR_ENV, "");
    }

    let result = args(&["--config".into(), cfg_file.into()]).build_config();
    clear_env();
    assert!(result.is_err());
}

#[test]
#[serial]
fn config_file_from_env_beats_instance_default() {
    let td = tempdir().unwrap();
    let cfg_file = write_config(
        td.path(),
        "<source>from_file</source><destination>/srv/shots</destination><log_level>quiet</log_level>",
    );
    clear_env();
    unsafe {
        std::env::set_var(INSTANCE_DIR_ENV, td.path().join("inst"));
        std::env::set_var(CONFIG_ENV, &cfg_file);
    }

    let cfg = args(&[]).build_config();
    clear_env();

    let cfg = cfg.unwrap();
    // Relative paths in the file are anchored at the file's directory.
    assert_eq!(cfg.source, td.path().join("from_file"));
    assert_eq!(cfg.source_origin, Origin::ConfigFile);
    assert_eq!(cfg.destination, std::path::PathBuf::from("/srv/shots"));
    assert_eq!(cfg.log_level, prism_shots::LogLevel::Quiet);
}

#[test]
#[serial]
fn flags_beat_config_file() {
    let td = tempdir().unwrap();
    let cfg_file = write_config(
        td.path(),
        "<source>/file/src</source><log_level>quiet</log_level><fail_fast>false</fail_fast>",
    );
    clear_env();

    let cfg = args(&[
        "--config".into(),
        cfg_file.into(),
        "--from".into(),
        "/flag/src".into(),
        "--to".into(),
        "/flag/dst".into(),
        "--debug".into(),
        "--fail-fast".into(),
    ])
    .build_config()
    .unwrap();

    assert_eq!(cfg.source, std::path::PathBuf::from("/flag/src"));
    assert_eq!(cfg.source_origin, Origin::Flag);
    assert_eq!(cfg.destination, std::path::PathBuf::from("/flag/dst"));
    assert_eq!(cfg.log_level, prism_shots::LogLevel::Debug);
    assert!(cfg.fail_fast);
}

#[test]
#[serial]
fn missing_explicit_config_file_is_fatal() {
    let td = tempdir().unwrap();
    clear_env();
    let result = args(&[
        "--config".into(),
        td.path().join("nope.xml").into(),
        "--from".into(),
        "/a".into(),
        "--to".into(),
        "/b".into(),
    ])
    .build_config();
    assert!(result.is_err());
}

#[test]
#[serial]
fn malformed_config_file_is_fatal() {
    let td = tempdir().unwrap();
    let cfg_file = write_config(td.path(), "<sauce>/typo</sauce>");
    clear_env();
    let result = args(&[
        "--config".into(),
        cfg_file.into(),
        "--from".into(),
        "/a".into(),
        "--to".into(),
        "/b".into(),
    ])
    .build_config();
    assert!(result.is_err());
}
