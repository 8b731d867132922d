//! Run driver.
//! Walks the source root and relocates each file into the destination root,
//! one at a time, under the destination run lock.
//!
//! Policy:
//! - Enumeration errors are logged and counted; the walk continues.
//! - Move failures are logged with both paths. With `fail_fast` the first one
//!   ends the run with an error; otherwise the walk continues.
//! - A failed source removal leaves a verified destination behind and is only a
//!   warning in both modes.
//! - A shutdown request is honored between files.

use anyhow::Result;
use std::collections::HashSet;
use std::error::Error as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::errors::{ConfigError, MoveError};
use crate::fs_ops::{
    MoveMethod, MoveOutcome, io_error_with_help, io_hint, path_taken, relocate,
    try_acquire_run_lock, unique_destination_with,
};
use crate::shutdown;
use crate::walk::ScreenshotWalker;

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Moved by same-volume rename
    pub renamed: usize,
    /// Moved by verified copy
    pub copied: usize,
    /// Left at the source because the move failed
    pub failed: usize,
    /// Copied and verified, but the source could not be removed
    pub duplicated: usize,
    /// Entries the walker could not read
    pub skipped: usize,
    /// Dry-run only: moves that would have happened
    pub planned: usize,
    /// Stopped early on a shutdown request
    pub interrupted: bool,
    /// Nothing was changed on disk
    pub dry_run: bool,
}

impl RunReport {
    pub fn moved(&self) -> usize {
        self.renamed + self.copied
    }

    /// One-line summary for the end of a run.
    pub fn summary(&self) -> String {
        let mut s = if self.dry_run {
            format!("{} planned", self.planned)
        } else {
            format!(
                "{} moved ({} renamed, {} copied)",
                self.moved(),
                self.renamed,
                self.copied
            )
        };
        if self.failed > 0 {
            s.push_str(&format!(", {} failed", self.failed));
        }
        if self.duplicated > 0 {
            s.push_str(&format!(", {} left at both locations", self.duplicated));
        }
        if self.skipped > 0 {
            s.push_str(&format!(", {} unreadable entries skipped", self.skipped));
        }
        if self.interrupted {
            s.push_str(" (interrupted)");
        }
        s
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.duplicated == 0 && self.skipped == 0 && !self.interrupted
    }
}

/// Relocate every file under `cfg.source` into `cfg.destination`.
///
/// `cfg` is expected to have passed `validate_and_normalize`.
pub fn run(cfg: &Config) -> Result<RunReport> {
    run_with(cfg, relocate)
}

/// [`run`] with the per-file move supplied by the caller.
fn run_with<F>(cfg: &Config, mut move_one: F) -> Result<RunReport>
where
    F: FnMut(&Path, &Path) -> Result<MoveOutcome, MoveError>,
{
    info!(
        source = %cfg.source.display(),
        source_origin = %cfg.source_origin,
        destination = %cfg.destination.display(),
        destination_origin = %cfg.destination_origin,
        dry_run = cfg.dry_run,
        fail_fast = cfg.fail_fast,
        "Starting screenshot relocation"
    );

    if cfg.dry_run {
        return plan(cfg);
    }

    ensure_destination(&cfg.destination)?;

    let _lock = if cfg.use_lock {
        match try_acquire_run_lock(&cfg.destination)
            .map_err(io_error_with_help("acquire run lock in", &cfg.destination))?
        {
            Some(lock) => {
                debug!(lock = %lock.path().display(), "holding run lock");
                Some(lock)
            }
            None => return Err(ConfigError::Locked(cfg.destination.clone()).into()),
        }
    } else {
        debug!("run lock disabled");
        None
    };

    let mut report = RunReport::default();
    for item in ScreenshotWalker::new(&cfg.source) {
        if shutdown::is_requested() {
            warn!("Shutdown requested; stopping before the next file");
            report.interrupted = true;
            break;
        }

        let src = match item {
            Ok(p) => p,
            Err(e) => {
                warn!(path = ?e.path, error = %error_chain(&e), "Skipping unreadable entry");
                report.skipped += 1;
                continue;
            }
        };

        match move_one(&src, &cfg.destination) {
            Ok(outcome) => {
                info!(
                    src = %src.display(),
                    dest = %outcome.dest.display(),
                    method = ?outcome.method,
                    "Moved {} -> {}",
                    src.display(),
                    outcome.dest.display()
                );
                match outcome.method {
                    MoveMethod::Renamed => report.renamed += 1,
                    MoveMethod::Copied => report.copied += 1,
                }
            }
            Err(e) if e.destination_complete() => {
                warn!(
                    code = e.code(),
                    kind = e.kind(),
                    hint = move_hint(&e).unwrap_or(""),
                    src = %src.display(),
                    "{}",
                    error_chain(&e)
                );
                report.duplicated += 1;
            }
            Err(e) => {
                error!(
                    code = e.code(),
                    kind = e.kind(),
                    hint = move_hint(&e).unwrap_or(""),
                    src = %src.display(),
                    dest_dir = %cfg.destination.display(),
                    "Move failed: {}",
                    error_chain(&e)
                );
                report.failed += 1;
                if cfg.fail_fast {
                    return Err(anyhow::Error::new(e).context(format!(
                        "aborting run (fail-fast) after failing to move {}",
                        src.display()
                    )));
                }
            }
        }
    }

    info!(
        renamed = report.renamed,
        copied = report.copied,
        failed = report.failed,
        duplicated = report.duplicated,
        skipped = report.skipped,
        interrupted = report.interrupted,
        "Run finished"
    );
    Ok(report)
}

/// Dry run: resolve every destination without touching the filesystem.
fn plan(cfg: &Config) -> Result<RunReport> {
    let mut report = RunReport {
        dry_run: true,
        ..Default::default()
    };
    let mut planned: HashSet<PathBuf> = HashSet::new();

    for item in ScreenshotWalker::new(&cfg.source) {
        if shutdown::is_requested() {
            report.interrupted = true;
            break;
        }
        let src = match item {
            Ok(p) => p,
            Err(e) => {
                warn!(path = ?e.path, error = %error_chain(&e), "Skipping unreadable entry");
                report.skipped += 1;
                continue;
            }
        };
        let Some(name) = src.file_name() else {
            continue;
        };
        let dest = unique_destination_with(&cfg.destination.join(name), |p| {
            planned.contains(p) || path_taken(p)
        });
        info!(src = %src.display(), dest = %dest.display(), "Would move {} -> {}", src.display(), dest.display());
        planned.insert(dest);
        report.planned += 1;
    }
    Ok(report)
}

fn ensure_destination(dest: &Path) -> Result<()> {
    if dest.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dest).map_err(io_error_with_help("create destination directory", dest))?;
    info!(path = %dest.display(), "Created destination directory");
    Ok(())
}

/// `error: cause: cause...` on one line.
fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    anyhow::Chain::new(e)
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

/// Platform hint for the I/O error underneath a move failure, if any.
fn move_hint(e: &MoveError) -> Option<&'static str> {
    e.source()
        .and_then(|s| s.downcast_ref::<io::Error>())
        .and_then(io_hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, Config) {
        let td = tempdir().unwrap();
        let src = td.path().join("inst/screenshots");
        fs::create_dir_all(&src).unwrap();
        let cfg = Config::new(&src, td.path().join("all"));
        (td, cfg)
    }

    #[test]
    #[serial]
    fn moves_everything_and_creates_destination() {
        let (_td, cfg) = setup();
        fs::write(cfg.source.join("a.png"), b"a").unwrap();
        fs::create_dir_all(cfg.source.join("sub")).unwrap();
        fs::write(cfg.source.join("sub/b.png"), b"b").unwrap();

        let report = run(&cfg).unwrap();
        assert_eq!(report.moved(), 2);
        assert!(report.is_clean());
        assert_eq!(fs::read(cfg.destination.join("a.png")).unwrap(), b"a");
        assert_eq!(fs::read(cfg.destination.join("b.png")).unwrap(), b"b");
        assert!(!cfg.source.join("a.png").exists());
        // Lock file is gone after the run.
        assert!(!cfg.destination.join(".prism_shots.lock").exists());
    }

    #[test]
    #[serial]
    fn same_names_from_subdirectories_both_survive() {
        let (_td, cfg) = setup();
        fs::create_dir_all(cfg.source.join("x")).unwrap();
        fs::write(cfg.source.join("s.png"), b"top").unwrap();
        fs::write(cfg.source.join("x/s.png"), b"nested").unwrap();

        run(&cfg).unwrap();
        let mut got = vec![
            fs::read(cfg.destination.join("s.png")).unwrap(),
            fs::read(cfg.destination.join("s_1.png")).unwrap(),
        ];
        got.sort();
        assert_eq!(got, vec![b"nested".to_vec(), b"top".to_vec()]);
    }

    #[test]
    #[serial]
    fn dry_run_changes_nothing_and_plans_numbered_names() {
        let (_td, mut cfg) = setup();
        cfg.dry_run = true;
        fs::create_dir_all(cfg.source.join("x")).unwrap();
        fs::write(cfg.source.join("s.png"), b"1").unwrap();
        fs::write(cfg.source.join("x/s.png"), b"2").unwrap();

        let report = run(&cfg).unwrap();
        assert_eq!(report.planned, 2);
        assert_eq!(report.moved(), 0);
        assert_eq!(report.summary(), "2 planned");
        assert!(!cfg.destination.exists());
        assert!(cfg.source.join("s.png").exists());
        assert!(cfg.source.join("x/s.png").exists());
    }

    #[test]
    #[serial]
    fn held_lock_is_fatal() {
        let (_td, cfg) = setup();
        fs::create_dir_all(&cfg.destination).unwrap();
        fs::write(cfg.source.join("a.png"), b"a").unwrap();
        let _held = try_acquire_run_lock(&cfg.destination).unwrap().unwrap();

        let err = run(&cfg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Locked(_))
        ));
        assert!(cfg.source.join("a.png").exists());
    }

    #[test]
    #[serial]
    fn no_lock_ignores_held_lock() {
        let (_td, mut cfg) = setup();
        cfg.use_lock = false;
        fs::create_dir_all(&cfg.destination).unwrap();
        fs::write(cfg.source.join("a.png"), b"a").unwrap();
        let _held = try_acquire_run_lock(&cfg.destination).unwrap().unwrap();

        let report = run(&cfg).unwrap();
        assert_eq!(report.moved(), 1);
    }

    #[test]
    #[serial]
    fn shutdown_stops_before_first_file() {
        let (_td, cfg) = setup();
        fs::write(cfg.source.join("a.png"), b"a").unwrap();
        shutdown::request();
        let report = run(&cfg);
        shutdown::reset();

        let report = report.unwrap();
        assert!(report.interrupted);
        assert_eq!(report.moved(), 0);
        assert!(cfg.source.join("a.png").exists());
    }

    /// Mover that fails `name` with a copy error and relocates everything else.
    fn failing_on(
        name: &'static str,
    ) -> impl FnMut(&Path, &Path) -> Result<MoveOutcome, MoveError> {
        move |src: &Path, dest_root: &Path| {
            if src.file_name() == Some(std::ffi::OsStr::new(name)) {
                Err(MoveError::Copy {
                    src: src.to_path_buf(),
                    dest: dest_root.join(name),
                    source: io::Error::other("disk fell off"),
                })
            } else {
                relocate(src, dest_root)
            }
        }
    }

    fn three_files(cfg: &Config) {
        for n in ["a.png", "b.png", "c.png"] {
            fs::write(cfg.source.join(n), n.as_bytes()).unwrap();
        }
    }

    #[test]
    #[serial]
    fn failures_are_counted_and_walk_continues() {
        let (_td, cfg) = setup();
        three_files(&cfg);

        let report = run_with(&cfg, failing_on("b.png")).unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.moved(), 2);
        assert_eq!(
            report.summary(),
            "2 moved (2 renamed, 0 copied), 1 failed"
        );
        assert_eq!(fs::read(cfg.source.join("b.png")).unwrap(), b"b.png");
        assert!(cfg.destination.join("a.png").exists());
        assert!(cfg.destination.join("c.png").exists());
        assert!(!cfg.destination.join("b.png").exists());
    }

    #[test]
    #[serial]
    fn fail_fast_stops_at_first_failure() {
        let (_td, mut cfg) = setup();
        cfg.fail_fast = true;
        three_files(&cfg);

        let err = run_with(&cfg, failing_on("b.png")).unwrap_err();

        let msg = format!("{err:#}");
        assert!(msg.contains("fail-fast"), "{msg}");
        assert!(msg.contains("b.png"), "{msg}");
        assert_eq!(msg.matches("disk fell off").count(), 1, "{msg}");
        assert!(matches!(
            err.downcast_ref::<MoveError>(),
            Some(MoveError::Copy { .. })
        ));
        // Files before the failure moved; the failed one and everything after stay put.
        assert!(cfg.destination.join("a.png").exists());
        assert!(cfg.source.join("b.png").exists());
        assert!(cfg.source.join("c.png").exists());
        assert!(!cfg.destination.join("c.png").exists());
    }

    #[test]
    #[serial]
    fn undeletable_source_is_a_warning_even_with_fail_fast() {
        let (_td, mut cfg) = setup();
        cfg.fail_fast = true;
        fs::write(cfg.source.join("a.png"), b"kept twice").unwrap();
        fs::write(cfg.source.join("b.png"), b"b").unwrap();

        let copy_but_keep_a = |src: &Path, dest_root: &Path| {
            if src.file_name() == Some(std::ffi::OsStr::new("a.png")) {
                let dest = dest_root.join("a.png");
                fs::copy(src, &dest).unwrap();
                Err(MoveError::SourceRemoval {
                    src: src.to_path_buf(),
                    dest,
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "unlink refused"),
                })
            } else {
                relocate(src, dest_root)
            }
        };
        let report = run_with(&cfg, copy_but_keep_a).unwrap();

        assert_eq!(report.duplicated, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.moved(), 1);
        assert!(!report.is_clean());
        assert!(report.summary().contains("1 left at both locations"));
        assert_eq!(
            fs::read(cfg.destination.join("a.png")).unwrap(),
            b"kept twice"
        );
        assert!(cfg.source.join("a.png").exists());
        assert!(!cfg.source.join("b.png").exists());
    }

    #[test]
    fn error_chain_lists_each_cause_once() {
        let e = MoveError::Sync {
            path: PathBuf::from("/d/x.png"),
            source: io::Error::other("device gone"),
        };
        let line = error_chain(&e);
        assert!(line.starts_with("failed to sync destination file /d/x.png"));
        assert_eq!(line.matches("device gone").count(), 1);
    }

    #[test]
    fn summary_mentions_failures() {
        let r = RunReport {
            renamed: 2,
            copied: 1,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(r.summary(), "3 moved (2 renamed, 1 copied), 1 failed");
        assert!(!r.is_clean());
    }
}
