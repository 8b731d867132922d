//! Typed error definitions for prism_shots.
//! Each relocation step has its own variant so logs and tests can tell them apart.
//! Messages describe the failed step only; the underlying I/O error is reachable
//! through `source()`, so `{:#}` chains print it exactly once.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while relocating a single file.
///
/// Every variant except [`MoveError::SourceRemoval`] leaves the source file untouched.
/// `SourceRemoval` means the destination is complete and verified but the original
/// could not be deleted, so two copies now exist.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("failed to resolve absolute path of {path}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source file {0} has no file name")]
    NoFileName(PathBuf),

    #[error("failed to stat source file {path}")]
    SourceStat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open source file {path}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not enough free space in {dir}: need {required} bytes, have {available} bytes")]
    InsufficientSpace {
        dir: PathBuf,
        required: u64,
        available: u64,
    },

    #[error("failed to create destination file {path}")]
    DestinationCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {src} -> {dest}")]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to sync destination file {path} with the filesystem")]
    Sync {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to close destination file {path}")]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("copy verification failed for {path} (expected {expected} bytes, got {copied})")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        copied: u64,
    },

    #[error("failed to move verified copy {staged} into place at {dest}")]
    Promote {
        staged: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("copied to {dest} but failed to remove source {src}")]
    SourceRemoval {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> i32 {
        match self {
            MoveError::PathResolution { .. } => 10,
            MoveError::NoFileName(_) => 11,
            MoveError::SourceStat { .. } => 20,
            MoveError::SourceOpen { .. } => 21,
            MoveError::InsufficientSpace { .. } => 30,
            MoveError::DestinationCreate { .. } => 31,
            MoveError::Copy { .. } => 40,
            MoveError::Sync { .. } => 41,
            MoveError::Close { .. } => 42,
            MoveError::SizeMismatch { .. } => 43,
            MoveError::Promote { .. } => 44,
            MoveError::SourceRemoval { .. } => 50,
        }
    }

    /// Short snake_case label, used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            MoveError::PathResolution { .. } => "path_resolution",
            MoveError::NoFileName(_) => "no_file_name",
            MoveError::SourceStat { .. } => "source_stat",
            MoveError::SourceOpen { .. } => "source_open",
            MoveError::InsufficientSpace { .. } => "insufficient_space",
            MoveError::DestinationCreate { .. } => "destination_create",
            MoveError::Copy { .. } => "copy",
            MoveError::Sync { .. } => "sync",
            MoveError::Close { .. } => "close",
            MoveError::SizeMismatch { .. } => "size_mismatch",
            MoveError::Promote { .. } => "promote",
            MoveError::SourceRemoval { .. } => "source_removal",
        }
    }

    /// True when a complete, verified copy exists at the destination.
    pub fn destination_complete(&self) -> bool {
        matches!(self, MoveError::SourceRemoval { .. })
    }
}

/// A directory entry the walker could not read. The subtree below it is skipped.
#[derive(Debug, Error)]
#[error("failed to access {}", display_opt(.path))]
pub struct EnumerationError {
    pub path: Option<PathBuf>,
    #[source]
    pub source: walkdir::Error,
}

fn display_opt(path: &Option<PathBuf>) -> String {
    path.as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".into())
}

/// Unrecoverable configuration problems. These abort before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("source directory not specified and environment variable INST_MC_DIR has no value")]
    MissingInstanceDir,

    #[error("failed to locate the running executable")]
    ExecutableDir(#[source] io::Error),

    #[error("{name} does not exist: {path}")]
    NotFound { name: &'static str, path: PathBuf },

    #[error("{name} is not a directory: {path}")]
    NotADirectory { name: &'static str, path: PathBuf },

    #[error("cannot read {name} '{path}'")]
    Unreadable {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to get absolute path of {name} {path}")]
    Absolute {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source and destination resolve to the same directory: {0}")]
    SameDirectory(PathBuf),

    #[error("destination {dest} must not be inside source {source_dir}")]
    DestinationInsideSource { dest: PathBuf, source_dir: PathBuf },

    #[error("another prism_shots run holds the lock on {0}")]
    Locked(PathBuf),
}
