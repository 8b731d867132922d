//! Core configuration types.
//! - Config holds the resolved runtime settings.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Where a configured root came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Command-line flag
    Flag,
    /// XML config file
    ConfigFile,
    /// Derived default (environment or executable location)
    #[default]
    Default,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Origin::Flag => "flag",
            Origin::ConfigFile => "config file",
            Origin::Default => "default",
        })
    }
}

/// Runtime configuration, assembled once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instance screenshots directory to drain
    pub source: PathBuf,
    /// Consolidated screenshots directory
    pub destination: PathBuf,
    pub source_origin: Origin,
    pub destination_origin: Origin,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Abort the whole run on the first failed move
    pub fail_fast: bool,
    /// If true, print actions but do not modify the filesystem
    pub dry_run: bool,
    /// Hold the destination run lock for the duration of the run
    pub use_lock: bool,
}

impl Config {
    /// Construct a Config with explicit roots; other fields use defaults.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            source_origin: Origin::default(),
            destination_origin: Origin::default(),
            log_level: LogLevel::Normal,
            log_file: None,
            fail_fast: false,
            dry_run: false,
            use_lock: true,
        }
    }
}
