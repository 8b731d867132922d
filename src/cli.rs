//! CLI definition and parsing.
//! Defines Args and builds the runtime Config from flags, the XML file and defaults.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug and wins over it.
//! - Only the root defaults read the environment (INST_MC_DIR, the executable path).

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use std::env;
use std::path::PathBuf;

use crate::config::{
    CONFIG_ENV, Config, FileSettings, INSTANCE_DIR_ENV, LogLevel, load_file_settings,
    locate_config_file, resolve_destination_root, resolve_source,
};

/// Move every screenshot from a game instance into one shared folder.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Move instance screenshots into one shared folder without losing any"
)]
pub struct Args {
    /// Source directory (default: $INST_MC_DIR/screenshots).
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub from: Option<PathBuf>,

    /// Destination directory (default: `screenshots` next to the executable).
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub to: Option<PathBuf>,

    /// XML config file (default: $PRISM_SHOTS_CONFIG, then the OS config dir).
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL", help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<LogLevel>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Also write logs to this file.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    #[arg(long, help = "Stop at the first file that cannot be moved and exit non-zero")]
    pub fail_fast: bool,

    /// Dry-run: log actions but do not modify the filesystem.
    #[arg(
        long,
        help = "Show what would be moved, but do not modify files/directories"
    )]
    pub dry_run: bool,

    /// Skip the destination run lock (for filesystems where flock fails).
    #[arg(long, help = "Do not take the run lock in the destination directory")]
    pub no_lock: bool,

    #[arg(long, help = "Print the resolved configuration and exit")]
    pub print_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.clone()
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    /// Roots are resolved separately since they carry an origin.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if self.fail_fast {
            cfg.fail_fast = true;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.no_lock {
            cfg.use_lock = false;
        }
    }

    /// Explicit config file: --config, then $PRISM_SHOTS_CONFIG.
    fn explicit_config(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            env::var_os(CONFIG_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }

    /// The config file this invocation reads, if any.
    pub fn config_file(&self) -> Result<Option<PathBuf>> {
        locate_config_file(self.explicit_config().as_deref())
    }

    /// Assemble the runtime Config: flag > XML file > derived default.
    pub fn build_config(&self) -> Result<Config> {
        let file = match self.config_file()? {
            Some(path) => load_file_settings(&path)?,
            None => FileSettings::default(),
        };

        let (source, source_origin) =
            resolve_source(self.from.clone(), &file, || env::var_os(INSTANCE_DIR_ENV))
                .context("resolve source directory")?;
        let (destination, destination_origin) =
            resolve_destination_root(self.to.clone(), &file, env::current_exe)
                .context("resolve destination directory")?;

        let mut cfg = Config::new(source, destination);
        cfg.source_origin = source_origin;
        cfg.destination_origin = destination_origin;
        file.apply(&mut cfg);
        self.apply_overrides(&mut cfg);
        Ok(cfg)
    }
}

pub fn parse() -> Args {
    Args::parse()
}
