//! Core library for `prism_shots`.
//!
//! Moves every screenshot out of a game instance's screenshots folder into one
//! shared folder. Files are never overwritten: a taken name gets a numbered
//! suffix. A file is either renamed in place on the same volume, or copied,
//! synced and length-checked before the original is removed.
//!
//! Layout:
//! - `config`: Config type, XML file, defaults and validation.
//! - `fs_ops`: collision resolver and the relocation engine.
//! - `walk`: recursive file enumeration.
//! - `run`: the per-file driver and its report.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod run;
pub mod shutdown;
pub mod walk;

pub use config::{
    Config, LogLevel, Origin, default_config_path, default_log_path, path_has_symlink_ancestor,
    validate_and_normalize,
};
pub use errors::{ConfigError, EnumerationError, MoveError};
pub use fs_ops::{
    MoveMethod, MoveOutcome, copy_verify_delete, relocate, resolve_destination, safe_move,
    unique_destination, unique_destination_with,
};
pub use run::{RunReport, run};
pub use walk::ScreenshotWalker;
