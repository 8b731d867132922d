//! Application orchestrator.
//! Builds the config, initializes logging, installs the Ctrl-C handler, validates
//! the roots and hands over to the run driver.

use anyhow::{Context, Result};
use tracing::{debug, error};

use prism_shots::cli::Args;
use prism_shots::output as out;
use prism_shots::{Config, run, shutdown, validate_and_normalize};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run_app(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        return print_config(&args);
    }

    let mut cfg = args.build_config().inspect_err(|e| {
        out::print_error(&format!("{e:#}"));
    })?;

    // Held until the run returns so the file appender flushes every line
    let _log_guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)
        .inspect_err(|e| out::print_error(&format!("Failed to initialize logging: {e:#}")))?;

    ctrlc::set_handler(on_interrupt).context("install Ctrl-C handler")?;

    debug!(?args, "starting prism_shots");

    if let Err(e) = validate_and_normalize(&mut cfg) {
        let e = anyhow::Error::new(e);
        error!(kind = "config", error = %format!("{e:#}"), "Invalid configuration");
        out::print_error(&format!("{e:#}"));
        return Err(e);
    }

    match run(&cfg) {
        Ok(report) => {
            if report.is_clean() {
                out::print_success(&report.summary());
            } else {
                out::print_warn(&report.summary());
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Run aborted");
            out::print_error(&format!("{e:#}"));
            Err(e)
        }
    }
}

/// Ctrl-C only raises the stop flag; the walk finishes the current file and
/// returns normally, so logging is torn down on the main thread.
fn on_interrupt() {
    shutdown::request();
    out::print_warn("Received interrupt; finishing the current file, then stopping...");
}

/// Print the config file in use and the resolved settings, then exit.
fn print_config(args: &Args) -> Result<()> {
    match args.config_file()? {
        Some(p) => out::print_user(&format!("config file: {}", p.display())),
        None => out::print_user("config file: (none)"),
    }
    let cfg: Config = args.build_config().inspect_err(|e| {
        out::print_error(&format!("{e:#}"));
    })?;
    out::print_user(&format!(
        "source: {} ({})",
        cfg.source.display(),
        cfg.source_origin
    ));
    out::print_user(&format!(
        "destination: {} ({})",
        cfg.destination.display(),
        cfg.destination_origin
    ));
    out::print_user(&format!("log level: {}", cfg.log_level));
    if let Some(lf) = &cfg.log_file {
        out::print_user(&format!("log file: {}", lf.display()));
    }
    out::print_user(&format!("fail fast: {}", cfg.fail_fast));
    out::print_user(&format!("run lock: {}", cfg.use_lock));
    Ok(())
}
