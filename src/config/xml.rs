//! XML configuration support.
//!
//! Uses quick-xml + serde to parse an optional <config> file:
//! <config>
//!   <source>/path/to/instance/screenshots</source>
//!   <destination>/path/to/screenshots</destination>
//!   <log_level>normal</log_level>
//!   <log_file>/path/to/prism_shots.log</log_file>
//!   <fail_fast>false</fail_fast>
//! </config>
//!
//! Notes:
//! - Every element is optional; empty elements count as absent.
//! - Unknown elements are rejected so typos surface instead of being ignored.
//! - Relative paths are taken relative to the config file's directory.

use anyhow::{Context, Result, anyhow};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::{CONFIG_ENV, default_config_path};
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    source: Option<String>,
    destination: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    fail_fast: Option<bool>,
}

/// Settings read from a config file, already cleaned up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSettings {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
    pub fail_fast: Option<bool>,
}

impl FileSettings {
    /// Copy the non-root settings onto `cfg`. Roots are resolved separately.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if let Some(ff) = self.fail_fast {
            cfg.fail_fast = ff;
        }
    }
}

fn non_empty_path(value: Option<String>, base_dir: &Path) -> Option<PathBuf> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let p = PathBuf::from(trimmed);
    Some(if p.is_relative() { base_dir.join(p) } else { p })
}

/// Parse config XML. `base_dir` anchors relative paths.
pub fn parse_file_settings(xml: &str, base_dir: &Path) -> Result<FileSettings> {
    let parsed: XmlConfig = from_xml_str(xml).context("parse config xml")?;

    let log_level = match parsed.log_level.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(s.parse::<LogLevel>().map_err(|e| anyhow!(e))?),
    };

    Ok(FileSettings {
        source: non_empty_path(parsed.source, base_dir),
        destination: non_empty_path(parsed.destination, base_dir),
        log_level,
        log_file: non_empty_path(parsed.log_file, base_dir),
        fail_fast: parsed.fail_fast,
    })
}

/// Load and parse a config file from a specific path.
pub fn load_file_settings(path: &Path) -> Result<FileSettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let settings = parse_file_settings(&contents, base_dir)
        .with_context(|| format!("in config file '{}'", path.display()))?;
    debug!(path = %path.display(), ?settings, "loaded config file");
    Ok(settings)
}

/// Which config file to read, if any.
///
/// An explicit path (flag or `$PRISM_SHOTS_CONFIG`) must exist; the OS default
/// location is optional and silently skipped when absent.
pub fn locate_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(p) = explicit {
        if !p.is_file() {
            anyhow::bail!("config file not found: {}", p.display());
        }
        return Ok(Some(p.to_path_buf()));
    }
    let from_env = std::env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty());
    match default_config_path() {
        Some(p) if p.is_file() => Ok(Some(p)),
        Some(p) if from_env => Err(anyhow!(
            "config file named by {CONFIG_ENV} not found: {}",
            p.display()
        )),
        _ => Ok(None),
    }
}
