//! Configuration management for iopid.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use anyhow::{bail, Context};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Locations searched when no `--config` is given.
const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "/etc/iopid/iopid.yaml",
    "./iopid.yaml",
    "./iopid.json",
    "./iopid.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,

    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    /// Repeat the header per screen and on resize when stdout is a terminal
    #[serde(alias = "redraw-header")]
    pub redraw_header: Option<bool>,

    /// Stop after this many samples
    pub count: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
            redraw_header: Some(true),
            count: None,
        }
    }
}

impl Config {
    pub fn proc_root(&self) -> &Path {
        self.proc_root
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_PROC_ROOT))
    }

    /// Parsed log level; validation guarantees the string is known.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(|s| LogLevel::from_str(s, true).ok())
            .unwrap_or(LogLevel::Warn)
    }
}

/// Validate effective config (used at startup and by --show-config)
pub fn validate_effective_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg
        .proc_root
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        bail!("proc_root must not be empty");
    }

    if cfg.count == Some(0) {
        bail!("count must be at least 1");
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_str(level, true).is_err() {
            bail!(
                "Invalid log_level '{}', expected one of off, error, warn, info, debug, trace",
                level
            );
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(level) = args.log_level {
        config.log_level = level
            .to_possible_value()
            .map(|v| v.get_name().to_string());
    }
    if args.no_redraw {
        config.redraw_header = Some(false);
    }
    if args.count.is_some() {
        config.count = args.count;
    }

    Ok(config)
}

/// Loads the config file at `path`, or the first default location that
/// exists. No file at all means defaults; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match DEFAULT_CONFIG_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
        {
            Some(p) => p.to_path_buf(),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.display()))?;

    let parsed: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("parsing JSON config {}", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("parsing TOML config {}", path.display()))?,
        // Default to YAML
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("parsing YAML config {}", path.display()))?,
    };

    Ok(merge_defaults(parsed))
}

/// Fills fields the file left out with their defaults.
fn merge_defaults(parsed: Config) -> Config {
    let defaults = Config::default();
    Config {
        proc_root: parsed.proc_root.or(defaults.proc_root),
        log_level: parsed.log_level.or(defaults.log_level),
        redraw_header: parsed.redraw_header.or(defaults.redraw_header),
        count: parsed.count.or(defaults.count),
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> anyhow::Result<()> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };

    println!("{output}");
    Ok(())
}
