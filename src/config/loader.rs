//! Configuration file loading with precedence handling.

use crate::merge::DEFAULT_MAX_DEPTH;
use crate::select::DEFAULT_SPACER;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CMSLAYOUT_CONFIG";
/// Environment variable overriding the templates directory.
pub const TEMPLATES_DIR_ENV: &str = "CMSLAYOUT_TEMPLATES_DIR";
/// Environment variable overriding the tree spacer.
pub const SPACER_ENV: &str = "CMSLAYOUT_SPACER";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/cmslayout/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Indentation unit for tree listings.
    #[serde(default)]
    pub spacer: Option<String>,

    /// Deepest layout chain walked before failing.
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Whether css is reprocessed on every request.
    #[serde(default)]
    pub css_force_reload: Option<bool>,

    /// Directory scanned for built-in application templates.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Indentation unit for tree listings.
    pub spacer: String,
    /// Deepest layout chain walked before failing.
    pub max_depth: usize,
    /// Reprocess css on every request instead of memoizing.
    pub css_force_reload: bool,
    /// Directory scanned by `bootstrap`.
    pub templates_dir: PathBuf,
    /// File receiving tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            spacer: DEFAULT_SPACER.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            css_force_reload: true,
            templates_dir: PathBuf::from("app/views/layouts"),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/cmslayout/cmslayout.log` on Unix-like systems,
/// or the platform state directory elsewhere. Falls back to the current
/// directory when no state directory is known.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("cmslayout").join("cmslayout.log")
    } else {
        PathBuf::from("cmslayout.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    if config.max_depth == Some(0) {
        return Err(ConfigError::InvalidValue {
            key: "max_depth",
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/cmslayout/config.toml` on Unix, appropriate path on other platforms.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cmslayout").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CMSLAYOUT_CONFIG` environment variable
/// 3. Default path `~/.config/cmslayout/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        spacer: config.spacer.unwrap_or(defaults.spacer),
        max_depth: config.max_depth.unwrap_or(defaults.max_depth),
        css_force_reload: config.css_force_reload.unwrap_or(defaults.css_force_reload),
        templates_dir: config.templates_dir.unwrap_or(defaults.templates_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `CMSLAYOUT_TEMPLATES_DIR` and `CMSLAYOUT_SPACER`.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(dir) = std::env::var(TEMPLATES_DIR_ENV) {
        config.templates_dir = PathBuf::from(dir);
    }
    if let Ok(spacer) = std::env::var(SPACER_ENV) {
        config.spacer = spacer;
    }
    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Only flags the user actually passed are applied.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    templates_dir_override: Option<PathBuf>,
    max_depth_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(dir) = templates_dir_override {
        config.templates_dir = dir;
    }
    if let Some(max_depth) = max_depth_override {
        config.max_depth = max_depth;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
