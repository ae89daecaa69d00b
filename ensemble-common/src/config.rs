//! Engine configuration loading
//!
//! Resolves the location of the TOML tuning file and loads it into an
//! [`EngineConfig`]. Resolution uses a three-tier priority system:
//!
//! 1. Command line argument (explicit path, must exist)
//! 2. `ENSEMBLE_CONFIG` environment variable (explicit path, must exist)
//! 3. Platform default location (used only when present)
//!
//! When no candidate exists the built-in defaults apply, so the engine
//! runs without any configuration file at all.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::params::EngineConfig;

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "ENSEMBLE_CONFIG";

/// Platform default configuration file location
///
/// - Linux: `~/.config/ensemble/config.toml`
/// - macOS: `~/Library/Application Support/ensemble/config.toml`
/// - Windows: `%APPDATA%\ensemble\config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ensemble").join("config.toml"))
}

/// Resolve the configuration file path
///
/// # Arguments
/// * `cli_arg` - Path given on the command line, highest priority
///
/// # Returns
/// The first candidate in priority order, or `None` when no explicit path
/// was given and the platform default does not exist. Explicit paths are
/// returned whether or not they exist; loading reports the error so the
/// user learns their path was wrong instead of silently getting defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        debug!("configuration path from command line: {}", path.display());
        return Some(path.to_path_buf());
    }

    if let Ok(value) = std::env::var(CONFIG_ENV_VAR) {
        if !value.is_empty() {
            debug!("configuration path from {}: {}", CONFIG_ENV_VAR, value);
            return Some(PathBuf::from(value));
        }
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            debug!("configuration path from platform default: {}", path.display());
            Some(path)
        }
        _ => None,
    }
}

/// Load and validate the engine configuration
///
/// Missing fields in the file take their defaults; a missing file (when no
/// explicit path was given) yields the full default configuration.
pub fn load_config(cli_arg: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = resolve_config_path(cli_arg) else {
        info!("no configuration file found, using built-in defaults");
        return Ok(EngineConfig::default());
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        Error::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: EngineConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))?;
    config.validate()?;

    info!("loaded engine configuration from {}", path.display());
    Ok(config)
}
