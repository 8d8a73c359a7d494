//! Default paths for timesheet components
//!
//! The configuration file lives in the user's config directory:
//! - `$TIMESHEET_CONFIG` if set
//! - `$XDG_CONFIG_HOME/timesheet/config.toml`
//! - `~/.config/timesheet/config.toml`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable for overriding the configuration file path
pub const TIMESHEET_CONFIG_ENV: &str = "TIMESHEET_CONFIG";

/// Configuration filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "timesheet";

/// Get the default configuration file path.
///
/// Order of precedence:
/// 1. `$TIMESHEET_CONFIG` environment variable (if set and non-empty)
/// 2. `$XDG_CONFIG_HOME/timesheet/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/timesheet/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    match config_location(None) {
        ConfigLocation::Explicit(path) | ConfigLocation::Default(path) => path,
    }
}

/// Where the configuration comes from
///
/// An explicit path (`--config` or `$TIMESHEET_CONFIG`) must exist; the
/// default location may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    Explicit(PathBuf),
    Default(PathBuf),
}

impl ConfigLocation {
    pub fn path(&self) -> &Path {
        match self {
            ConfigLocation::Explicit(path) | ConfigLocation::Default(path) => path,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, ConfigLocation::Explicit(_))
    }
}

/// Resolve the config file from a command-line path and `$TIMESHEET_CONFIG`
pub fn config_location(cli_path: Option<PathBuf>) -> ConfigLocation {
    locate_config(cli_path, std::env::var_os(TIMESHEET_CONFIG_ENV))
}

fn locate_config(cli_path: Option<PathBuf>, env_path: Option<OsString>) -> ConfigLocation {
    let env_path = env_path.filter(|p| !p.is_empty()).map(PathBuf::from);
    match cli_path.or(env_path) {
        Some(path) => ConfigLocation::Explicit(path),
        None => ConfigLocation::Default(config_path_without_env()),
    }
}

/// Get the config path without checking the TIMESHEET_CONFIG env var.
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}
