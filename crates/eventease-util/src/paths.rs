//! Default paths for eventease components
//!
//! Paths are user-writable (no root required):
//! - Config: `$XDG_CONFIG_HOME/eventease/config.toml` or `~/.config/eventease/config.toml`
//! - Data: `$XDG_DATA_HOME/eventease` or `~/.local/share/eventease`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const EVENTEASE_DATA_DIR_ENV: &str = "EVENTEASE_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "eventease";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Default database filename within the data directory
pub const DEFAULT_DATABASE_FILENAME: &str = "eventease.db";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$EVENTEASE_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/eventease` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/eventease` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(EVENTEASE_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking EVENTEASE_DATA_DIR.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/eventease/config.toml`
/// 2. `~/.config/eventease/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}
