//! Default file locations
//!
//! The cache lives under `$XDG_CACHE_HOME` (or `~/.cache`), the tracking
//! list next to the plugin executable, and the optional config file under
//! `$XDG_CONFIG_HOME/package-tracker` (or `~/.config/package-tracker`).

use crate::config::types::Config;
use std::path::PathBuf;

pub const CACHE_FILE_NAME: &str = "swiftbar_package_tracker_cache.json";
pub const TRACKING_FILE_NAME: &str = "tracking_numbers.json";
pub const CONFIG_FILE_NAME: &str = "config.toml";

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    match std::env::var_os(var) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .map(|home| home.join(fallback))
            .unwrap_or_else(|| PathBuf::from(fallback)),
    }
}

/// Default cache file path
pub fn default_cache_path() -> PathBuf {
    xdg_dir("XDG_CACHE_HOME", ".cache").join(CACHE_FILE_NAME)
}

/// Default tracking list path, next to the running executable
pub fn default_tracking_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TRACKING_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(TRACKING_FILE_NAME))
}

/// Default configuration file path
pub fn default_config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .join("package-tracker")
        .join(CONFIG_FILE_NAME)
}

impl Config {
    /// Cache file path after applying defaults
    pub fn cache_path(&self) -> PathBuf {
        self.cache.path.clone().unwrap_or_else(default_cache_path)
    }

    /// Tracking list path after applying defaults
    pub fn tracking_path(&self) -> PathBuf {
        self.tracking
            .numbers_path
            .clone()
            .unwrap_or_else(default_tracking_path)
    }
}
