use crate::config::paths::default_config_path;
use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use package_tracker::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Cache ttl: {}s", config.cache.ttl_seconds);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Resolves the configuration for a run
///
/// An explicit path must exist. Without one, the default config location
/// is used when the file is present; otherwise built-in defaults apply.
///
/// # Returns
///
/// * `Ok((Config, Option<PathBuf>))` - The configuration and the file it came from, if any
/// * `Err(ConfigError)` - The chosen file could not be loaded
pub fn resolve_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>), ConfigError> {
    if let Some(path) = explicit {
        return Ok((load_config(path)?, Some(path.to_path_buf())));
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        tracing::debug!("Using config file {}", default_path.display());
        let config = load_config(&default_path)?;
        return Ok((config, Some(default_path)));
    }

    Ok((Config::default(), None))
}
