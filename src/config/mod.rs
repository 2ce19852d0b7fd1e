//! Configuration module for the package tracker
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and resolving default file locations.
//!
//! # Example
//!
//! ```no_run
//! use package_tracker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Cache file: {}", config.cache_path().display());
//! ```

mod parser;
mod paths;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, EndpointsConfig, HttpConfig, TrackingConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config, resolve_config};
pub use paths::{default_cache_path, default_config_path, default_tracking_path};
