//! Package Tracker: parcel status for the menu bar
//!
//! This crate tracks UPS, USPS, FedEx and DHL shipments by scraping the
//! carriers' public tracking pages, caches the results on disk and renders
//! them as SwiftBar menu markup.

pub mod carrier;
pub mod config;
pub mod dialog;
pub mod output;
pub mod storage;
pub mod tracker;

use thiserror::Error;

/// Main error type for package tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Could not read tracking status from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Unrecognized tracking number format: {0}")]
    InvalidTrackingNumber(String),

    #[error("Tracking number {0} is already tracked")]
    DuplicateTrackingNumber(String),

    #[error("No tracking endpoints configured for {0}")]
    NoEndpoints(carrier::Carrier),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid endpoint template: {0}")]
    InvalidEndpoint(String),
}

/// Result type alias for package tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use carrier::{detect_carrier, normalize_tracking_number, Carrier};
pub use config::Config;
pub use storage::{JsonStorage, Storage, TrackedPackage, TrackingRecord, TrackingStatus};
pub use tracker::{Freshness, PackageView, Tracker};
