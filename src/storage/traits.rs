//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{TrackedPackage, TrackingRecord};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Unreadable file {path}: {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Cached records keyed by tracking number
pub type RecordMap = BTreeMap<String, TrackingRecord>;

/// Trait for storage backend implementations
///
/// Invocations are serialized by the host, so implementations read and
/// overwrite whole files without locking.
pub trait Storage {
    // ===== Status Cache =====

    /// Loads every cached record
    ///
    /// A missing or unreadable cache is reported as empty.
    fn load_cache(&self) -> StorageResult<RecordMap>;

    /// Replaces the cache with the given records
    fn save_cache(&mut self, records: &RecordMap) -> StorageResult<()>;

    /// Deletes the cache entirely
    fn clear_cache(&mut self) -> StorageResult<()>;

    // ===== Tracked Packages =====

    /// Loads the tracked package list in insertion order
    ///
    /// A missing list is empty. A list that cannot be read at all is an
    /// error, so callers never overwrite it with a fresh one.
    fn load_tracked(&self) -> StorageResult<Vec<TrackedPackage>>;

    /// Replaces the tracked package list
    fn save_tracked(&mut self, packages: &[TrackedPackage]) -> StorageResult<()>;
}
