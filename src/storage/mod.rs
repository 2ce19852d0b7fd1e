//! Storage module for persisting tracking data
//!
//! This module handles the two files the tracker keeps on disk:
//! - the status cache, a JSON object keyed by tracking number
//! - the tracked package list, a JSON array in the order packages were added

mod json;
#[cfg(test)]
mod memory;
mod status;
mod traits;

pub use json::JsonStorage;
#[cfg(test)]
pub use memory::MemoryStorage;
pub use status::TrackingStatus;
pub use traits::{RecordMap, Storage, StorageError, StorageResult};

use crate::carrier::Carrier;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// The last known status of a package
///
/// Status, location and expected delivery always come from the same
/// successful fetch; a refresh replaces all three together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRecord {
    pub tracking_number: String,
    pub carrier: Carrier,
    pub status: TrackingStatus,
    pub location: Option<String>,
    pub expected_delivery: Option<NaiveDate>,
    pub last_fetched: DateTime<Utc>,
}

impl TrackingRecord {
    /// Returns true if the record is at least `ttl` old
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_fetched >= ttl
    }

    /// Returns the age of the record
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_fetched
    }
}

/// A package the user asked to track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedPackage {
    pub tracking_number: String,

    /// Detected when the package was added; never re-detected
    pub carrier: Carrier,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<DateTime<Utc>>,
}

impl TrackedPackage {
    /// Creates a new entry stamped with the current time
    pub fn new(tracking_number: String, carrier: Carrier, name: Option<String>) -> Self {
        Self {
            tracking_number,
            carrier,
            name: name.filter(|n| !n.trim().is_empty()),
            added: Some(Utc::now()),
        }
    }

    /// The user-supplied name, if it is non-empty
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}
