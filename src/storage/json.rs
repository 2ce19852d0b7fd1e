//! JSON file storage implementation
//!
//! This module provides a file-based implementation of the Storage trait.
//! Both files are read whole and rewritten whole.

use crate::carrier::{detect_carrier, normalize_tracking_number, Carrier};
use crate::config::Config;
use crate::storage::traits::{RecordMap, Storage, StorageError, StorageResult};
use crate::storage::{TrackedPackage, TrackingRecord, TrackingStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// On-disk form of a cache entry; the tracking number is the map key
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    carrier: Carrier,
    status: TrackingStatus,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    expected_delivery: Option<NaiveDate>,
    last_fetched: DateTime<Utc>,
}

/// On-disk form of a tracked package
///
/// Older lists stored bare strings, numbers or objects without a carrier;
/// all of them are accepted and classified on load.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredPackage {
    Bare(#[serde(deserialize_with = "string_or_number")] String),
    Full {
        #[serde(deserialize_with = "string_or_number")]
        tracking_number: String,
        #[serde(default, deserialize_with = "lenient_carrier")]
        carrier: Option<Carrier>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        added: Option<DateTime<Utc>>,
    },
}

impl From<StoredPackage> for TrackedPackage {
    fn from(stored: StoredPackage) -> Self {
        let (raw_number, carrier, name, added) = match stored {
            StoredPackage::Bare(number) => (number, None, None, None),
            StoredPackage::Full {
                tracking_number,
                carrier,
                name,
                added,
            } => (tracking_number, carrier, name, added),
        };

        let tracking_number = normalize_tracking_number(&raw_number);
        let carrier = carrier.unwrap_or_else(|| detect_carrier(&tracking_number));
        TrackedPackage {
            tracking_number,
            carrier,
            name,
            added,
        }
    }
}

/// Accepts a tracking number written as a JSON string or number
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a tracking number, got {}",
            other
        ))),
    }
}

/// Reads a carrier name; names this crate does not know read as absent
fn lenient_carrier<'de, D>(deserializer: D) -> Result<Option<Carrier>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Accepts RFC 3339 timestamps and naive ISO timestamps (read as UTC)
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

/// JSON file storage backend
#[derive(Debug, Clone)]
pub struct JsonStorage {
    cache_path: PathBuf,
    tracking_path: PathBuf,
}

impl JsonStorage {
    /// Creates a storage backend over the given files
    ///
    /// Neither file needs to exist yet.
    pub fn new(cache_path: impl Into<PathBuf>, tracking_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            tracking_path: tracking_path.into(),
        }
    }

    /// Creates a storage backend at the configured (or default) locations
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_path(), config.tracking_path())
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn tracking_path(&self) -> &Path {
        &self.tracking_path
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Reads a file, treating a missing or blank file as `None`
fn read_text(path: &Path) -> StorageResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

/// Reads a JSON file, treating a missing file as `None`
///
/// A file that exists but does not parse is logged and also treated as
/// `None`; the next save replaces it.
fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let Some(content) = read_text(path)? else {
        return Ok(None);
    };

    match serde_json::from_str(&content) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Ignoring unreadable file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Converts tracked list elements one at a time
///
/// Elements that cannot be read are skipped with a warning. Repeated
/// numbers keep their first entry.
fn packages_from_values(path: &Path, values: Vec<Value>) -> Vec<TrackedPackage> {
    let mut seen = HashSet::new();

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<StoredPackage>(value) {
            Ok(stored) => Some(TrackedPackage::from(stored)),
            Err(e) => {
                tracing::warn!(
                    "Skipping entry {} of {}: {}",
                    index,
                    path.display(),
                    e
                );
                None
            }
        })
        .filter(|package| !package.tracking_number.is_empty())
        .filter(|package| seen.insert(package.tracking_number.clone()))
        .collect()
}

/// Writes a file through a temporary sibling that is renamed into place
fn write_atomic(path: &Path, content: &str) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, content).map_err(|e| io_error(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| io_error(path, e))?;
    Ok(())
}

impl Storage for JsonStorage {
    // ===== Status Cache =====

    fn load_cache(&self) -> StorageResult<RecordMap> {
        let entries: BTreeMap<String, CacheEntry> =
            read_json(&self.cache_path)?.unwrap_or_default();

        Ok(entries
            .into_iter()
            .map(|(tracking_number, entry)| {
                let record = TrackingRecord {
                    tracking_number: tracking_number.clone(),
                    carrier: entry.carrier,
                    status: entry.status,
                    location: entry.location,
                    expected_delivery: entry.expected_delivery,
                    last_fetched: entry.last_fetched,
                };
                (tracking_number, record)
            })
            .collect())
    }

    fn save_cache(&mut self, records: &RecordMap) -> StorageResult<()> {
        let entries: BTreeMap<&str, CacheEntry> = records
            .iter()
            .map(|(tracking_number, record)| {
                let entry = CacheEntry {
                    carrier: record.carrier,
                    status: record.status,
                    location: record.location.clone(),
                    expected_delivery: record.expected_delivery,
                    last_fetched: record.last_fetched,
                };
                (tracking_number.as_str(), entry)
            })
            .collect();

        let content = serde_json::to_string(&entries)?;
        write_atomic(&self.cache_path, &content)?;
        tracing::debug!(
            "Saved {} cache entries to {}",
            entries.len(),
            self.cache_path.display()
        );
        Ok(())
    }

    fn clear_cache(&mut self) -> StorageResult<()> {
        match fs::remove_file(&self.cache_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&self.cache_path, e)),
        }
    }

    // ===== Tracked Packages =====

    fn load_tracked(&self) -> StorageResult<Vec<TrackedPackage>> {
        let Some(content) = read_text(&self.tracking_path)? else {
            return Ok(Vec::new());
        };

        // The list is user data; an unreadable file is an error rather than
        // an empty list that the next save would overwrite
        let values: Vec<Value> =
            serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
                path: self.tracking_path.display().to_string(),
                source,
            })?;

        Ok(packages_from_values(&self.tracking_path, values))
    }

    fn save_tracked(&mut self, packages: &[TrackedPackage]) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(packages)?;
        write_atomic(&self.tracking_path, &content)
    }
}
