//! Tracker coordinator - package lifecycle and refresh orchestration
//!
//! This module ties the pieces together:
//! - Adding, removing and clearing tracked packages
//! - Deciding which cached records are due for a refresh
//! - Fetching due packages concurrently and applying the results
//! - Falling back to the previous record when a refresh fails

use crate::carrier::{detect_carrier, fill_template, normalize_tracking_number, Carrier};
use crate::config::{Config, EndpointsConfig};
use crate::storage::{RecordMap, Storage, TrackedPackage, TrackingRecord, TrackingStatus};
use crate::tracker::fetcher::{build_http_client, fetch_page, fetch_ups_api};
use crate::tracker::parser::{parse_tracking_page, parse_ups_api_response, ParsedStatus};
use crate::TrackerError;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// How current a package's displayed record is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched within the cache ttl
    Fresh,
    /// Older than the ttl, or the refresh attempt failed
    Stale,
    /// Never fetched successfully
    Missing,
}

/// A tracked package together with its best known record
#[derive(Debug, Clone)]
pub struct PackageView {
    pub package: TrackedPackage,
    pub record: Option<TrackingRecord>,
    pub freshness: Freshness,
    /// Why this pass's refresh failed, if it did
    pub error: Option<String>,
}

impl PackageView {
    /// The status to display; packages never fetched show as unknown
    pub fn status(&self) -> TrackingStatus {
        self.record
            .as_ref()
            .map(|r| r.status)
            .unwrap_or(TrackingStatus::Unknown)
    }
}

/// Outcome of adding a package
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub package: TrackedPackage,
    /// The initial record, when the first fetch succeeded
    pub record: Option<TrackingRecord>,
    /// Why the first fetch failed, if it did
    pub fetch_error: Option<String>,
}

/// Whether a refresh pass honors the cache ttl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Only refresh records that are missing or stale
    IfStale,
    /// Refresh every package
    Force,
}

/// Main tracker structure
pub struct Tracker<S: Storage> {
    config: Arc<Config>,
    storage: S,
    client: Client,
}

impl<S: Storage> Tracker<S> {
    /// Creates a new tracker instance
    ///
    /// # Arguments
    ///
    /// * `config` - The tracker configuration
    /// * `storage` - Where the cache and tracked list live
    ///
    /// # Returns
    ///
    /// * `Ok(Tracker)` - Successfully created tracker
    /// * `Err(TrackerError)` - The HTTP client could not be built
    pub fn new(config: Config, storage: S) -> Result<Self, TrackerError> {
        let client = build_http_client(&config.http)?;

        Ok(Self {
            config: Arc::new(config),
            storage,
            client,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Cache ttl, saturating for values chrono cannot represent
    fn ttl(&self) -> Duration {
        i64::try_from(self.config.cache.ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }

    /// Returns the tracked packages in the order they were added
    pub fn tracked(&self) -> Result<Vec<TrackedPackage>, TrackerError> {
        Ok(self.storage.load_tracked()?)
    }

    /// Starts tracking a package and fetches its status once
    ///
    /// The package stays tracked even if the initial fetch fails; the next
    /// refresh pass will try again.
    ///
    /// # Errors
    ///
    /// * `InvalidTrackingNumber` - The number matches no carrier format
    /// * `DuplicateTrackingNumber` - The number is already tracked
    pub async fn add(
        &mut self,
        input: &str,
        name: Option<String>,
    ) -> Result<AddOutcome, TrackerError> {
        let tracking_number = normalize_tracking_number(input);
        let carrier = detect_carrier(&tracking_number);
        if !carrier.is_known() {
            return Err(TrackerError::InvalidTrackingNumber(input.trim().to_string()));
        }

        let mut packages = self.storage.load_tracked()?;
        if packages.iter().any(|p| p.tracking_number == tracking_number) {
            return Err(TrackerError::DuplicateTrackingNumber(tracking_number));
        }

        let package = TrackedPackage::new(tracking_number, carrier, name);
        packages.push(package.clone());
        self.storage.save_tracked(&packages)?;
        tracing::info!("Tracking {} {}", carrier, package.tracking_number);

        let today = Local::now().date_naive();
        match fetch_tracking_status(
            &self.client,
            &self.config.endpoints,
            carrier,
            &package.tracking_number,
            today,
        )
        .await
        {
            Ok(parsed) => {
                let record = build_record(&package, parsed, Utc::now());
                let mut records = self.storage.load_cache()?;
                records.insert(package.tracking_number.clone(), record.clone());
                self.storage.save_cache(&records)?;
                Ok(AddOutcome {
                    package,
                    record: Some(record),
                    fetch_error: None,
                })
            }
            Err(e) => {
                tracing::warn!("Initial fetch for {} failed: {}", package.tracking_number, e);
                Ok(AddOutcome {
                    package,
                    record: None,
                    fetch_error: Some(e.to_string()),
                })
            }
        }
    }

    /// Stops tracking a package
    ///
    /// Deletes both the tracked list entry and the cache entry.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The package was tracked and has been removed
    /// * `Ok(false)` - The package was not tracked
    pub fn remove(&mut self, input: &str) -> Result<bool, TrackerError> {
        let tracking_number = normalize_tracking_number(input);

        let mut packages = self.storage.load_tracked()?;
        let before = packages.len();
        packages.retain(|p| p.tracking_number != tracking_number);
        let removed = packages.len() != before;
        if removed {
            self.storage.save_tracked(&packages)?;
        }

        let mut records = self.storage.load_cache()?;
        if records.remove(&tracking_number).is_some() {
            self.storage.save_cache(&records)?;
        }

        if removed {
            tracing::info!("Stopped tracking {}", tracking_number);
        }
        Ok(removed)
    }

    /// Stops tracking every package and deletes the cache
    ///
    /// # Returns
    ///
    /// The number of packages that were tracked
    pub fn clear(&mut self) -> Result<usize, TrackerError> {
        let count = self.storage.load_tracked()?.len();
        self.storage.save_tracked(&[])?;
        self.storage.clear_cache()?;
        tracing::info!("Cleared {} tracked packages", count);
        Ok(count)
    }

    /// Returns every tracked package with its cached record, without fetching
    pub fn snapshot(&self) -> Result<Vec<PackageView>, TrackerError> {
        let packages = self.storage.load_tracked()?;
        let records = self.storage.load_cache()?;
        let now = Utc::now();
        let ttl = self.ttl();

        Ok(packages
            .into_iter()
            .map(|package| {
                let record = records.get(&package.tracking_number).cloned();
                let freshness = match &record {
                    Some(r) if r.is_stale(now, ttl) => Freshness::Stale,
                    Some(_) => Freshness::Fresh,
                    None => Freshness::Missing,
                };
                PackageView {
                    package,
                    record,
                    freshness,
                    error: None,
                }
            })
            .collect())
    }

    /// Runs one refresh pass and returns the packages to display
    ///
    /// Records that are due (missing or stale, or all of them in
    /// `RefreshMode::Force`) are fetched concurrently. A successful fetch
    /// replaces the cached record; a failed one leaves the cached record
    /// untouched and the view is marked stale. Cache entries of packages
    /// that are no longer tracked are dropped.
    pub async fn refresh_all(&mut self, mode: RefreshMode) -> Result<Vec<PackageView>, TrackerError> {
        let packages = self.storage.load_tracked()?;
        let mut records = self.storage.load_cache()?;
        let now = Utc::now();
        let ttl = self.ttl();

        let due: Vec<&TrackedPackage> = packages
            .iter()
            .filter(|p| match mode {
                RefreshMode::Force => true,
                RefreshMode::IfStale => records
                    .get(&p.tracking_number)
                    .map_or(true, |r| r.is_stale(now, ttl)),
            })
            .collect();

        tracing::debug!("{} of {} packages due for refresh", due.len(), packages.len());

        let mut failures = self.fetch_due(&due, &mut records).await;

        let before = records.len();
        records.retain(|number, _| packages.iter().any(|p| &p.tracking_number == number));
        let pruned = before != records.len();

        let fetched_any = due.len() > failures.len();
        if fetched_any || pruned {
            self.storage.save_cache(&records)?;
        }

        let views = packages
            .into_iter()
            .map(|package| {
                let error = failures.remove(&package.tracking_number);
                let record = records.get(&package.tracking_number).cloned();
                let freshness = match &record {
                    None => Freshness::Missing,
                    Some(_) if error.is_some() => Freshness::Stale,
                    Some(r) if r.is_stale(now, ttl) => Freshness::Stale,
                    Some(_) => Freshness::Fresh,
                };
                PackageView {
                    package,
                    record,
                    freshness,
                    error,
                }
            })
            .collect();

        Ok(views)
    }

    /// Fetches every due package and writes successes into `records`
    ///
    /// Returns the failure message per tracking number.
    async fn fetch_due(
        &self,
        due: &[&TrackedPackage],
        records: &mut RecordMap,
    ) -> HashMap<String, String> {
        let today = Local::now().date_naive();
        let mut failures = HashMap::new();
        let mut tasks = JoinSet::new();

        for (index, package) in due.iter().enumerate() {
            let client = self.client.clone();
            let config = Arc::clone(&self.config);
            let carrier = package.carrier;
            let tracking_number = package.tracking_number.clone();

            tasks.spawn(async move {
                let result = fetch_tracking_status(
                    &client,
                    &config.endpoints,
                    carrier,
                    &tracking_number,
                    today,
                )
                .await;
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<ParsedStatus, TrackerError>>> =
            due.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => tracing::error!("Fetch task failed: {}", e),
            }
        }

        for (package, result) in due.iter().zip(results) {
            match result {
                Some(Ok(parsed)) => {
                    tracing::debug!(
                        "{} {}: {}",
                        package.carrier,
                        package.tracking_number,
                        parsed.status
                    );
                    let record = build_record(package, parsed, Utc::now());
                    records.insert(package.tracking_number.clone(), record);
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        "Refresh of {} {} failed: {}",
                        package.carrier,
                        package.tracking_number,
                        e
                    );
                    failures.insert(package.tracking_number.clone(), e.to_string());
                }
                None => {
                    failures.insert(
                        package.tracking_number.clone(),
                        "fetch task did not complete".to_string(),
                    );
                }
            }
        }

        failures
    }
}

/// Builds a cache record from a successful fetch
///
/// The carrier always comes from the tracked entry.
fn build_record(
    package: &TrackedPackage,
    parsed: ParsedStatus,
    fetched_at: DateTime<Utc>,
) -> TrackingRecord {
    TrackingRecord {
        tracking_number: package.tracking_number.clone(),
        carrier: package.carrier,
        status: parsed.status,
        location: parsed.location,
        expected_delivery: parsed.expected_delivery,
        last_fetched: fetched_at,
    }
}

/// Fetches and parses the current status of one package
///
/// # Fetch Order
///
/// 1. UPS only: the JSON status API, if configured
/// 2. Each configured tracking page for the carrier, in order
///
/// The first response that yields a recognizable status wins.
///
/// # Errors
///
/// The error from the last candidate tried: `Timeout`, `Http`,
/// `HttpStatus`, or `Parse` when a page loaded but contained no
/// recognizable status. `NoEndpoints` when the carrier has no pages.
pub async fn fetch_tracking_status(
    client: &Client,
    endpoints: &EndpointsConfig,
    carrier: Carrier,
    tracking_number: &str,
    today: NaiveDate,
) -> Result<ParsedStatus, TrackerError> {
    if carrier == Carrier::Ups {
        if let Some(api_url) = &endpoints.ups_api {
            match fetch_ups_api(client, api_url, tracking_number).await.into_body() {
                Ok(body) => match parse_ups_api_response(&body, today) {
                    Some(parsed) => return Ok(parsed),
                    None => tracing::debug!("UPS API had no details for {}", tracking_number),
                },
                Err(e) => tracing::debug!("UPS API unavailable: {}", e),
            }
        }
    }

    let pages = endpoints.pages(carrier);
    let mut last_error = TrackerError::NoEndpoints(carrier);

    for template in pages {
        let url = fill_template(template, tracking_number);
        tracing::debug!("Fetching {}", url);

        match fetch_page(client, &url).await.into_body() {
            Ok(body) => {
                let parsed = parse_tracking_page(&body, today);
                if parsed.status.is_known() {
                    return Ok(parsed);
                }
                last_error = TrackerError::Parse {
                    url,
                    message: "no recognizable tracking status".to_string(),
                };
            }
            Err(e) => last_error = e,
        }
    }

    Err(last_error)
}
