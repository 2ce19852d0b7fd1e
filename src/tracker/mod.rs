//! Tracker module for fetching and interpreting carrier data
//!
//! This module contains the core tracking logic, including:
//! - HTTP fetching of tracking pages and the UPS status API
//! - Extracting status, location and delivery date from responses
//! - Refresh orchestration with fallback to cached records

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{
    fetch_tracking_status, AddOutcome, Freshness, PackageView, RefreshMode, Tracker,
};
pub use fetcher::{build_http_client, fetch_page, fetch_ups_api, FetchResult};
pub use parser::{
    classify_status_text, parse_date_text, parse_tracking_page, parse_ups_api_response,
    ParsedStatus,
};
