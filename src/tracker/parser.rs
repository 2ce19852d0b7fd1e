//! Tracking page parser
//!
//! This module turns carrier responses into a status, location and expected
//! delivery date:
//! - HTML pages are reduced to their visible text and matched against
//!   phrase families
//! - the UPS status API returns JSON that is read field by field

use crate::storage::TrackingStatus;
use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use std::sync::LazyLock;

/// Fields extracted from one carrier response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatus {
    pub status: TrackingStatus,
    pub location: Option<String>,
    pub expected_delivery: Option<NaiveDate>,
}

/// Phrase families, checked in this order; the first family with a match wins
const STATUS_PHRASES: &[(TrackingStatus, &[&str])] = &[
    (
        TrackingStatus::Delivered,
        &[
            "delivered",
            "delivery complete",
            "package delivered",
            "successfully delivered",
            "delivery successful",
        ],
    ),
    (
        TrackingStatus::OutForDelivery,
        &[
            "out for delivery",
            "on vehicle for delivery",
            "on truck for delivery",
        ],
    ),
    (
        TrackingStatus::InTransit,
        &[
            "in transit",
            "processed",
            "on the way",
            "in progress",
            "shipped",
            "departed",
            "arrived at",
            "processed through",
        ],
    ),
    (
        TrackingStatus::Exception,
        &["exception", "delay", "problem", "issue", "held"],
    ),
    (
        TrackingStatus::Pending,
        &[
            "pending",
            "label created",
            "ready for pickup",
            "awaiting pickup",
            "processing",
        ],
    ),
];

static STATUS_MATCHERS: LazyLock<Vec<(TrackingStatus, Regex)>> = LazyLock::new(|| {
    STATUS_PHRASES
        .iter()
        .map(|(status, phrases)| {
            let alternation = phrases
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&format!(r"\b(?:{})\b", alternation))
                .expect("status phrases form a valid regex");
            (*status, regex)
        })
        .collect()
});

/// Location phrases, most specific first
///
/// The bare `at <place>` rule is a catch-all: on delivered pages it reports
/// the handoff spot, so "left at front door" yields `Front Door`.
static LOCATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\barrived\s+at\s+([a-z][a-z\s,]{1,60}?)(?:\s+on\s|\s+at\s|\.|\s*$)",
        r"\bprocessed\s+through\s+([a-z][a-z\s,]{1,60}?)(?:\s+on\s|\s+at\s|\.|\s*$)",
        r"\bat\s+([a-z][a-z\s,]{1,60}?)(?:\s+on\s|\s+at\s|\.|\s*$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("location pattern is a valid regex"))
    .collect()
});

static DELIVERY_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:delivery\s+date|expected\s+delivery|estimated\s+delivery|delivered\s+on)(?:\s+date)?[:\s]+(.{0,48})",
    )
    .expect("delivery keyword pattern is a valid regex")
});

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid regex"));

static US_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("valid regex"));

static MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s+(\d{4})\b)?",
    )
    .expect("valid regex")
});

/// Parses a carrier tracking page
///
/// # Arguments
///
/// * `html` - The page body
/// * `today` - Reference date for resolving dates written without a year
///
/// # Returns
///
/// The extracted fields. A page with no recognizable phrase yields
/// `TrackingStatus::Unknown`; callers treat that as unparseable.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use package_tracker::storage::TrackingStatus;
/// use package_tracker::tracker::parse_tracking_page;
///
/// let html = "<html><body><p>Out for delivery. Expected delivery: October 21, 2026</p></body></html>";
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let parsed = parse_tracking_page(html, today);
/// assert_eq!(parsed.status, TrackingStatus::OutForDelivery);
/// assert_eq!(parsed.expected_delivery, NaiveDate::from_ymd_opt(2026, 10, 21));
/// ```
pub fn parse_tracking_page(html: &str, today: NaiveDate) -> ParsedStatus {
    let text = visible_text(html);

    ParsedStatus {
        status: classify_status_text(&text),
        location: extract_location(&text),
        expected_delivery: extract_delivery_date(&text, today),
    }
}

/// Maps free text onto a status using the phrase families
pub fn classify_status_text(text: &str) -> TrackingStatus {
    let lowered = text.to_lowercase();

    STATUS_MATCHERS
        .iter()
        .find(|(_, regex)| regex.is_match(&lowered))
        .map(|(status, _)| *status)
        .unwrap_or(TrackingStatus::Unknown)
}

/// Parses a response from the UPS status API
///
/// Returns `None` when the response has no tracking details, which is how
/// the API reports numbers it does not know.
pub fn parse_ups_api_response(body: &str, today: NaiveDate) -> Option<ParsedStatus> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("trackDetails")?.as_array()?.first()?;

    let package_status = detail
        .get("packageStatus")
        .and_then(Value::as_str)
        .unwrap_or("");
    let status = match classify_status_text(package_status) {
        TrackingStatus::Unknown => TrackingStatus::InTransit,
        status => status,
    };

    let location = detail
        .get("shipmentProgressActivities")
        .and_then(Value::as_array)
        .and_then(|activities| activities.first())
        .and_then(|activity| activity.get("location"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);

    let expected_delivery = detail.get("scheduledDeliveryDateDetail").and_then(|sdd| {
        let month = sdd.get("monthCMSKey")?.as_str()?.replace("cms.stapp.", "");
        let day = match sdd.get("dayNum")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        parse_date_text(&format!("{} {}", month, day).to_lowercase(), today)
    });

    Some(ParsedStatus {
        status,
        location,
        expected_delivery,
    })
}

/// Extracts visible, lower-cased text with whitespace collapsed
///
/// Text inside script, style, noscript and template elements is skipped.
fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor.value().as_element().is_some_and(|element| {
                matches!(element.name(), "script" | "style" | "noscript" | "template")
            })
        });

        if !hidden {
            parts.extend(text.split_whitespace());
        }
    }

    parts.join(" ").to_lowercase()
}

/// Finds the most recent scan location in page text
fn extract_location(text: &str) -> Option<String> {
    LOCATION_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.captures(text)?.get(1)?.as_str();
        let cleaned = captured.trim().trim_end_matches(',').trim();
        if cleaned.len() < 2 {
            None
        } else {
            Some(title_case(cleaned))
        }
    })
}

/// Finds the expected (or actual) delivery date in page text
fn extract_delivery_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    DELIVERY_KEYWORD
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|window| parse_date_text(window.as_str(), today))
}

/// Parses the first date found in lower-cased text
///
/// Recognizes `2026-10-21`, `10/21/2026` and month-name forms such as
/// `october 21, 2026`, `tuesday, oct. 21st` or `oct 21`. A date written
/// without a year takes the year of `today`, moved to the next year when
/// that would put it more than 180 days in the past.
pub fn parse_date_text(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = ISO_DATE.captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = US_DATE.captures(text) {
        let month = caps[1].parse().ok()?;
        let day = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let caps = MONTH_DATE.captures(text)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;

    if let Some(year) = caps.get(3) {
        return NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day);
    }

    let candidate = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if candidate < today - Duration::days(180) {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(candidate)
    }
}

fn month_number(abbrev: &str) -> Option<u32> {
    let month = match abbrev {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
