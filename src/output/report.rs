//! Plain-text reports for terminal commands
//!
//! `refresh` runs in a terminal window opened by the menu; `list` and `add`
//! are meant for interactive use.

use crate::tracker::{AddOutcome, Freshness, PackageView};
use chrono::{DateTime, Duration, Utc};

/// Formats the result of a forced refresh, one line per package
pub fn format_refresh_report(views: &[PackageView]) -> String {
    if views.is_empty() {
        return "ℹ️ No packages to refresh\n".to_string();
    }

    let mut out = format!("📦 Refreshed {} packages\n", views.len());
    for view in views {
        let label = short_label(view);
        match (&view.error, &view.record) {
            (None, Some(record)) => {
                out.push_str(&format!("✅ {} - {}\n", label, record.status));
            }
            (Some(error), _) => {
                out.push_str(&format!("⚠️ {} - Failed to fetch: {}\n", label, error));
            }
            (None, None) => {
                out.push_str(&format!("⚠️ {} - Failed to fetch\n", label));
            }
        }
    }
    out.push_str("✅ Refresh complete!\n");
    out
}

/// Formats the tracked packages with their cached status and age
pub fn format_package_list(views: &[PackageView], now: DateTime<Utc>) -> String {
    if views.is_empty() {
        return "No packages to track\n".to_string();
    }

    let mut out = String::new();
    for view in views {
        let package = &view.package;
        out.push_str(&format!(
            "{:<7} {:<24} {}",
            package.carrier.name(),
            package.tracking_number,
            view.status().label()
        ));

        match &view.record {
            Some(record) => {
                out.push_str(&format!(" (checked {} ago", format_age(record.age(now))));
                if view.freshness == Freshness::Stale {
                    out.push_str(", stale");
                }
                out.push(')');
            }
            None => out.push_str(" (never checked)"),
        }

        if let Some(name) = package.display_name() {
            out.push_str(&format!("  {}", name));
        }
        out.push('\n');
    }
    out
}

/// Formats the result of adding a package
pub fn format_add_outcome(outcome: &AddOutcome) -> String {
    let package = &outcome.package;
    let mut out = format!(
        "✅ Added {} tracking number: {}\n",
        package.carrier, package.tracking_number
    );
    match (&outcome.record, &outcome.fetch_error) {
        (Some(record), _) => out.push_str(&format!("✅ Initial status: {}\n", record.status)),
        (None, Some(error)) => {
            out.push_str(&format!("⚠️ Could not fetch initial status: {}\n", error))
        }
        (None, None) => out.push_str("⚠️ Could not fetch initial status\n"),
    }
    out
}

fn short_label(view: &PackageView) -> String {
    let prefix: String = view.package.tracking_number.chars().take(8).collect();
    format!("{} {}...", view.package.carrier, prefix)
}

/// Renders an age as whole seconds, minutes, hours or days
fn format_age(age: Duration) -> String {
    let seconds = age.num_seconds().max(0);
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h", seconds / 3600)
    } else {
        format!("{}d", seconds / 86_400)
    }
}
