//! SwiftBar menu rendering
//!
//! The first line printed is the menu-bar title; everything after the
//! first `---` is the dropdown. Lines starting with `--` form a package's
//! submenu, and `| key=value` suffixes carry SwiftBar parameters.

use crate::carrier::public_tracking_url;
use crate::config::EndpointsConfig;
use crate::storage::TrackingStatus;
use crate::tracker::{Freshness, PackageView};
use chrono::NaiveTime;

const PACKAGE_ICON: &str = "📦";

/// Everything the menu needs besides the packages themselves
#[derive(Debug, Clone)]
pub struct MenuContext<'a> {
    /// Path of this executable, used for menu actions
    pub executable: String,
    pub endpoints: &'a EndpointsConfig,
    pub updated_at: NaiveTime,
}

/// Renders the full menu for a set of packages
///
/// # Arguments
///
/// * `views` - Packages in display order
/// * `ctx` - Executable path, endpoints and render time
///
/// # Returns
///
/// The menu markup, one line per menu item
pub fn format_menu(views: &[PackageView], ctx: &MenuContext<'_>) -> String {
    let mut menu = String::new();
    let exe = bash_target(&ctx.executable);

    if views.is_empty() {
        menu.push_str(&format!("{}\n", PACKAGE_ICON));
        menu.push_str("---\n");
        menu.push_str("No packages to track\n");
        menu.push_str(&add_action(&exe));
        return menu;
    }

    menu.push_str(&format!("{}\n", format_title(views)));
    menu.push_str("---\n");

    for view in views {
        menu.push_str(&format_package(view, ctx.endpoints, &exe));
    }

    // Actions
    menu.push_str(&format!(
        "🔄 Refresh all packages | bash={} param1=refresh terminal=true refresh=true\n",
        exe
    ));
    menu.push_str(&add_action(&exe));
    menu.push_str(&format!(
        "Clear all packages | bash={} param1=clear terminal=false refresh=true\n",
        exe
    ));
    menu.push_str("---\n");
    menu.push_str(&format!(
        "Last updated: {}\n",
        ctx.updated_at.format("%H:%M:%S")
    ));

    menu
}

/// Renders a minimal menu reporting an error
pub fn format_error_menu(message: &str) -> String {
    format!(
        "{} ⚠️\n---\nError: {} | color=red\n",
        PACKAGE_ICON,
        sanitize(message)
    )
}

/// Builds the menu-bar title
///
/// Shows the package count and, by priority, how many are delivered, out
/// for delivery or in transit.
pub fn format_title(views: &[PackageView]) -> String {
    let total = views.len();
    let count = |status: TrackingStatus| views.iter().filter(|v| v.status() == status).count();

    let delivered = count(TrackingStatus::Delivered);
    let out_for_delivery = count(TrackingStatus::OutForDelivery);
    let in_transit = count(TrackingStatus::InTransit);

    if delivered > 0 {
        format!("{} {} ({} delivered)", PACKAGE_ICON, total, delivered)
    } else if out_for_delivery > 0 {
        format!(
            "{} {} (🚛 {} out for delivery)",
            PACKAGE_ICON, total, out_for_delivery
        )
    } else if in_transit > 0 {
        format!("{} {} (🚚 {} in transit)", PACKAGE_ICON, total, in_transit)
    } else {
        format!("{} {}", PACKAGE_ICON, total)
    }
}

fn format_package(view: &PackageView, endpoints: &EndpointsConfig, exe: &str) -> String {
    let mut out = String::new();
    let package = &view.package;
    let status = view.status();

    let mut main_line = format!("{} {}", status.icon(), display_label(view));
    if let Some(color) = status.color() {
        main_line.push_str(&format!(" | color={}", color));
    }
    out.push_str(&main_line);
    out.push('\n');

    let stale = if view.freshness == Freshness::Stale {
        " (stale)"
    } else {
        ""
    };
    out.push_str(&format!("--Status: {}{}\n", status.label(), stale));

    if let Some(record) = &view.record {
        if let Some(location) = &record.location {
            out.push_str(&format!("--Location: {}\n", sanitize(location)));
        }
        if let Some(date) = record.expected_delivery {
            out.push_str(&format!("--Delivery: {}\n", date.format("%b %-d, %Y")));
        }
    }

    out.push_str(&format!("--Tracking: {}\n", package.tracking_number));
    out.push_str(&format!("--Carrier: {}\n", package.carrier));

    if let Some(url) = public_tracking_url(package.carrier, &package.tracking_number, endpoints) {
        out.push_str(&format!("--Open in Browser | href={}\n", url));
    }

    out.push_str(&format!(
        "--Remove | bash={} param1=remove param2={} terminal=false refresh=true\n",
        exe, package.tracking_number
    ));
    out.push_str("---\n");

    out
}

/// The package's name, or its carrier and the first eight characters
fn display_label(view: &PackageView) -> String {
    match view.package.display_name() {
        Some(name) => sanitize(name),
        None => {
            let number = &view.package.tracking_number;
            let prefix: String = number.chars().take(8).collect();
            format!("{} {}...", view.package.carrier, prefix)
        }
    }
}

fn add_action(exe: &str) -> String {
    format!(
        "Add tracking number | bash={} param1=add terminal=false refresh=true\n",
        exe
    )
}

/// Quotes the executable path when it contains whitespace
fn bash_target(executable: &str) -> String {
    if executable.chars().any(char::is_whitespace) {
        format!("\"{}\"", executable)
    } else {
        executable.to_string()
    }
}

/// Keeps user text on one line and away from the parameter separator
fn sanitize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "/")
}
