//! Carrier handling module
//!
//! This module provides tracking number normalization, carrier detection
//! from the number format, and tracking URL construction.

mod normalize;
mod patterns;

use crate::config::EndpointsConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export main functions
pub use normalize::normalize_tracking_number;
pub use patterns::detect_carrier;

/// Shipping carriers recognized by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Carrier {
    #[serde(rename = "UPS")]
    Ups,
    #[serde(rename = "USPS")]
    Usps,
    #[serde(rename = "FedEx")]
    FedEx,
    #[serde(rename = "DHL")]
    Dhl,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Carrier {
    /// All carriers that can actually be tracked, in detection order
    pub const KNOWN: [Carrier; 4] = [Carrier::Ups, Carrier::Usps, Carrier::FedEx, Carrier::Dhl];

    /// Returns the carrier's display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ups => "UPS",
            Self::Usps => "USPS",
            Self::FedEx => "FedEx",
            Self::Dhl => "DHL",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns true if the carrier was recognized
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Substitutes a tracking number into an endpoint template
///
/// Every `{}` placeholder in the template is replaced.
pub fn fill_template(template: &str, tracking_number: &str) -> String {
    template.replace("{}", tracking_number)
}

/// Returns the public tracking page for a package
///
/// This is the first configured endpoint of the carrier, which is the page
/// a person would open in a browser.
///
/// # Examples
///
/// ```
/// use package_tracker::carrier::{public_tracking_url, Carrier};
/// use package_tracker::config::EndpointsConfig;
///
/// let endpoints = EndpointsConfig::default();
/// let url = public_tracking_url(Carrier::FedEx, "123456789012", &endpoints);
/// assert_eq!(
///     url.as_deref(),
///     Some("https://www.fedex.com/fedextrack/?trknbr=123456789012")
/// );
/// assert_eq!(public_tracking_url(Carrier::Unknown, "x", &endpoints), None);
/// ```
pub fn public_tracking_url(
    carrier: Carrier,
    tracking_number: &str,
    endpoints: &EndpointsConfig,
) -> Option<String> {
    endpoints
        .pages(carrier)
        .first()
        .map(|template| fill_template(template, tracking_number))
}
