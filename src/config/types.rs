use crate::carrier::Carrier;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for the package tracker
///
/// Every section is optional; a missing config file behaves like an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub tracking: TrackingConfig,
    pub endpoints: EndpointsConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Overall per-request timeout (seconds)
    pub timeout_seconds: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_seconds: u64,

    /// User agent sent to carrier sites
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 15,
            connect_timeout_seconds: 10,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Status cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Cache file location; defaults under the user cache directory
    pub path: Option<PathBuf>,

    /// How long a fetched status stays fresh (seconds)
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            ttl_seconds: 300,
        }
    }
}

/// Tracked package list configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TrackingConfig {
    /// Tracking list location; defaults next to the executable
    pub numbers_path: Option<PathBuf>,
}

/// Carrier endpoint templates
///
/// Each template contains `{}` where the tracking number goes. Page
/// templates are tried in order; the first one is also the link shown in
/// the menu.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EndpointsConfig {
    /// UPS JSON status API, queried before the UPS pages
    pub ups_api: Option<String>,
    pub ups: Vec<String>,
    pub usps: Vec<String>,
    pub fedex: Vec<String>,
    pub dhl: Vec<String>,
}

impl EndpointsConfig {
    /// Returns the page templates configured for a carrier
    pub fn pages(&self, carrier: Carrier) -> &[String] {
        match carrier {
            Carrier::Ups => &self.ups,
            Carrier::Usps => &self.usps,
            Carrier::FedEx => &self.fedex,
            Carrier::Dhl => &self.dhl,
            Carrier::Unknown => &[],
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            ups_api: Some("https://webapis.ups.com/track/api/Track/GetStatus?loc=en_US".to_string()),
            ups: vec!["https://www.ups.com/track?tracknum={}".to_string()],
            usps: vec![
                "https://tools.usps.com/go/TrackConfirmAction?qtc_tLabels1={}".to_string(),
                "https://tools.usps.com/go/TrackConfirmAction?tLabels={}".to_string(),
            ],
            fedex: vec!["https://www.fedex.com/fedextrack/?trknbr={}".to_string()],
            dhl: vec!["https://www.dhl.com/us-en/home/tracking.html?track-id={}".to_string()],
        }
    }
}
