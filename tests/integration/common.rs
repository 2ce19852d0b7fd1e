use package_tracker::config::{CacheConfig, Config, EndpointsConfig, HttpConfig, TrackingConfig};
use package_tracker::JsonStorage;
use std::path::Path;
use tempfile::TempDir;

/// A config whose endpoints all point at the mock server and whose files
/// live in `dir`
pub fn test_config(base_url: &str, dir: &Path) -> Config {
    Config {
        http: HttpConfig {
            timeout_seconds: 2,
            connect_timeout_seconds: 1,
            ..HttpConfig::default()
        },
        cache: CacheConfig {
            path: Some(dir.join("cache.json")),
            ttl_seconds: 300,
        },
        tracking: TrackingConfig {
            numbers_path: Some(dir.join("tracking_numbers.json")),
        },
        endpoints: EndpointsConfig {
            ups_api: None,
            ups: vec![format!("{}/ups/track?tracknum={{}}", base_url)],
            usps: vec![format!("{}/usps/track?tLabels={{}}", base_url)],
            fedex: vec![format!("{}/fedex/track?trknbr={{}}", base_url)],
            dhl: vec![format!("{}/dhl/track?track-id={{}}", base_url)],
        },
    }
}

/// Temporary directory plus a config and storage rooted in it
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

impl Fixture {
    pub fn new(base_url: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config = test_config(base_url, dir.path());
        Self { dir, config }
    }

    pub fn storage(&self) -> JsonStorage {
        JsonStorage::from_config(&self.config)
    }

    pub fn cache_json(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.dir.path().join("cache.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    pub fn tracked_json(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.dir.path().join("tracking_numbers.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    pub fn write_cache(&self, json: serde_json::Value) {
        std::fs::write(self.dir.path().join("cache.json"), json.to_string()).unwrap();
    }

    pub fn write_tracked(&self, json: serde_json::Value) {
        std::fs::write(self.dir.path().join("tracking_numbers.json"), json.to_string()).unwrap();
    }
}
