use crate::carrier::{fill_template, Carrier};
use crate::config::types::{CacheConfig, Config, EndpointsConfig, HttpConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_cache_config(&config.cache)?;
    validate_endpoints(&config.endpoints)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if !(1..=120).contains(&config.timeout_seconds) {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be between 1 and 120, got {}",
            config.timeout_seconds
        )));
    }

    if !(1..=120).contains(&config.connect_timeout_seconds) {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-seconds must be between 1 and 120, got {}",
            config.connect_timeout_seconds
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Longest accepted cache ttl: one year
pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if !(1..=MAX_TTL_SECONDS).contains(&config.ttl_seconds) {
        return Err(ConfigError::Validation(format!(
            "ttl-seconds must be between 1 and {}, got {}",
            MAX_TTL_SECONDS, config.ttl_seconds
        )));
    }

    if let Some(path) = &config.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "cache path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates every endpoint template
fn validate_endpoints(config: &EndpointsConfig) -> Result<(), ConfigError> {
    if let Some(api) = &config.ups_api {
        validate_url(api)?;
    }

    for carrier in Carrier::KNOWN {
        for template in config.pages(carrier) {
            validate_template(template)?;
        }
    }

    Ok(())
}

/// Validates a single page template
///
/// A template must contain the `{}` placeholder and produce an HTTP(S) URL
/// once a tracking number is substituted.
fn validate_template(template: &str) -> Result<(), ConfigError> {
    if !template.contains("{}") {
        return Err(ConfigError::InvalidEndpoint(format!(
            "'{}' has no {{}} placeholder for the tracking number",
            template
        )));
    }

    validate_url(&fill_template(template, "1Z999AA10123456784"))
}

fn validate_url(candidate: &str) -> Result<(), ConfigError> {
    let url = Url::parse(candidate)
        .map_err(|e| ConfigError::InvalidEndpoint(format!("'{}': {}", candidate, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidEndpoint(format!(
            "'{}' must use http or https",
            candidate
        )));
    }

    Ok(())
}
