//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests to carriers, including:
//! - Building the HTTP client with browser-like headers and timeouts
//! - GET requests for tracking pages
//! - POST requests to the UPS status API
//! - Error classification

use crate::config::HttpConfig;
use crate::TrackerError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, RequestBuilder};
use serde_json::json;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the response body
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The requested URL
        url: String,
        /// The HTTP status code
        status_code: u16,
    },

    /// The request did not finish within the configured timeout
    Timeout {
        /// The requested URL
        url: String,
    },

    /// Connection, TLS or body read failure
    NetworkError {
        /// The requested URL
        url: String,
        /// The underlying client error
        source: reqwest::Error,
    },
}

impl FetchResult {
    /// Converts the result into the response body or a tracker error
    pub fn into_body(self) -> Result<String, TrackerError> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::HttpError { url, status_code } => Err(TrackerError::HttpStatus {
                url,
                status: status_code,
            }),
            Self::Timeout { url } => Err(TrackerError::Timeout { url }),
            Self::NetworkError { url, source } => Err(TrackerError::Http { url, source }),
        }
    }

    /// Returns true for a successful response
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use package_tracker::config::HttpConfig;
/// use package_tracker::tracker::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a tracking page
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The tracking page URL
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    send(client.get(url), url).await
}

/// Queries the UPS status API for one tracking number
///
/// The API expects the number in lower case inside a JSON body.
pub async fn fetch_ups_api(client: &Client, api_url: &str, tracking_number: &str) -> FetchResult {
    let body = json!({
        "Locale": "en_US",
        "TrackingNumber": [tracking_number.to_lowercase()],
        "isBarcodeScanned": false,
        "Requester": "st/trackdetails",
        "returnToValue": ""
    });

    let request = client
        .post(api_url)
        .header(ACCEPT, "application/json, text/plain, */*")
        .header("origin", "https://www.ups.com")
        .json(&body);

    send(request, api_url).await
}

async fn send(request: RequestBuilder, url: &str) -> FetchResult {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return classify_error(url, e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        tracing::debug!("HTTP {} from {}", status.as_u16(), url);
        return FetchResult::HttpError {
            url: url.to_string(),
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(url, e),
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchResult {
    if error.is_timeout() {
        FetchResult::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchResult::NetworkError {
            url: url.to_string(),
            source: error,
        }
    }
}
