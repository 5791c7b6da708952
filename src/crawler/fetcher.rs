//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - HTTPS-first requests with a plain HTTP fallback
//! - Page fetches classified into success, HTTP error and network error

use crate::config::UserAgentConfig;
use crate::state::Protocol;
use reqwest::{redirect::Policy, Client, ClientBuilder, Response};
use std::time::Duration;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// `timeout` bounds every request end to end; there is no retry. Redirects
/// are followed, as domain registration and robots.txt downloads expect.
///
/// # Example
///
/// ```no_run
/// use sumi_indexer::config::UserAgentConfig;
/// use sumi_indexer::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    client_builder(config, timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .build()
}

/// Builds the client used for page bodies
///
/// Redirects are never followed: the target would bypass the robots and
/// same-host checks made on the requested path, so a 3xx answer comes back
/// from `fetch_url` as `FetchResult::HttpError`.
pub fn build_page_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    client_builder(config, timeout).redirect(Policy::none()).build()
}

fn client_builder(config: &UserAgentConfig, timeout: Duration) -> ClientBuilder {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
}

/// Sends a GET for `path` on `domain`, trying HTTPS first and HTTP second
///
/// Any HTTP response counts as reachable, whatever its status. Only a
/// transport failure on both protocols is an error, in which case the HTTP
/// attempt's error is returned.
pub async fn get_with_fallback(
    client: &Client,
    domain: &str,
    path: &str,
) -> Result<(Protocol, Response), reqwest::Error> {
    let https_url = Protocol::Https.url_for(domain, path);
    match client.get(&https_url).send().await {
        Ok(response) => Ok((Protocol::Https, response)),
        Err(e) => {
            tracing::debug!("HTTPS request to {} failed, trying HTTP: {}", https_url, e);
            let http_url = Protocol::Http.url_for(domain, path);
            let response = client.get(&http_url).send().await?;
            Ok((Protocol::Http, response))
        }
    }
}

/// Fetches a page body
///
/// Anything other than a 2xx answer with a readable body is a failure for
/// this page only.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: format!("Connection failed: {}", e),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}
