//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching
//! robots.txt files. Rules are loaded once per domain per process.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::{parse_disallow_rules, RobotsRules};

use crate::crawler::get_with_fallback;
use crate::IndexerError;
use reqwest::Client;
use std::sync::Arc;

/// Robots policy service: download on first use, then serve from cache
#[derive(Debug, Default)]
pub struct RobotsPolicy {
    cache: RobotsCache,
}

impl RobotsPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rules for `domain`, downloading them on a cache miss
    ///
    /// A failed download is not cached, so a later call tries again.
    pub async fn fetch_rules(
        &self,
        client: &Client,
        domain: &str,
    ) -> Result<Arc<RobotsRules>, IndexerError> {
        if let Some(rules) = self.cache.get(domain) {
            tracing::debug!("Robots cache hit for {}", domain);
            return Ok(rules);
        }

        let rules = fetch_robots(client, domain).await?;
        tracing::debug!(
            "Loaded {} disallow rule(s) for {}",
            rules.disallowed_prefixes().len(),
            domain
        );
        Ok(self.cache.insert(domain, rules))
    }

    pub fn cache(&self) -> &RobotsCache {
        &self.cache
    }
}

/// Downloads and parses robots.txt for a domain
///
/// # Returns
///
/// * `Ok(RobotsRules)` - Parsed rules; empty when the server answers with a
///   non-success status
/// * `Err(IndexerError::Robots)` - Neither HTTPS nor HTTP could be reached,
///   or the body could not be read
pub async fn fetch_robots(client: &Client, domain: &str) -> Result<RobotsRules, IndexerError> {
    let (protocol, response) = get_with_fallback(client, domain, "/robots.txt")
        .await
        .map_err(|e| IndexerError::Robots {
            domain: domain.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(
            "robots.txt for {} answered {} over {}; allowing all",
            domain,
            status,
            protocol
        );
        return Ok(RobotsRules::allow_all());
    }

    let body = response.text().await.map_err(|e| IndexerError::Robots {
        domain: domain.to_string(),
        message: format!("failed to read body: {}", e),
    })?;

    Ok(parse_disallow_rules(&body))
}

/// Checks `path` against a domain's disallow prefixes
///
/// # Returns
///
/// * `true` - If some rule is a string prefix of `path`
/// * `false` - If the path may be crawled
pub fn is_disallowed(path: &str, rules: &RobotsRules) -> bool {
    rules.is_disallowed(path)
}
