//! Batch crawling over a list of domains
//!
//! Domains are crawled strictly one after another. A failing domain is logged
//! and the batch moves on.

use crate::config::validate_domain;
use crate::crawler::coordinator::{CrawlReport, Crawler, OutcomeTally};
use crate::Result;
use std::fs;
use std::path::Path;

/// Aggregate result of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<CrawlReport>,
    /// Domains rejected before crawling, with the reason
    pub skipped: Vec<(String, String)>,
}

impl BatchReport {
    pub fn domains_crawled(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_aborted()).count()
    }

    pub fn domains_aborted(&self) -> usize {
        self.reports.iter().filter(|r| r.is_aborted()).count()
    }

    pub fn pages_indexed(&self) -> usize {
        self.reports.iter().map(CrawlReport::pages_indexed).sum()
    }

    /// Outcome counts summed over every domain
    pub fn outcomes(&self) -> OutcomeTally {
        let mut total = OutcomeTally::new();
        for report in &self.reports {
            total.merge(&report.outcomes);
        }
        total
    }
}

/// Runs the crawler over many domains
pub struct BatchRunner {
    crawler: Crawler,
}

impl BatchRunner {
    pub fn new(crawler: Crawler) -> Self {
        Self { crawler }
    }

    /// Crawls each domain in order
    pub async fn run<I, D>(&self, domains: I) -> BatchReport
    where
        I: IntoIterator<Item = D>,
        D: AsRef<str>,
    {
        let mut batch = BatchReport::default();

        for domain in domains {
            let domain = domain.as_ref();

            if let Err(e) = validate_domain(domain) {
                tracing::warn!("Skipping '{}': {}", domain, e);
                batch.skipped.push((domain.to_string(), e.to_string()));
                continue;
            }

            match self.crawler.crawl_domain(domain).await {
                Ok(report) => batch.reports.push(report),
                Err(e) => {
                    tracing::error!("Crawl of {} failed: {}", domain, e);
                    batch.skipped.push((domain.to_string(), e.to_string()));
                }
            }
        }

        tracing::info!(
            "Batch finished: {} crawled, {} aborted, {} skipped, {} page(s) indexed",
            batch.domains_crawled(),
            batch.domains_aborted(),
            batch.skipped.len(),
            batch.pages_indexed()
        );

        batch
    }

    pub fn crawler(&self) -> &Crawler {
        &self.crawler
    }
}

/// Reads a newline-delimited domain list
///
/// Lines are trimmed; blank lines and lines starting with `#` are ignored.
pub fn read_domain_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_domain_list(&content))
}

fn parse_domain_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
