//! Crawler coordinator - per-domain crawl orchestration
//!
//! This module drives one domain from registration to an exhausted frontier:
//! - Registering the domain and resolving its protocol
//! - Loading the robots.txt policy
//! - Draining the depth-bounded worklist, one path at a time
//! - Handing fetched pages to the indexer and queueing their same-domain links

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, build_page_client, fetch_url, FetchResult};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::parse_html;
use crate::crawler::registry::DomainRegistry;
use crate::index::PageIndexer;
use crate::robots::{RobotsPolicy, RobotsRules};
use crate::state::{AbortReason, CrawlPhase, PathOutcome, ScrapedPaths};
use crate::storage::{SqliteStorage, Storage};
use crate::url::{normalize_domain, resolve_link};
use crate::{IndexerError, Result};
use parking_lot::Mutex;
use reqwest::Client;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Per-outcome counts for processed frontier entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    counts: BTreeMap<PathOutcome, usize>,
}

impl OutcomeTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: PathOutcome) {
        *self.counts.entry(outcome).or_insert(0) += 1;
    }

    pub fn get(&self, outcome: PathOutcome) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn merge(&mut self, other: &OutcomeTally) {
        for (outcome, count) in &other.counts {
            *self.counts.entry(*outcome).or_insert(0) += count;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PathOutcome, usize)> + '_ {
        self.counts.iter().map(|(outcome, count)| (*outcome, *count))
    }
}

impl fmt::Display for OutcomeTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(outcome, count)| format!("{}={}", outcome, count))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

/// Summary of one `crawl_domain` call
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub domain: String,
    pub phase: CrawlPhase,
    pub abort: Option<AbortReason>,
    pub outcomes: OutcomeTally,
}

impl CrawlReport {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            phase: CrawlPhase::NotStarted,
            abort: None,
            outcomes: OutcomeTally::new(),
        }
    }

    /// Moves to `next`, rejecting transitions the lifecycle does not allow
    pub fn advance(&mut self, next: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(IndexerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Ends the crawl early
    pub fn abort(&mut self, reason: AbortReason) -> Result<()> {
        self.advance(CrawlPhase::Done)?;
        self.abort = Some(reason);
        Ok(())
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.is_some()
    }

    pub fn pages_indexed(&self) -> usize {
        self.outcomes.get(PathOutcome::Indexed)
    }
}

/// Robots-aware, depth-bounded crawler feeding the page indexer
///
/// Owns the domain, robots and run-path caches; the stem cache lives in the
/// indexer. The store handle is shared and locked only around synchronous
/// store calls. Page bodies go through `page_client`, which never follows
/// redirects.
pub struct Crawler {
    config: CrawlerConfig,
    client: Client,
    page_client: Client,
    storage: Arc<Mutex<SqliteStorage>>,
    registry: DomainRegistry,
    robots: RobotsPolicy,
    scraped: ScrapedPaths,
    indexer: PageIndexer,
}

impl Crawler {
    /// Creates a crawler with HTTP clients built from `config`
    pub fn new(config: &Config, storage: Arc<Mutex<SqliteStorage>>) -> Result<Self> {
        let timeout = config.crawler.request_timeout();
        Ok(Self {
            config: config.crawler.clone(),
            client: build_http_client(&config.user_agent, timeout)?,
            page_client: build_page_client(&config.user_agent, timeout)?,
            storage,
            registry: DomainRegistry::new(),
            robots: RobotsPolicy::new(),
            scraped: ScrapedPaths::new(),
            indexer: PageIndexer::default(),
        })
    }

    /// Crawls one domain from its root
    ///
    /// Registration failure, an unreachable robots.txt or a disallowed root
    /// end the crawl early; the reason is recorded in the report. Only a
    /// broken lifecycle transition is returned as an error.
    pub async fn crawl_domain(&self, domain: &str) -> Result<CrawlReport> {
        let domain = normalize_domain(domain);
        let domain = domain.as_str();
        let mut report = CrawlReport::new(domain);
        self.scraped.clear_domain(domain);
        tracing::info!("Crawling {}", domain);

        report.advance(CrawlPhase::Registering)?;
        if let Err(e) = self
            .registry
            .register(domain, &self.client, &*self.storage)
            .await
        {
            tracing::warn!("Skipping {}: {}", domain, e);
            report.abort(AbortReason::RegistrationFailed(e.to_string()))?;
            return Ok(report);
        }

        let rules = match self.robots.fetch_rules(&self.client, domain).await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", domain, e);
                report.abort(AbortReason::RobotsUnavailable(e.to_string()))?;
                return Ok(report);
            }
        };
        report.advance(CrawlPhase::PolicyLoaded)?;

        if rules.disallows_root() {
            tracing::info!("Skipping {}: robots.txt disallows /", domain);
            report.abort(AbortReason::RootDisallowed)?;
            return Ok(report);
        }

        report.advance(CrawlPhase::Crawling)?;
        report.outcomes = self.drain(domain, Frontier::seeded("/", 0), &rules).await;
        report.advance(CrawlPhase::Done)?;

        tracing::info!(
            "Finished {}: {} page(s) indexed ({})",
            domain,
            report.pages_indexed(),
            report.outcomes
        );
        Ok(report)
    }

    /// Crawls `path` and everything reachable from it within the depth bound
    ///
    /// The domain's robots rules are taken from the policy cache, downloading
    /// them if this process has not seen the domain yet.
    pub async fn crawl_path(&self, domain: &str, path: &str, depth: u32) -> Result<OutcomeTally> {
        let domain = normalize_domain(domain);
        let domain = domain.as_str();
        let rules = self.robots.fetch_rules(&self.client, domain).await?;
        Ok(self.drain(domain, Frontier::seeded(path, depth), &rules).await)
    }

    async fn drain(&self, domain: &str, mut frontier: Frontier, rules: &RobotsRules) -> OutcomeTally {
        let mut tally = OutcomeTally::new();

        while let Some(entry) = frontier.pop() {
            let (outcome, links) = self.visit(domain, &entry, rules).await;
            tally.record(outcome);

            if outcome.follows_links() {
                frontier.push_children(links, entry.depth + 1);
            }
        }

        tally
    }

    /// Processes one worklist entry, returning its outcome and followable links
    async fn visit(
        &self,
        domain: &str,
        entry: &FrontierEntry,
        rules: &RobotsRules,
    ) -> (PathOutcome, Vec<String>) {
        let path = entry.path.as_str();

        if entry.depth > self.config.max_depth {
            return (PathOutcome::DepthExceeded, Vec::new());
        }

        if self.scraped.contains(domain, path) {
            return (PathOutcome::AlreadyScraped, Vec::new());
        }

        let indexed = {
            let store = self.storage.lock();
            store.page_exists(domain, path)
        };
        match indexed {
            Ok(true) => {
                tracing::debug!("{}{} already indexed", domain, path);
                self.scraped.insert(domain, path);
                return (PathOutcome::AlreadyIndexed, Vec::new());
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Index lookup failed for {}{}: {}", domain, path, e);
                return (PathOutcome::IndexFailed, Vec::new());
            }
        }

        if let Some(rule) = rules.matching_rule(path) {
            tracing::debug!("{}{} disallowed by '{}'", domain, path, rule);
            return (PathOutcome::Disallowed, Vec::new());
        }

        let Some(registration) = self.registry.lookup(domain) else {
            tracing::debug!("{} has no resolved protocol", domain);
            return (PathOutcome::Unregistered, Vec::new());
        };

        let url = registration.protocol.url_for(domain, path);
        let body = match fetch_url(&self.page_client, &url).await {
            FetchResult::Success { body, .. } => body,
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Fetch of {} returned HTTP {}", url, status_code);
                return (PathOutcome::FetchFailed, Vec::new());
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Fetch of {} failed: {}", url, error);
                return (PathOutcome::FetchFailed, Vec::new());
            }
        };

        let page = parse_html(&body);

        let indexed = {
            let mut store = self.storage.lock();
            self.indexer
                .index_page(&mut *store, registration.id, path, &page.text)
        };

        match indexed {
            Ok(summary) => {
                tracing::info!(
                    "Indexed {} (depth {}, {} terms){}",
                    url,
                    entry.depth,
                    summary.distinct_terms,
                    page.title
                        .as_deref()
                        .map(|t| format!(": {}", t))
                        .unwrap_or_default()
                );
            }
            Err(e) => {
                tracing::warn!("Indexing {} failed, rolled back: {}", url, e);
                return (PathOutcome::IndexFailed, Vec::new());
            }
        }

        self.scraped.insert(domain, path);

        let links = page
            .hrefs
            .iter()
            .filter_map(|href| resolve_link(href, domain))
            .collect();

        (PathOutcome::Indexed, links)
    }

    pub fn storage(&self) -> &Arc<Mutex<SqliteStorage>> {
        &self.storage
    }

    pub fn scraped(&self) -> &ScrapedPaths {
        &self.scraped
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    pub fn robots(&self) -> &RobotsPolicy {
        &self.robots
    }
}
