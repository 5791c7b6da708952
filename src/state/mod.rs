//! State module for tracking crawl progress
//!
//! This module provides the in-memory state shared by the crawler.
//!
//! # Components
//!
//! - `DomainCache`: memoized domain id and protocol per registered domain
//! - `CrawlPhase`: per-domain lifecycle (registering, policy loaded, crawling, done)
//! - `PathOutcome`: how each frontier entry ended
//! - `ScrapedPaths`: run-scoped set of indexed paths per domain

mod domain_state;
mod page_state;
mod scraped;

// Re-export main types
pub use domain_state::{AbortReason, CrawlPhase, DomainCache, DomainEntry, Protocol};
pub use page_state::PathOutcome;
pub use scraped::ScrapedPaths;
