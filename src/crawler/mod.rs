//! Crawler module for domain traversal and indexing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with HTTPS to HTTP fallback
//! - HTML text and link extraction
//! - Domain registration
//! - The depth-bounded worklist and per-domain crawl coordination
//! - Sequential batch runs over many domains

mod batch;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod registry;

pub use batch::{read_domain_list, BatchReport, BatchRunner};
pub use coordinator::{CrawlReport, Crawler, OutcomeTally};
pub use fetcher::{build_http_client, build_page_client, fetch_url, get_with_fallback, FetchResult};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{parse_html, ParsedPage};
pub use registry::DomainRegistry;
