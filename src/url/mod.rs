//! URL handling module for Sumi-Indexer
//!
//! Decides which discovered links stay on the crawled domain and turns them
//! into paths for the crawl worklist.

mod domain;
mod resolve;

pub use domain::{authority, is_same_domain, normalize_domain};
pub use resolve::resolve_link;

pub use crate::config::validate_domain;
