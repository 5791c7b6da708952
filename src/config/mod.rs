//! Configuration module for Sumi-Indexer
//!
//! Settings come from an optional TOML file, overlaid by `SUMI_*` environment
//! variables, then validated. A missing database path is fatal.
//!
//! # Example
//!
//! ```no_run
//! use sumi_indexer::config::resolve_config;
//! use std::path::Path;
//!
//! let config = resolve_config(Some(Path::new("sumi.toml"))).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, DatabaseConfig, UserAgentConfig};

pub use parser::{
    apply_env_overrides, apply_overrides_from, compute_config_hash, load_config,
    load_config_with_hash, resolve_config, ENV_DATABASE_PATH, ENV_MAX_DEPTH,
    ENV_REQUEST_TIMEOUT_SECS,
};
pub use validation::{validate, validate_domain};
