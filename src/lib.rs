//! Sumi-Indexer: a robots-aware crawler that builds an inverted index
//!
//! This crate discovers pages under a domain, extracts their visible text and
//! records a persistent term → page index (with term and document frequencies)
//! in SQLite. The crawl is depth-bounded, never revisits a path within a run and
//! never re-indexes a page that the store already holds.

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;
pub mod robots;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Indexer operations
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Robots.txt error for {domain}: {message}")]
    Robots { domain: String, message: String },

    #[error("Domain {domain} could not be registered: {message}")]
    Registration { domain: String, message: String },

    #[error("Invalid crawl transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing required setting: {0}")]
    Missing(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// Result type alias for Sumi-Indexer operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BatchRunner, CrawlReport, Crawler};
pub use state::{CrawlPhase, PathOutcome};
pub use storage::{SqliteStorage, Storage};
