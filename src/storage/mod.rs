//! Storage module for the persistent index
//!
//! This module handles all database operations for the indexer, including:
//! - SQLite database initialization and schema management
//! - Domain registration rows
//! - Transactional page / term / page-term writes
//! - The persistent stem memo
//!
//! The store is the only source of truth; every in-memory cache is rebuilt from it.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::collections::BTreeMap;

/// Stem → occurrence count for one page, ordered for deterministic writes
pub type TermCounts = BTreeMap<String, u32>;

/// Represents a registered domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub id: i64,
    pub domain: String,
    pub is_https: bool,
    pub registered_at: String,
}

/// Represents an indexed page
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: i64,
    pub domain_id: i64,
    pub url_path: String,
    pub indexed_at: String,
}

/// Represents a term in the dictionary
#[derive(Debug, Clone)]
pub struct TermRecord {
    pub id: i64,
    pub term: String,
    pub document_frequency: u32,
    /// Placeholder; ranking is computed elsewhere
    pub idf: f64,
}

/// Represents one posting: a term's frequency within a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTermRecord {
    pub page_id: i64,
    pub term_id: i64,
    pub term: String,
    pub term_frequency: u32,
}
