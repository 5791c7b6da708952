//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{DomainRecord, PageRecord, PageTermRecord, TermCounts, TermRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Uniqueness of domain name, (domain, path), term text and (page, term) is
/// enforced here; callers rely on it rather than on their caches.
pub trait Storage {
    /// Verifies the connection is usable
    fn ping(&self) -> StorageResult<()>;

    // ===== Domains =====

    /// Looks up a registered domain by name
    fn find_domain(&self, domain: &str) -> StorageResult<Option<DomainRecord>>;

    /// Inserts a domain row and returns its id
    ///
    /// Fails with `ConstraintViolation` if the name is already registered.
    fn insert_domain(&mut self, domain: &str, is_https: bool) -> StorageResult<i64>;

    // ===== Pages =====

    /// Returns true if `path` under `domain` has a committed page row
    fn page_exists(&self, domain: &str, path: &str) -> StorageResult<bool>;

    /// Gets a page by domain id and path
    fn find_page(&self, domain_id: i64, path: &str) -> StorageResult<Option<PageRecord>>;

    /// Atomically records a page and its postings
    ///
    /// In a single transaction: inserts the page row, upserts every term
    /// (new terms start at document_frequency 1, existing ones gain exactly 1)
    /// and inserts one page-term row per stem. Any failure rolls everything back.
    ///
    /// # Returns
    ///
    /// The new page id
    fn index_page(&mut self, domain_id: i64, path: &str, terms: &TermCounts)
        -> StorageResult<i64>;

    // ===== Terms =====

    /// Gets a term by its text
    fn find_term(&self, term: &str) -> StorageResult<Option<TermRecord>>;

    /// Gets all postings for a page, ordered by term
    fn page_terms(&self, page_id: i64) -> StorageResult<Vec<PageTermRecord>>;

    /// Terms with the highest document frequency
    fn top_terms(&self, limit: usize) -> StorageResult<Vec<TermRecord>>;

    // ===== Stems =====

    /// Looks up a memoized stem
    fn find_stem(&self, word: &str) -> StorageResult<Option<String>>;

    /// Persists a stem; an existing entry for `word` is left untouched
    fn insert_stem(&mut self, word: &str, stem: &str) -> StorageResult<()>;

    // ===== Statistics =====

    fn count_domains(&self) -> StorageResult<u64>;

    fn count_pages(&self) -> StorageResult<u64>;

    fn count_terms(&self) -> StorageResult<u64>;

    fn count_page_terms(&self) -> StorageResult<u64>;

    fn count_stems(&self) -> StorageResult<u64>;
}
