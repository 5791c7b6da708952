//! Statistics generation from the index database
//!
//! This module provides functionality for extracting and displaying
//! index statistics from the storage layer.

use crate::storage::{Storage, StorageResult, TermRecord};

/// Number of terms listed in the statistics report
pub const TOP_TERMS: usize = 10;

/// Index statistics summary
#[derive(Debug, Clone)]
pub struct IndexStatistics {
    /// Number of registered domains
    pub domains: u64,

    /// Number of committed pages
    pub pages: u64,

    /// Number of distinct terms
    pub terms: u64,

    /// Number of (page, term) postings
    pub postings: u64,

    /// Number of memoized stems
    pub stems: u64,

    /// Terms with the highest document frequency
    pub top_terms: Vec<TermRecord>,
}

impl IndexStatistics {
    /// Average number of distinct terms per page
    pub fn postings_per_page(&self) -> f64 {
        if self.pages == 0 {
            0.0
        } else {
            self.postings as f64 / self.pages as f64
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<IndexStatistics> {
    Ok(IndexStatistics {
        domains: storage.count_domains()?,
        pages: storage.count_pages()?,
        terms: storage.count_terms()?,
        postings: storage.count_page_terms()?,
        stems: storage.count_stems()?,
        top_terms: storage.top_terms(TOP_TERMS)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &IndexStatistics) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Domains: {}", stats.domains);
    println!("  Pages indexed: {}", stats.pages);
    println!("  Distinct terms: {}", stats.terms);
    println!("  Postings: {}", stats.postings);
    println!("  Memoized stems: {}", stats.stems);
    println!("  Terms per page: {:.1}", stats.postings_per_page());
    println!();

    if !stats.top_terms.is_empty() {
        println!("Top Terms by Document Frequency:");
        for term in &stats.top_terms {
            let share = if stats.pages > 0 {
                (term.document_frequency as f64 / stats.pages as f64) * 100.0
            } else {
                0.0
            };
            println!(
                "  {:<20} {:>6} ({:.1}% of pages)",
                term.term, term.document_frequency, share
            );
        }
    }
}
