//! Output module for crawl and index reports
//!
//! This module handles:
//! - Index statistics loaded from the store
//! - Human-readable summaries of batch crawls

pub mod stats;

pub use stats::{load_statistics, print_statistics, IndexStatistics};

use crate::crawler::BatchReport;

/// Prints a per-domain summary of a batch run to stdout
pub fn print_batch_summary(batch: &BatchReport) {
    println!("=== Crawl Summary ===\n");

    for report in &batch.reports {
        match &report.abort {
            Some(reason) => println!("  {:<30} aborted: {}", report.domain, reason),
            None => println!(
                "  {:<30} {} page(s) indexed ({})",
                report.domain,
                report.pages_indexed(),
                report.outcomes
            ),
        }
    }

    for (domain, reason) in &batch.skipped {
        println!("  {:<30} skipped: {}", domain, reason);
    }

    println!();
    println!(
        "Domains: {} crawled, {} aborted, {} skipped",
        batch.domains_crawled(),
        batch.domains_aborted(),
        batch.skipped.len()
    );
    println!("Pages indexed: {}", batch.pages_indexed());
}
