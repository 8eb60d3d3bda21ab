//! Crawl and store statistics
//!
//! This module provides the tallies returned by a crawl-and-store run and
//! functions for displaying them alongside knowledge store figures.

use crate::storage::StoreStatistics;
use serde::Serialize;

/// Tally of one `crawl_and_store` run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Fetch attempts (successful and failed)
    pub total_crawled: usize,

    /// New documents added to the store
    pub stored: usize,

    /// Successful pages not stored (thin content or duplicates)
    pub skipped: usize,

    /// Failed fetches
    pub errors: usize,

    /// Size of the visited set after the run
    pub visited_urls: usize,

    /// Successful pages whose content was already stored
    pub duplicates: usize,

    /// URLs rejected by the filter predicate (never fetched)
    pub filtered: usize,

    /// URLs disallowed by robots.txt (never fetched)
    pub robots_blocked: usize,
}

impl CrawlStats {
    /// Percentage of fetch attempts that ended with a stored document
    pub fn store_rate(&self) -> f64 {
        if self.total_crawled == 0 {
            0.0
        } else {
            (self.stored as f64 / self.total_crawled as f64) * 100.0
        }
    }
}

/// Prints crawl statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Pages:");
    println!("  Crawled: {}", stats.total_crawled);
    println!("  Stored: {}", stats.stored);
    println!("  Skipped: {} ({} duplicates)", stats.skipped, stats.duplicates);
    println!("  Errors: {}", stats.errors);
    println!();

    println!("URLs:");
    println!("  Visited: {}", stats.visited_urls);
    println!("  Filtered out: {}", stats.filtered);
    println!("  Blocked by robots.txt: {}", stats.robots_blocked);
    println!();

    println!(
        "Store Rate: {:.1}% ({} / {} pages stored)",
        stats.store_rate(),
        stats.stored,
        stats.total_crawled
    );
}

/// Prints knowledge store statistics to stdout
pub fn print_store_statistics(stats: &StoreStatistics) {
    println!("=== Knowledge Store ===\n");
    println!("  Documents: {}", stats.documents);
    println!("  Total characters: {}", stats.total_characters);
    println!("  Distinct hosts: {}", stats.distinct_hosts);

    if stats.documents > 0 {
        println!(
            "  Average document length: {} characters",
            stats.total_characters / stats.documents
        );
    }
}
