//! Output module for crawl and store reporting
//!
//! This module handles:
//! - The statistics tally produced by a crawl-and-store run
//! - Printing crawl and knowledge store statistics

pub mod stats;

pub use stats::{print_statistics, print_store_statistics, CrawlStats};
