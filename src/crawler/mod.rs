//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with typed failures
//! - HTML text, title and link extraction
//! - Robots.txt checks and request pacing
//! - Breadth-first frontier management and storage hand-off

mod extractor;
mod fetcher;
mod frontier;
mod politeness;
mod result;

pub use extractor::{extract, ExtractedPage};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use frontier::{FrontierManager, StopHandle};
pub use politeness::PolitenessGate;
pub use result::CrawlResult;
