//! URL handling module for Gleaner
//!
//! This module provides URL normalization, domain extraction, domain
//! matching, and the URL filters used to scope a crawl.

mod domain;
mod filter;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, origin_key};
pub use filter::{
    build_filter, domain_filter, pattern_filter, BoxedFilter, DomainFilter, PatternFilter,
    UrlFilter,
};
pub use matcher::matches_domain;
pub use normalize::normalize_url;
