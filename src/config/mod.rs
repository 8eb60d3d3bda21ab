//! Configuration module for Gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FilterConfig, PolitenessScope, RetrievalConfig, SnapshotFormat,
    StoreConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

use crate::url::{build_filter, BoxedFilter};
use crate::ConfigResult;

impl Config {
    /// Builds the URL predicate described by the `[filter]` table
    ///
    /// Returns `Ok(None)` when no filter is configured.
    pub fn build_filter(&self) -> ConfigResult<Option<BoxedFilter>> {
        build_filter(&self.filter)
    }
}
