//! State module for tracking crawl progress
//!
//! This module provides state management for URLs and hosts during a crawl.
//!
//! # Components
//!
//! - `PageState`: Lifecycle of a single frontier entry (queued, fetched, stored, ...)
//! - `HostState`: Per-host politeness state (last request time, cached robots.txt)

mod host_state;
mod page_state;

// Re-export main types
pub use host_state::HostState;
pub use page_state::PageState;
