//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! Robots policies are advisory: any failure to obtain one yields a permissive policy.

mod cache;
mod parser;

pub use cache::CachedRobots;
pub use parser::{product_token, ParsedRobots};

use reqwest::Client;
use url::Url;

/// Builds the robots.txt location for the origin of `url`
///
/// Returns None for URLs without a host (e.g. `data:` URLs).
pub fn robots_url(url: &Url) -> Option<Url> {
    url.host_str()?;
    let mut robots = url.clone();
    robots.set_path("/robots.txt");
    robots.set_query(None);
    robots.set_fragment(None);
    Some(robots)
}

/// Fetches and parses robots.txt for the origin of `url`
///
/// Uses the same HTTP client (and therefore user agent and timeout) as the
/// page fetcher. Never fails: network errors, non-success statuses and
/// unreadable bodies all produce an allow-all policy.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Any URL on the host whose policy is wanted
pub async fn fetch_robots(client: &Client, url: &Url) -> ParsedRobots {
    let Some(robots_location) = robots_url(url) else {
        return ParsedRobots::allow_all();
    };

    let response = match client.get(robots_location.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                "Failed to fetch {}: {}; allowing all",
                robots_location,
                e
            );
            return ParsedRobots::allow_all();
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(
            "{} returned HTTP {}; allowing all",
            robots_location,
            status.as_u16()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}; allowing all", robots_location, e);
            ParsedRobots::allow_all()
        }
    }
}
