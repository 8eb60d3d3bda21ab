use crate::robots::{CachedRobots, ParsedRobots};
use std::time::{Duration, Instant};

/// Tracks the state of a host during crawling
///
/// This structure maintains per-host information needed for rate limiting
/// and robots.txt caching.
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of requests made to this host in the current crawl
    pub request_count: u32,

    /// Timestamp of the last request to this host
    pub last_request_time: Option<Instant>,

    /// Cached robots.txt policy for this host
    pub robots: Option<CachedRobots>,
}

impl HostState {
    /// Creates a new HostState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a request was made to this host
    ///
    /// Updates the request count and last request time.
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < delay {
            Some(delay - elapsed)
        } else {
            None
        }
    }

    /// Checks if the robots.txt cache is missing or stale (older than 24 hours)
    pub fn is_robots_stale(&self) -> bool {
        self.robots.as_ref().map_or(true, CachedRobots::is_stale)
    }

    /// Updates the robots.txt cache
    pub fn update_robots(&mut self, robots: ParsedRobots) {
        self.robots = Some(CachedRobots::new(robots));
    }

    /// Calculates the effective delay for this host
    ///
    /// This takes the maximum of the configured delay and the robots.txt
    /// crawl delay for `user_agent`, if one is declared. The robots delay is
    /// capped at `ceiling`; values that do not fit a `Duration` are ignored.
    pub fn effective_delay(
        &self,
        configured: Duration,
        ceiling: Duration,
        user_agent: &str,
    ) -> Duration {
        let robots_delay = self
            .robots
            .as_ref()
            .and_then(|cached| cached.crawl_delay(user_agent))
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
            .map_or(Duration::ZERO, |delay| delay.min(ceiling));

        std::cmp::max(configured, robots_delay)
    }
}
