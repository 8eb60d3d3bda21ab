//! Politeness gate: robots.txt checks and inter-request delay
//!
//! The gate is consulted before every fetch. [`PolitenessGate::allow`]
//! answers whether robots.txt permits the URL, and [`PolitenessGate::wait`]
//! suspends the crawl until the configured delay has elapsed since the last
//! request (to any host, or to the same host in per-host mode).

use crate::config::{CrawlerConfig, PolitenessScope};
use crate::robots::fetch_robots;
use crate::state::HostState;
use crate::url::origin_key;
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

/// Rate limiter and robots policy checker for a single crawl flow
#[derive(Debug)]
pub struct PolitenessGate {
    client: Client,
    user_agent: String,
    delay: Duration,
    max_crawl_delay: Duration,
    respect_robots: bool,
    scope: PolitenessScope,
    hosts: HashMap<String, HostState>,
    last_request: Option<Instant>,
}

impl PolitenessGate {
    /// Creates a gate that fetches robots.txt with `client`
    pub fn new(config: &CrawlerConfig, client: Client) -> Self {
        Self {
            client,
            user_agent: config.user_agent.clone(),
            delay: config.delay(),
            max_crawl_delay: config.max_crawl_delay(),
            respect_robots: config.respect_robots_txt,
            scope: config.politeness_scope,
            hosts: HashMap::new(),
            last_request: None,
        }
    }

    /// Checks robots.txt for `url`
    ///
    /// The host's policy is fetched on first use and cached for 24 hours.
    /// Any failure to obtain the policy allows the URL. Always true when
    /// robots.txt is not respected.
    pub async fn allow(&mut self, url: &Url) -> bool {
        if !self.respect_robots {
            return true;
        }

        let Some(key) = origin_key(url) else {
            return true;
        };

        let stale = self.hosts.get(&key).map_or(true, HostState::is_robots_stale);
        if stale {
            tracing::debug!("Fetching robots.txt for {}", key);
            let robots = fetch_robots(&self.client, url).await;
            self.hosts.entry(key.clone()).or_default().update_robots(robots);
        }

        self.hosts
            .get(&key)
            .and_then(|host| host.robots.as_ref())
            .map_or(true, |robots| robots.is_allowed(url.as_str(), &self.user_agent))
    }

    /// Suspends until a request to `url` is permitted, then records it
    ///
    /// The delay is the larger of the configured delay and the host's
    /// robots.txt Crawl-delay (capped at `max-crawl-delay-seconds`). The
    /// first request never waits.
    pub async fn wait(&mut self, url: &Url) {
        let now = Instant::now();
        let remaining = self.remaining_delay(url, now);

        if let Some(remaining) = remaining {
            tracing::trace!("Waiting {:?} before requesting {}", remaining, url);
            tokio::time::sleep(remaining).await;
        }

        self.record_request(url, Instant::now());
    }

    /// Time still to wait before `url` may be requested at `now`
    pub fn remaining_delay(&self, url: &Url, now: Instant) -> Option<Duration> {
        let key = origin_key(url);
        let host = key.as_ref().and_then(|k| self.hosts.get(k));

        let delay = host.map_or(self.delay, |h| {
            h.effective_delay(self.delay, self.max_crawl_delay, &self.user_agent)
        });
        if delay.is_zero() {
            return None;
        }

        match self.scope {
            PolitenessScope::Global => {
                let last = self.last_request?;
                let elapsed = now.saturating_duration_since(last);
                (elapsed < delay).then(|| delay - elapsed)
            }
            PolitenessScope::PerHost => host?.time_until_next_request(delay, now),
        }
    }

    fn record_request(&mut self, url: &Url, now: Instant) {
        self.last_request = Some(now);
        if let Some(key) = origin_key(url) {
            self.hosts.entry(key).or_default().record_request(now);
        }
    }

    /// Number of requests recorded against the host of `url`
    pub fn request_count(&self, url: &Url) -> u32 {
        origin_key(url)
            .and_then(|key| self.hosts.get(&key))
            .map_or(0, |host| host.request_count)
    }

    /// Forgets all host state and the last request time
    pub fn reset(&mut self) {
        self.hosts.clear();
        self.last_request = None;
    }
}
