//! Frontier manager - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - The FIFO frontier queue and depth tracking
//! - The visited set (normalized URLs, persistent across crawls)
//! - The page budget and early termination
//! - Politeness checks, fetching, extraction and link following
//! - Handing extracted text to the knowledge store

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::politeness::PolitenessGate;
use crate::crawler::result::CrawlResult;
use crate::output::CrawlStats;
use crate::state::PageState;
use crate::storage::{document_id, KnowledgeStore, Metadata};
use crate::url::{normalize_url, UrlFilter};
use crate::GleanError;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle that ends a running crawl at its next checkpoint
///
/// The flag is sticky: once stopped, later crawls on the same manager also
/// stop immediately until [`FrontierManager::reset`] is called.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests that the crawl stop after the current page
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// URLs skipped before fetching during one crawl
#[derive(Debug, Default)]
struct SkipCounts {
    filtered: usize,
    robots_blocked: usize,
}

/// Breadth-first crawler bounded by depth and page budget
///
/// Each instance owns its queue, visited set and politeness state, so
/// several managers can run in one process without sharing anything.
pub struct FrontierManager {
    config: CrawlerConfig,
    fetcher: Fetcher,
    gate: PolitenessGate,
    queue: VecDeque<(String, u32)>,
    visited: HashSet<String>,
    pages: HashMap<String, PageState>,
    document_metadata: Metadata,
    stop: StopHandle,
}

impl FrontierManager {
    /// Creates a frontier manager instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(FrontierManager)` - Successfully created manager
    /// * `Err(GleanError)` - The HTTP client could not be built
    pub fn new(config: CrawlerConfig) -> Result<Self, GleanError> {
        let fetcher = Fetcher::new(&config)?;
        let gate = PolitenessGate::new(&config, fetcher.client().clone());

        Ok(Self {
            config,
            fetcher,
            gate,
            queue: VecDeque::new(),
            visited: HashSet::new(),
            pages: HashMap::new(),
            document_metadata: Metadata::new(),
            stop: StopHandle::default(),
        })
    }

    /// Returns a handle that can end the crawl from another task
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Adds a metadata entry to every document stored by `crawl_and_store`
    pub fn set_document_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.document_metadata.insert(key.into(), value.into());
    }

    /// Number of distinct normalized URLs visited so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Whether `url` (in any equivalent spelling) has been visited
    pub fn is_visited(&self, url: &str) -> bool {
        normalize_url(url).map_or(false, |u| self.visited.contains(u.as_str()))
    }

    /// Lifecycle state of a visited URL
    pub fn page_state(&self, url: &str) -> Option<PageState> {
        let key = normalize_url(url).ok()?;
        self.pages.get(key.as_str()).copied()
    }

    /// Clears the visited set, page states, politeness state and stop flag
    pub fn reset(&mut self) {
        self.queue.clear();
        self.visited.clear();
        self.pages.clear();
        self.gate.reset();
        self.stop.clear();
    }

    /// Crawls breadth-first from `seeds`
    ///
    /// # Algorithm
    ///
    /// 1. Dequeue the next `(url, depth)` in FIFO order
    /// 2. Skip it if already visited, otherwise mark it visited
    /// 3. Skip it if `filter` rejects it
    /// 4. Skip it if robots.txt disallows it
    /// 5. Wait out the politeness delay, then fetch
    /// 6. On success, enqueue links at `depth + 1` while `depth < max_depth`
    ///
    /// The crawl ends when the queue is empty, `max_pages` fetches have been
    /// attempted, or the stop handle is triggered. Fetch failures are
    /// returned as failed results and never abort the crawl.
    pub async fn crawl<I, S>(&mut self, seeds: I, filter: Option<&dyn UrlFilter>) -> Vec<CrawlResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(seeds, filter).await.0
    }

    /// Crawls from `seeds` and adds each sufficiently long page to `store`
    ///
    /// Pages with fewer than `min_content_length` characters (or no text at
    /// all) are skipped. Pages whose content is already stored are counted
    /// as duplicates and skipped. The store is not saved; callers decide
    /// when to persist it.
    pub async fn crawl_and_store<I, S>(
        &mut self,
        seeds: I,
        store: &mut KnowledgeStore,
        filter: Option<&dyn UrlFilter>,
        min_content_length: usize,
    ) -> CrawlStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (results, skips) = self.run(seeds, filter).await;

        let mut stats = CrawlStats {
            total_crawled: results.len(),
            filtered: skips.filtered,
            robots_blocked: skips.robots_blocked,
            ..CrawlStats::default()
        };

        for result in results {
            if !result.success {
                stats.errors += 1;
                continue;
            }

            self.mark(&result.url, PageState::Filtered);

            if result.content.trim().is_empty()
                || result.content.chars().count() < min_content_length
            {
                tracing::debug!(
                    "Skipping {}: {} characters of content",
                    result.url,
                    result.content.chars().count()
                );
                stats.skipped += 1;
                self.mark(&result.url, PageState::Skipped);
                continue;
            }

            if store.contains(&document_id(&result.content)) {
                tracing::debug!("Skipping {}: content already stored", result.url);
                stats.duplicates += 1;
                stats.skipped += 1;
                self.mark(&result.url, PageState::Skipped);
                continue;
            }

            let mut metadata = result.metadata;
            metadata.insert("source".to_string(), Value::from("crawler"));
            metadata.insert("crawl_url".to_string(), Value::from(result.url.as_str()));
            for (key, value) in &self.document_metadata {
                metadata.insert(key.clone(), value.clone());
            }

            match store.add(result.content, metadata) {
                Ok(doc) => {
                    tracing::debug!("Stored {} as document {}", result.url, doc.id);
                    stats.stored += 1;
                    self.mark(&result.url, PageState::Stored);
                }
                Err(e) => {
                    tracing::warn!("Failed to store {}: {}", result.url, e);
                    stats.skipped += 1;
                    self.mark(&result.url, PageState::Skipped);
                }
            }
        }

        stats.visited_urls = self.visited.len();

        tracing::info!(
            "Crawl finished: {} crawled, {} stored, {} skipped, {} errors",
            stats.total_crawled,
            stats.stored,
            stats.skipped,
            stats.errors
        );

        stats
    }

    async fn run<I, S>(
        &mut self,
        seeds: I,
        filter: Option<&dyn UrlFilter>,
    ) -> (Vec<CrawlResult>, SkipCounts)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut results = Vec::new();
        let mut skips = SkipCounts::default();

        self.queue.clear();
        self.queue
            .extend(seeds.into_iter().map(|s| (s.as_ref().to_string(), 0)));

        tracing::info!(
            "Starting crawl with {} seeds (max depth {}, max pages {})",
            self.queue.len(),
            self.config.max_depth,
            self.config.max_pages
        );

        while let Some((raw_url, depth)) = self.queue.pop_front() {
            if self.stop.is_stopped() {
                tracing::info!("Crawl stopped with {} URLs still queued", self.queue.len() + 1);
                break;
            }

            if results.len() >= self.config.max_pages {
                tracing::info!("Page budget of {} reached", self.config.max_pages);
                break;
            }

            if depth > self.config.max_depth {
                continue;
            }

            let url = match normalize_url(&raw_url) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Dropping {}: {}", raw_url, e);
                    continue;
                }
            };
            let key = url.to_string();

            if !self.visited.insert(key.clone()) {
                tracing::trace!("Already visited {}", key);
                continue;
            }
            self.pages.insert(key.clone(), PageState::Queued);

            if let Some(filter) = filter {
                if !filter.allows(url.as_str()) {
                    tracing::debug!("Filtered out {}", url);
                    skips.filtered += 1;
                    self.mark(&key, PageState::Skipped);
                    continue;
                }
            }

            if !self.gate.allow(&url).await {
                tracing::info!("URL {} disallowed by robots.txt", url);
                skips.robots_blocked += 1;
                self.mark(&key, PageState::Skipped);
                continue;
            }
            self.mark(&key, PageState::PolitenessChecked);

            self.gate.wait(&url).await;

            tracing::debug!("Fetching {} (depth {})", url, depth);
            let result = self.fetcher.fetch_at_depth(url.as_str(), depth).await;

            if !result.success {
                tracing::warn!(
                    "Failed to fetch {}: {}",
                    url,
                    result.error.as_deref().unwrap_or("unknown error")
                );
                self.mark(&key, PageState::Errored);
                results.push(result);
                continue;
            }

            self.mark(&key, PageState::Fetched);
            self.mark(&key, PageState::Extracted);

            if depth < self.config.max_depth {
                self.queue
                    .extend(result.links.iter().map(|link| (link.clone(), depth + 1)));
            }

            results.push(result);
        }

        tracing::info!(
            "Crawl loop finished: {} pages fetched, {} URLs visited",
            results.len(),
            self.visited.len()
        );

        (results, skips)
    }

    /// Moves a page to its next lifecycle state
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The transition was valid and recorded
    /// * `Err(GleanError::InvalidTransition)` - The transition is not allowed
    pub fn advance(&mut self, url: &str, next: PageState) -> Result<(), GleanError> {
        let key = normalize_url(url)?.to_string();
        let current = self.pages.get(&key).copied().unwrap_or(PageState::Queued);

        if !current.can_transition_to(next) {
            return Err(GleanError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        tracing::trace!("{}: {} -> {}", key, current, next);
        self.pages.insert(key, next);
        Ok(())
    }

    fn mark(&mut self, url: &str, next: PageState) {
        if let Err(e) = self.advance(url, next) {
            tracing::warn!("{}: {}", url, e);
        }
    }
}
