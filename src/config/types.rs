use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Gleaner
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub store: StoreConfig,
    pub retrieval: RetrievalConfig,
    pub filter: FilterConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// User agent sent with every request (pages and robots.txt)
    pub user_agent: String,

    /// Delay between requests, in seconds
    pub delay_seconds: f64,

    /// Maximum depth to crawl from seed URLs (seeds are depth 0)
    pub max_depth: u32,

    /// Maximum number of pages fetched per crawl
    pub max_pages: usize,

    /// Whether to consult robots.txt before fetching
    pub respect_robots_txt: bool,

    /// Upper bound on a single request, in seconds
    pub timeout_seconds: f64,

    /// Whether the delay is tracked across all hosts or per host
    pub politeness_scope: PolitenessScope,

    /// Ceiling applied to a robots.txt `Crawl-delay`, in seconds
    pub max_crawl_delay_seconds: f64,
}

impl CrawlerConfig {
    /// Configured inter-request delay
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_seconds).unwrap_or(Duration::ZERO)
    }

    /// Longest delay a robots.txt `Crawl-delay` may impose
    pub fn max_crawl_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_crawl_delay_seconds)
            .unwrap_or(Duration::from_secs(60))
    }

    /// Configured request timeout
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds).unwrap_or(Duration::from_secs(10))
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: "GleanerBot/1.0".to_string(),
            delay_seconds: 1.0,
            max_depth: 2,
            max_pages: 100,
            respect_robots_txt: true,
            timeout_seconds: 10.0,
            politeness_scope: PolitenessScope::Global,
            max_crawl_delay_seconds: 60.0,
        }
    }
}

/// Scope of the politeness delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolitenessScope {
    /// One delay since the last request to any host
    #[default]
    Global,
    /// An independent delay per host
    PerHost,
}

/// Knowledge store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StoreConfig {
    /// Location of the snapshot file
    pub path: PathBuf,

    /// Snapshot encoding
    pub format: SnapshotFormat,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("knowledge_base.json"),
            format: SnapshotFormat::Json,
        }
    }
}

/// Snapshot encoding on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    #[default]
    Json,
    Sqlite,
}

/// Retrieval and storage thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetrievalConfig {
    /// Number of documents retrieved per query
    pub top_k: usize,

    /// Minimum extracted text length (characters) for a crawled page to be stored
    pub min_content_length: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_content_length: 100,
        }
    }
}

/// URL filter configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Domain allowlist (e.g., "example.com" or "*.example.com")
    pub allowed_domains: Vec<String>,

    /// Regex allowlist matched anywhere in the URL
    pub patterns: Vec<String>,
}
