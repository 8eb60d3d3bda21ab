//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests that follow redirects
//! - Content-Type checks (HTML only)
//! - Error classification into [`FetchError`]
//!
//! The fetcher never returns an error past [`Fetcher::fetch`]: every failure
//! is folded into a failed [`CrawlResult`].

use crate::config::CrawlerConfig;
use crate::crawler::extractor::extract;
use crate::crawler::result::CrawlResult;
use crate::storage::Metadata;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Content types treated as HTML pages
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Network failure for a single URL
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("timeout")]
    Timeout,

    #[error("connection error: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("unsupported content type: {0}")]
    ContentType(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The same client is shared by the page fetcher and robots.txt lookups so
/// both identify with the configured user agent and obey the same timeout.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Single-URL HTTP retriever
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Retrieves the raw markup of a page
    ///
    /// # Request Flow
    ///
    /// 1. Send GET request (redirects are followed by the client)
    /// 2. Reject non-success status codes
    /// 3. Reject responses that are not HTML
    /// 4. Read the body as text
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The page markup
    /// * `Err(FetchError)` - Timeout, connection, status, content-type or body failure
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_markup(url).await.map(|(_, body)| body)
    }

    /// Fetches and extracts a page as a seed (depth 0)
    pub async fn fetch(&self, url: &str) -> CrawlResult {
        self.fetch_at_depth(url, 0).await
    }

    /// Fetches and extracts a page, recording `depth` in its metadata
    ///
    /// Links are resolved against the final URL after redirects.
    pub async fn fetch_at_depth(&self, url: &str, depth: u32) -> CrawlResult {
        let (final_url, body) = match self.fetch_markup(url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::debug!("Fetch of {} failed: {}", url, e);
                return CrawlResult::failure(url, e);
            }
        };

        let page = extract(&body, &final_url);

        let mut metadata = Metadata::new();
        metadata.insert("url".to_string(), Value::from(url));
        metadata.insert("title".to_string(), Value::from(page.title.as_str()));
        metadata.insert("crawled_at".to_string(), Value::from(Utc::now().to_rfc3339()));
        metadata.insert(
            "content_length".to_string(),
            Value::from(page.text.chars().count()),
        );
        metadata.insert("num_links".to_string(), Value::from(page.links.len()));
        metadata.insert("depth".to_string(), Value::from(depth));

        CrawlResult::success(url, page.text, page.title, metadata, page.links)
    }

    async fn fetch_markup(&self, url: &str) -> Result<(Url, String), FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_html(&content_type) {
            return Err(FetchError::ContentType(content_type));
        }

        let final_url = response.url().clone();
        let body = response.text().await?;
        Ok((final_url, body))
    }
}

/// Checks whether a Content-Type header value denotes HTML
fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    HTML_CONTENT_TYPES.contains(&mime.as_str())
}
