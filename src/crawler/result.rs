use crate::storage::Metadata;
use serde::Serialize;

/// Outcome of one fetch attempt
///
/// Created once per attempted URL and never mutated afterwards. Failed
/// results carry an error message and empty content, title and links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlResult {
    /// URL that was requested
    pub url: String,

    /// Extracted plain text
    pub content: String,

    /// Page title, empty when the page has none
    pub title: String,

    /// Crawl-derived fields (url, title, crawled_at, content_length, ...)
    pub metadata: Metadata,

    /// Absolute links discovered on the page, in document order
    pub links: Vec<String>,

    pub success: bool,

    /// Failure description, present only when `success` is false
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn success(
        url: impl Into<String>,
        content: String,
        title: String,
        metadata: Metadata,
        links: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            content,
            title,
            metadata,
            links,
            success: true,
            error: None,
        }
    }

    pub fn failure(url: impl Into<String>, error: impl ToString) -> Self {
        Self {
            url: url.into(),
            content: String::new(),
            title: String::new(),
            metadata: Metadata::new(),
            links: Vec::new(),
            success: false,
            error: Some(error.to_string()),
        }
    }
}
