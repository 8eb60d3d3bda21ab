//! Shared helpers for the integration tests

use gleaner::config::CrawlerConfig;
use gleaner::storage::JsonSnapshot;
use gleaner::KnowledgeStore;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawler settings suitable for mock servers: no delay, short timeout
pub fn create_test_config() -> CrawlerConfig {
    CrawlerConfig {
        user_agent: "TestBot/1.0".to_string(),
        delay_seconds: 0.0,
        max_depth: 2,
        max_pages: 10,
        respect_robots_txt: true,
        timeout_seconds: 1.0,
        ..CrawlerConfig::default()
    }
}

/// An HTML response with the given body
pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html; charset=utf-8")
}

/// Serves `body` as HTML at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Serves a robots.txt that allows everything
pub async fn mount_open_robots(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(server)
        .await;
}

/// An empty JSON-backed store at `dir/kb.json`
pub fn json_store(dir: &Path) -> KnowledgeStore {
    KnowledgeStore::new(Box::new(JsonSnapshot::new(dir.join("kb.json"))))
}
