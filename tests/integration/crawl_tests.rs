//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use crate::common::{create_test_config, html, json_store, mount_open_robots, mount_page};
use gleaner::config::CrawlerConfig;
use gleaner::url::{domain_filter, pattern_filter, UrlFilter};
use gleaner::{FrontierManager, PageState};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_seed_without_links_yields_one_result() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_page(
        &server,
        "/",
        "<html><head><title>A</title></head><body><p>Nothing to follow here.</p></body></html>",
    )
    .await;

    let config = CrawlerConfig {
        max_depth: 2,
        max_pages: 10,
        ..create_test_config()
    };
    let mut frontier = FrontierManager::new(config).unwrap();
    let results = frontier.crawl([format!("{}/", server.uri())], None).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].title, "A");
    assert_eq!(results[0].content, "Nothing to follow here.");
    assert!(results[0].links.is_empty());
}

#[tokio::test]
async fn test_timeout_is_recorded_and_counted() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>too late</p>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    let seed = format!("{}/", server.uri());

    let config = CrawlerConfig {
        timeout_seconds: 0.5,
        ..create_test_config()
    };

    let mut frontier = FrontierManager::new(config.clone()).unwrap();
    let results = frontier.crawl([&seed], None).await;
    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
    assert_eq!(results[0].error.as_deref(), Some("timeout"));
    assert_eq!(results[0].content, "");

    let dir = TempDir::new().unwrap();
    let mut store = json_store(dir.path());
    let mut frontier = FrontierManager::new(config).unwrap();
    let stats = frontier.crawl_and_store([&seed], &mut store, None, 0).await;

    assert_eq!(stats.errors, 1);
    assert_eq!(stats.stored, 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_max_pages_bounds_distinct_fetches() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;

    let links: String = (1..=8)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", links).await;
    for i in 1..=8 {
        mount_page(&server, &format!("/p{}", i), format!("page {}", i)).await;
    }

    let config = CrawlerConfig {
        max_pages: 4,
        ..create_test_config()
    };
    let mut frontier = FrontierManager::new(config).unwrap();
    let results = frontier.crawl([format!("{}/", server.uri())], None).await;

    assert_eq!(results.len(), 4);

    let page_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() != "/robots.txt")
        .count();
    assert_eq!(page_requests, 4);
}

#[tokio::test]
async fn test_max_depth_never_fetches_deeper_links() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_page(&server, "/", r#"<a href="/level1">1</a>"#).await;
    mount_page(&server, "/level1", r#"<a href="/level2">2</a>"#).await;
    mount_page(&server, "/level2", r#"<a href="/level3">3</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html("too deep"))
        .expect(0)
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        max_depth: 2,
        ..create_test_config()
    };
    let mut frontier = FrontierManager::new(config).unwrap();
    let results = frontier.crawl([format!("{}/", server.uri())], None).await;

    let depths: Vec<u64> = results
        .iter()
        .map(|r| r.metadata["depth"].as_u64().unwrap())
        .collect();
    assert_eq!(depths, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_shared_link_fetched_once() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_page(&server, "/", r#"<a href="/left">l</a><a href="/right">r</a>"#).await;
    mount_page(&server, "/left", r#"<a href="/common">c</a>"#).await;
    mount_page(&server, "/right", r#"<a href="/common?utm_source=right">c</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/common"))
        .respond_with(html("common page"))
        .expect(1)
        .mount(&server)
        .await;

    let mut frontier = FrontierManager::new(create_test_config()).unwrap();
    let results = frontier.crawl([format!("{}/", server.uri())], None).await;

    let common: Vec<_> = results
        .iter()
        .filter(|r| r.url.contains("/common"))
        .collect();
    assert_eq!(common.len(), 1);
}

#[tokio::test]
async fn test_robots_policy_blocks_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: TestBot\nDisallow: /members\n"),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        r#"<a href="/members/list">m</a><a href="/about">a</a>"#,
    )
    .await;
    mount_page(&server, "/about", "about us").await;
    Mock::given(method("GET"))
        .and(path("/members/list"))
        .respond_with(html("private"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut store = json_store(dir.path());
    let mut frontier = FrontierManager::new(create_test_config()).unwrap();
    let stats = frontier
        .crawl_and_store([format!("{}/", server.uri())], &mut store, None, 1)
        .await;

    assert_eq!(stats.total_crawled, 2);
    assert_eq!(stats.robots_blocked, 1);
    assert_eq!(
        frontier.page_state(&format!("{}/members/list", server.uri())),
        Some(PageState::Skipped)
    );
}

#[tokio::test]
async fn test_unreachable_robots_does_not_halt_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(&server, "/", "still crawled").await;

    let mut frontier = FrontierManager::new(create_test_config()).unwrap();
    let results = frontier.crawl([format!("{}/", server.uri())], None).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].success);
}

#[tokio::test]
async fn test_domain_and_pattern_filters() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_page(
        &server,
        "/",
        r#"<a href="/docs/intro">d</a><a href="/blog/post">b</a><a href="https://elsewhere.invalid/docs/x">x</a>"#,
    )
    .await;
    mount_page(&server, "/docs/intro", "docs").await;
    Mock::given(method("GET"))
        .and(path("/blog/post"))
        .respond_with(html("blog"))
        .expect(0)
        .mount(&server)
        .await;

    let domains = domain_filter(["127.0.0.1"]);
    let patterns = pattern_filter([r"/docs/|/$"]).unwrap();
    let both = |url: &str| domains.allows(url) && patterns.allows(url);

    let dir = TempDir::new().unwrap();
    let mut store = json_store(dir.path());
    let mut frontier = FrontierManager::new(create_test_config()).unwrap();
    let stats = frontier
        .crawl_and_store([format!("{}/", server.uri())], &mut store, Some(&both), 1)
        .await;

    assert_eq!(stats.total_crawled, 2);
    assert_eq!(stats.filtered, 2);
    assert_eq!(stats.stored, 2);
}

#[tokio::test]
async fn test_global_delay_between_requests() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/next">n</a>"#).await;
    mount_page(&server, "/next", "next").await;

    let config = CrawlerConfig {
        delay_seconds: 0.3,
        respect_robots_txt: false,
        ..create_test_config()
    };
    let mut frontier = FrontierManager::new(config).unwrap();

    let started = Instant::now();
    let results = frontier.crawl([format!("{}/", server.uri())], None).await;

    assert_eq!(results.len(), 2);
    assert!(started.elapsed() >= Duration::from_millis(250));
}

#[tokio::test]
async fn test_independent_frontier_managers() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;
    for server in [&server_a, &server_b] {
        mount_open_robots(server).await;
        mount_page(server, "/", r#"<a href="/child">c</a>"#).await;
        mount_page(server, "/child", "child").await;
    }

    let mut first = FrontierManager::new(create_test_config()).unwrap();
    let mut second = FrontierManager::new(create_test_config()).unwrap();

    let seed_a = format!("{}/", server_a.uri());
    let seed_b = format!("{}/", server_b.uri());
    let (results_a, results_b) = tokio::join!(
        first.crawl([&seed_a], None),
        second.crawl([&seed_b], None)
    );

    assert_eq!(results_a.len(), 2);
    assert_eq!(results_b.len(), 2);
    assert!(first.is_visited(&seed_a));
    assert!(!first.is_visited(&seed_b));
    assert!(!second.is_visited(&seed_a));
}

#[tokio::test]
async fn test_crawl_and_store_persists_through_snapshot() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_page(
        &server,
        "/",
        r#"<html><head><title>Guide</title></head><body>
           <p>The borrow checker enforces aliasing rules at compile time.</p>
           <a href="/short">short</a></body></html>"#,
    )
    .await;
    mount_page(&server, "/short", "<p>Tiny.</p>").await;

    let dir = TempDir::new().unwrap();
    let mut store = json_store(dir.path());
    let mut frontier = FrontierManager::new(create_test_config()).unwrap();
    let stats = frontier
        .crawl_and_store([format!("{}/", server.uri())], &mut store, None, 30)
        .await;

    assert_eq!(stats.stored, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.visited_urls, 2);

    store.save().unwrap();
    let mut reloaded = json_store(dir.path());
    reloaded.load().unwrap();

    let docs = reloaded.retrieve("borrow checker", 3);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title(), Some("Guide"));
    assert_eq!(docs[0].metadata["source"], "crawler");
}
