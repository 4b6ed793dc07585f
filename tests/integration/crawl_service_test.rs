// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use pageblocks::config::settings::ScraperSettings;
use pageblocks::domain::services::crawl_service::{CrawlError, CrawlerService};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crawler() -> CrawlerService {
    let settings = ScraperSettings {
        allowed_domains: vec!["127.0.0.1".to_string()],
        timeout_secs: 5,
        ..ScraperSettings::default()
    };
    CrawlerService::new(&settings).unwrap()
}

async fn mount_page(server: &MockServer, route: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .expect(expected_hits)
        .mount(server)
        .await;
}

/// 两层站点：/ → /a, /b；/a → /c
async fn two_level_site(expected_c_hits: u64) -> MockServer {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="https://outside.example.org/x">Out</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/a", r#"<a href="/c">C</a><a href="/">Home</a>"#, 1).await;
    mount_page(&server, "/b", r#"<a href="/a#top">A again</a>"#, 1).await;
    mount_page(&server, "/c", "<p>leaf</p>", expected_c_hits).await;
    server
}

fn sorted(mut urls: Vec<String>) -> Vec<String> {
    urls.sort();
    urls
}

#[tokio::test]
async fn test_depth_one_fetches_only_seed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/a">A</a>"#, 1).await;
    mount_page(&server, "/a", "<p>never</p>", 0).await;

    let seed = format!("{}/", server.uri());
    let pages = crawler().crawl(&seed, 1).await.unwrap();

    assert_eq!(pages, vec![seed]);
}

#[tokio::test]
async fn test_depth_two_reaches_direct_children() {
    let server = two_level_site(0).await;
    let base = server.uri();

    let pages = crawler().crawl(&format!("{}/", base), 2).await.unwrap();

    assert_eq!(pages[0], format!("{}/", base));
    assert_eq!(
        sorted(pages),
        sorted(vec![
            format!("{}/", base),
            format!("{}/a", base),
            format!("{}/b", base),
        ])
    );
}

#[tokio::test]
async fn test_no_url_is_fetched_twice() {
    // /a is linked from both / and /b, / from /a; every page is hit exactly once
    let server = two_level_site(1).await;
    let base = server.uri();

    let pages = crawler().crawl(&format!("{}/", base), 5).await.unwrap();

    assert_eq!(pages.len(), 4);
    let mut unique = pages.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), pages.len());
}

#[tokio::test]
async fn test_failed_child_does_not_stop_siblings() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>fine</p>", 1).await;

    let base = server.uri();
    let pages = crawler().crawl(&format!("{}/", base), 3).await.unwrap();

    assert_eq!(
        sorted(pages),
        sorted(vec![format!("{}/", base), format!("{}/ok", base)])
    );
}

#[tokio::test]
async fn test_seed_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = crawler()
        .crawl(&format!("{}/", server.uri()), 2)
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::SeedFetch { .. }));
}

#[tokio::test]
async fn test_depth_zero_performs_no_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>unused</p>", 0).await;

    let pages = crawler().crawl(&format!("{}/", server.uri()), 0).await.unwrap();
    assert!(pages.is_empty());
}

#[tokio::test]
async fn test_disallowed_seed_is_rejected() {
    let err = crawler()
        .crawl("https://outside.example.org/", 2)
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::DomainNotAllowed(_)));
}
