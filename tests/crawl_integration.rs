//! End-to-end crawl tests against a local mock server.

use catalog_crawler::commands::CrawlCommand;
use catalog_crawler::config::Config;
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_1: &str = include_str!("fixtures/catalog_page_1.html");
const PAGE_2: &str = include_str!("fixtures/catalog_page_2.html");
const EDGE_CASES: &str = include_str!("fixtures/catalog_edge_cases.html");

fn make_config(server: &MockServer, dir: &TempDir) -> Config {
    Config {
        start_url: format!("{}/", server.uri()),
        allowed_domain: "127.0.0.1".to_string(),
        output: dir.path().join("export.csv"),
        max_retries: 0,
        retry_backoff_ms: 0,
        timeout_secs: 5,
        ..Config::default()
    }
}

async fn serve(server: &MockServer, at: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_page_catalog() {
    let server = MockServer::start().await;
    serve(&server, "/", PAGE_1, 1).await;
    serve(&server, "/catalogue/page-2.html", PAGE_2, 1).await;

    let dir = tempdir().unwrap();
    let config = make_config(&server, &dir);

    let report = CrawlCommand::new(config.clone()).execute().await.unwrap();
    assert!(report.contains("Records:        3"));

    let contents = std::fs::read_to_string(&config.output).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Title,Price",
            "A Light in the Attic,£51.77",
            "It's Only the Himalayas,£45.17",
            "In Her Wake,£12.84",
        ]
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_off_domain_link_not_followed() {
    let server = MockServer::start().await;
    serve(&server, "/", EDGE_CASES, 1).await;

    let dir = tempdir().unwrap();
    let config = make_config(&server, &dir);

    let summary = CrawlCommand::new(config.clone()).run().await.unwrap();
    assert_eq!(summary.pages_visited(), 1);
    assert_eq!(summary.records_written, 3);
    assert_eq!(summary.skipped_off_domain, vec!["http://other.example.com/next".to_string()]);

    let contents = std::fs::read_to_string(&config.output).unwrap();
    assert_eq!(contents.lines().count(), 4);
}

#[tokio::test]
async fn test_seed_outside_allowed_domain() {
    let server = MockServer::start().await;
    serve(&server, "/", PAGE_1, 0).await;

    let dir = tempdir().unwrap();
    let config =
        Config { allowed_domain: "books.toscrape.com".to_string(), ..make_config(&server, &dir) };

    let summary = CrawlCommand::new(config.clone()).run().await.unwrap();
    assert_eq!(summary.pages_visited(), 0);

    let contents = std::fs::read_to_string(&config.output).unwrap();
    assert_eq!(contents, "Title,Price\n");
}

#[tokio::test]
async fn test_failed_page_keeps_earlier_rows() {
    let server = MockServer::start().await;
    serve(&server, "/", PAGE_1, 1).await;
    Mock::given(method("GET"))
        .and(path("/catalogue/page-2.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = make_config(&server, &dir);

    let summary = CrawlCommand::new(config.clone()).run().await.unwrap();
    assert_eq!(summary.pages_visited(), 1);
    assert_eq!(summary.failed.len(), 1);

    let contents = std::fs::read_to_string(&config.output).unwrap();
    assert_eq!(contents.lines().count(), 3);
}

#[tokio::test]
async fn test_server_error_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    serve(&server, "/", PAGE_2, 1).await;

    let dir = tempdir().unwrap();
    let config = Config { max_retries: 1, ..make_config(&server, &dir) };

    let summary = CrawlCommand::new(config.clone()).run().await.unwrap();
    assert_eq!(summary.pages_visited(), 1);
    assert_eq!(summary.records_written, 1);
    assert!(summary.is_clean());
}

#[tokio::test]
async fn test_same_host_redirect_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/index.html"))
        .expect(1)
        .mount(&server)
        .await;
    serve(&server, "/index.html", PAGE_1, 1).await;
    serve(&server, "/catalogue/page-2.html", PAGE_2, 1).await;

    let dir = tempdir().unwrap();
    let config = make_config(&server, &dir);

    let summary = CrawlCommand::new(config.clone()).run().await.unwrap();
    assert_eq!(summary.records_written, 3);
    assert!(summary.is_clean());

    let contents = std::fs::read_to_string(&config.output).unwrap();
    assert!(contents.starts_with("Title,Price\nA Light in the Attic,£51.77\n"));
    assert!(contents.ends_with("In Her Wake,£12.84\n"));
}

#[tokio::test]
async fn test_off_domain_redirect_not_requested() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "http://elsewhere.invalid/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = make_config(&server, &dir);

    let summary = CrawlCommand::new(config.clone()).run().await.unwrap();
    assert_eq!(summary.records_written, 0);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.skipped_off_domain, vec!["http://elsewhere.invalid/".to_string()]);

    let contents = std::fs::read_to_string(&config.output).unwrap();
    assert_eq!(contents, "Title,Price\n");
}
