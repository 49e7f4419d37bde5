//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full batches
//! through the HTTP fetcher, the orchestrator, and the text log.

use gleaner::config::{Config, UserAgentConfig};
use gleaner::crawler::{crawl, HttpFetcher, Orchestrator, OrchestratorOptions, NO_TITLE};
use gleaner::output::RunSummary;
use gleaner::{ConfigError, GleanerError};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn http_orchestrator(options: OrchestratorOptions) -> Orchestrator {
    let fetcher = Arc::new(HttpFetcher::new(&test_user_agent()).expect("Failed to build fetcher"));
    Orchestrator::new(options, fetcher).expect("Failed to create orchestrator")
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_ok_and_missing_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/ok", 200, "<h1>Hi</h1>...").await;
    mount_page(&server, "/fail", 404, "").await;

    let ok = format!("{}/ok", server.uri());
    let fail = format!("{}/fail", server.uri());
    let orchestrator = http_orchestrator(OrchestratorOptions::default());

    let mut completions = 0;
    let results = orchestrator
        .run(&[ok.clone(), fail], |_| completions += 1)
        .await
        .expect("Run failed");

    assert_eq!(completions, 1);
    assert_eq!(results.len(), 2);

    let record = results[0].as_ref().expect("ok page should be stored");
    assert_eq!(record.link, ok);
    assert_eq!(record.title, "Hi");
    assert_eq!(record.content, "<h1>Hi</h1>...");
    assert!(results[1].is_none());
}

#[tokio::test]
async fn test_title_fallbacks_over_http() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/titled",
        200,
        "<html><head><title>Document</title></head><body>text</body></html>",
    )
    .await;
    mount_page(&server, "/plain", 200, "<html><body><p>nothing</p></body></html>").await;

    let links = vec![
        format!("{}/titled", server.uri()),
        format!("{}/plain", server.uri()),
    ];
    let results = http_orchestrator(OrchestratorOptions::default())
        .run(&links, |_| {})
        .await
        .unwrap();

    assert_eq!(results[0].as_ref().unwrap().title, "Document");
    assert_eq!(results[1].as_ref().unwrap().title, NO_TITLE);
}

#[tokio::test]
async fn test_server_errors_and_empty_bodies_are_rejected() {
    let server = MockServer::start().await;
    mount_page(&server, "/error", 500, "<h1>Oops</h1>").await;
    mount_page(&server, "/empty", 200, "").await;
    mount_page(&server, "/short", 200, "123456789").await;

    let links = vec![
        format!("{}/error", server.uri()),
        format!("{}/empty", server.uri()),
        format!("{}/short", server.uri()),
    ];

    let mut summary = RunSummary::default();
    let results = http_orchestrator(OrchestratorOptions::default())
        .run(&links, |s| summary = s.clone())
        .await
        .unwrap();

    assert!(results[0].is_none());
    assert!(results[1].is_none());
    assert_eq!(results[2].as_ref().unwrap().content, "123456789");

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.rejected, 2);
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.short_content, 1);
}

#[tokio::test]
async fn test_unreachable_host_does_not_abort_run() {
    let server = MockServer::start().await;
    mount_page(&server, "/ok", 200, "<h1>Still here</h1>").await;

    let links = vec![
        "http://127.0.0.1:9/unreachable".to_string(),
        format!("{}/ok", server.uri()),
    ];

    let mut summary = RunSummary::default();
    let results = http_orchestrator(OrchestratorOptions::default())
        .run(&links, |s| summary = s.clone())
        .await
        .unwrap();

    assert!(results[0].is_none());
    assert_eq!(results[1].as_ref().unwrap().title, "Still here");
    assert_eq!(summary.fetch_failures, 1);
}

#[tokio::test]
async fn test_many_links_across_groups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Page</h1> with body"))
        .expect(25)
        .mount(&server)
        .await;

    let links: Vec<String> = (0..25)
        .map(|i| format!("{}/page/{}", server.uri(), i))
        .collect();

    let options = OrchestratorOptions {
        group_size: 10,
        max_concurrent_fetches: 4,
        ..Default::default()
    };

    let mut summary = RunSummary::default();
    let results = http_orchestrator(options)
        .run(&links, |s| summary = s.clone())
        .await
        .unwrap();

    assert_eq!(summary.groups_dispatched, 3);
    assert_eq!(summary.accepted, 25);
    for (link, result) in links.iter().zip(&results) {
        assert_eq!(&result.as_ref().unwrap().link, link);
    }
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Identified</h1>"))
        .mount(&server)
        .await;

    let links = vec![format!("{}/ua", server.uri())];
    let results = http_orchestrator(OrchestratorOptions::default())
        .run(&links, |_| {})
        .await
        .unwrap();

    assert_eq!(results[0].as_ref().unwrap().title, "Identified");
}

#[tokio::test]
async fn test_crawl_writes_text_log() {
    let server = MockServer::start().await;
    mount_page(&server, "/logged", 200, "<h1>Logged</h1> content").await;
    mount_page(&server, "/missing", 404, "gone").await;

    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.user_agent = test_user_agent();
    config.output.log_enabled = true;
    config.output.output_dir = dir.path().to_string_lossy().to_string();

    let logged = format!("{}/logged", server.uri());
    let links = vec![logged.clone(), format!("{}/missing", server.uri())];

    let results = crawl(&config, &links, |_| {}).await.unwrap();
    assert!(results[0].is_some());
    assert!(results[1].is_none());

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    let written = std::fs::read_to_string(&files[0]).unwrap();
    assert_eq!(
        written,
        format!(
            "URL: {}\nTitle: Logged\nContent:\n<h1>Logged</h1> content\n{}\n",
            logged,
            "-".repeat(80)
        )
    );
}

#[tokio::test]
async fn test_crawl_refuses_invalid_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Never</h1>"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.user_agent = test_user_agent();
    config.scraper.max_concurrent_fetches = 300;

    let mut completed = false;
    let result = crawl(&config, &[format!("{}/page", server.uri())], |_| completed = true).await;

    assert!(matches!(
        result,
        Err(GleanerError::Config(ConfigError::Validation(_)))
    ));
    assert!(!completed);
}
