//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock origin servers and run the full
//! coordinator, extractor client and cache stack end-to-end.

use domain_crawler::config::{load_config, Config, CrawlerConfig};
use domain_crawler::crawler::{Coordinator, CANCELLED_MESSAGE};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"
    <html>
        <head>
            <title>Example Domain</title>
            <meta name="description" content="This is the first meta description." />
            <meta name="description" content="This is the second meta description." />
        </head>
        <body>
            <span>keyword1 keyword1 keyword2</span>
            <a href="http://example.com/link1">Link 1</a>
            <a href="/relative">Link 2</a>
        </body>
    </html>"#;

/// Creates a test configuration with the given concurrency limit
fn create_test_config(limit: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_extractions: limit,
            request_timeout: 5000,
            connect_timeout: 1000,
        },
        ..Config::default()
    }
}

fn keywords() -> Vec<String> {
    vec!["keyword1".to_string(), "keyword2".to_string()]
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_with_partial_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/page1", PAGE).await;
    mount_page(
        &mock_server,
        "/page2",
        "<html><head><title>Second</title></head><body>keyword2</body></html>",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::from_config(&create_test_config(2)).unwrap();
    let urls = vec![
        format!("{}/page1", base_url),
        format!("{}/page2", base_url),
        format!("{}/missing", base_url),
    ];

    let report = coordinator
        .run(urls.clone(), keywords(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(report.successes.len(), 2);
    assert_eq!(report.failures.len(), 1);

    let page1 = report.success_for(&urls[0]).unwrap();
    assert_eq!(page1.title, "Example Domain");
    assert_eq!(
        page1.meta_descriptions,
        vec![
            "This is the first meta description.".to_string(),
            "This is the second meta description.".to_string(),
        ]
    );
    assert_eq!(
        page1.links,
        vec![
            "http://example.com/link1".to_string(),
            "/relative".to_string()
        ]
    );
    assert_eq!(page1.keyword_counts["keyword1"], 2);
    assert_eq!(page1.keyword_counts["keyword2"], 1);

    let page2 = report.success_for(&urls[1]).unwrap();
    assert_eq!(page2.title, "Second");
    assert_eq!(page2.keyword_counts["keyword1"], 0);
    assert_eq!(page2.keyword_counts["keyword2"], 1);

    let missing = report.failure_for(&urls[2]).unwrap();
    assert_eq!(missing.error, "unexpected status code: 404 Not Found");
}

#[tokio::test]
async fn test_unreachable_origin_does_not_affect_others() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/ok", PAGE).await;

    let coordinator = Coordinator::from_config(&create_test_config(2)).unwrap();
    let ok_url = format!("{}/ok", mock_server.uri());
    let dead_url = "http://127.0.0.1:1/".to_string();

    let report = coordinator
        .run(
            vec![ok_url.clone(), dead_url.clone()],
            keywords(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(report.success_for(&ok_url).is_some());
    assert!(report
        .failure_for(&dead_url)
        .unwrap()
        .error
        .starts_with("failed to fetch url:"));
}

#[tokio::test]
async fn test_repeat_crawl_served_from_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::from_config(&create_test_config(1)).unwrap();
    let url = format!("{}/cached", mock_server.uri());

    let first = coordinator
        .run(vec![url.clone()], keywords(), CancellationToken::new())
        .await
        .unwrap();
    let second = coordinator
        .run(vec![url.clone()], keywords(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(first.successes, second.successes);
    // MockServer verifies the single origin request on drop
}

#[tokio::test]
async fn test_failed_fetch_is_retried_on_next_crawl() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/flaky", PAGE).await;

    let coordinator = Coordinator::from_config(&create_test_config(1)).unwrap();
    let url = format!("{}/flaky", mock_server.uri());

    let first = coordinator
        .run(vec![url.clone()], keywords(), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(first.failures.len(), 1);

    let second = coordinator
        .run(vec![url.clone()], keywords(), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(second.successes.len(), 1);
}

#[tokio::test]
async fn test_cancellation_keeps_finished_urls() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/fast", PAGE).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::from_config(&create_test_config(2)).unwrap();
    let fast = format!("{}/fast", mock_server.uri());
    let slow = format!("{}/slow", mock_server.uri());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let report = coordinator
        .run(vec![fast.clone(), slow.clone()], keywords(), cancel)
        .await
        .unwrap();

    assert!(report.success_for(&fast).is_some());
    assert_eq!(report.failure_for(&slow).unwrap().error, CANCELLED_MESSAGE);
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[crawler]
max-concurrent-extractions = 3
request-timeout = 5000
connect-timeout = 1000

[user-agent]
crawler-name = "IntegrationBot"
crawler-version = "2.0"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.user_agent.crawler_name, "IntegrationBot");

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::header(
            "user-agent",
            config.user_agent.header_value().as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::from_config(&config).unwrap();
    let report = coordinator
        .run(vec![mock_server.uri()], keywords(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.successes.len(), 1);
}
