//! Integration tests for the HTTP surface
//!
//! A real listener is bound on an ephemeral port and driven with reqwest.

use domain_crawler::config::Config;
use domain_crawler::crawler::Coordinator;
use domain_crawler::server::serve_on;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><head><title>Served</title></head><body>rust rust <a href="/a">a</a></body></html>"#;

struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<Result<(), domain_crawler::CrawlerError>>,
}

async fn start_server() -> TestServer {
    start_server_with_rate_limit(Config::default().server.rate_limit_rpm).await
}

async fn start_server_with_rate_limit(rate_limit_rpm: u32) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();

    let coordinator = Coordinator::from_config(&Config::default()).unwrap();
    let handle = tokio::spawn(serve_on(
        listener,
        Arc::new(coordinator),
        shutdown.clone(),
        rate_limit_rpm,
    ));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

async fn post_crawl(addr: SocketAddr, body: String) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{}/crawl", addr))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();

    let status = response.status().as_u16();
    let text = response.text().await.unwrap();
    (status, serde_json::from_str(&text).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = start_server().await;

    let response = reqwest::get(format!("http://{}/health", server.addr))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), r#"{"status":"ok"}"#);

    server.shutdown.cancel();
    assert!(server.handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_crawl_endpoint_end_to_end() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&origin)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&origin)
        .await;

    let server = start_server().await;
    let page = format!("{}/page", origin.uri());
    let gone = format!("{}/gone", origin.uri());

    let body = serde_json::json!({
        "urls": [page, gone, page],
        "keywords": ["rust"]
    });
    let (status, value) = post_crawl(server.addr, body.to_string()).await;

    assert_eq!(status, 200);
    assert_eq!(value["results"].as_array().unwrap().len(), 1);
    assert_eq!(value["results"][0]["url"], page.as_str());
    assert_eq!(value["results"][0]["title"], "Served");
    assert_eq!(value["results"][0]["links"], serde_json::json!(["/a"]));
    assert_eq!(value["results"][0]["keyword_counts"]["rust"], 2);
    assert_eq!(value["errors"][0]["url"], gone.as_str());
    assert_eq!(
        value["errors"][0]["error"],
        "unexpected status code: 404 Not Found"
    );

    server.shutdown.cancel();
    assert!(server.handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_invalid_request_rejected() {
    let server = start_server().await;

    let (status, value) = post_crawl(server.addr, r#"{"urls":["not a url"]}"#.to_string()).await;
    assert_eq!(status, 400);
    assert!(value["error"].is_string());

    server.shutdown.cancel();
    assert!(server.handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_rate_limit_applies_per_connection_ip() {
    let server = start_server_with_rate_limit(1).await;

    let (status, _) = post_crawl(server.addr, r#"{"urls":[]}"#.to_string()).await;
    assert_eq!(status, 400);

    let (status, value) = post_crawl(server.addr, r#"{"urls":[]}"#.to_string()).await;
    assert_eq!(status, 429);
    assert_eq!(value["error"], "too many requests");

    server.shutdown.cancel();
    assert!(server.handle.await.unwrap().is_ok());
}
