//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end with the HTTP renderer.

use link_patrol::config::{Config, CrawlerConfig, UserAgentConfig};
use link_patrol::crawler::{
    build_http_client, run_crawl, Coordinator, HttpRenderer, Renderer, TransportFailure, WaitCondition,
};
use link_patrol::output::{ErrorLogFile, ErrorReason, ErrorRecorder};
use link_patrol::state::PageState;
use std::net::TcpListener;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An HTML response with the given body
fn html(status: u16, body: String) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body, "text/html")
}

/// Mounts a GET handler that must be hit exactly once
async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Creates a test configuration writing errors into `dir`
fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.page_timeout = 2_000;
    config.crawler.connect_timeout = 1_000;
    config.output.error_log_path = dir.path().join("error_log.txt").display().to_string();
    config
}

fn read_log(config: &Config) -> String {
    std::fs::read_to_string(Path::new(&config.output.error_log_path)).unwrap_or_default()
}

/// A renderer with the default client settings following up to `max_redirects` hops
fn renderer_with_redirect_limit(max_redirects: usize) -> HttpRenderer {
    let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default())
        .expect("Failed to build client");
    HttpRenderer::with_client(client, max_redirects)
}

fn test_renderer() -> HttpRenderer {
    renderer_with_redirect_limit(10)
}

/// A localhost port with nothing listening on it
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local addr").port();
    drop(listener);
    port
}

#[tokio::test]
async fn test_full_crawl_visits_reachable_pages_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // A -> B, A -> C, B -> C
    mount_page(
        &mock_server,
        "/",
        html(
            200,
            format!(
                r#"<html><body>
                <a href="{base}/b">B</a>
                <a href="/c">C</a>
                </body></html>"#,
                base = base_url
            ),
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        html(200, r#"<a href="/c">C again</a><a href="/">home</a>"#.to_string()),
    )
    .await;
    mount_page(&mock_server, "/c", html(200, "<p>leaf</p>".to_string())).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let outcome = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.state.visited.len(), 3);
    assert!(outcome.was_visited(&format!("{}/", base_url)));
    assert!(outcome.was_visited(&format!("{}/b", base_url)));
    assert!(outcome.was_visited(&format!("{}/c", base_url)));
    assert!(outcome.errors().is_empty());
    assert_eq!(outcome.state.count_in_state(PageState::Succeeded), 3);

    // No errors means the log file is never created
    assert!(!Path::new(&config.output.error_log_path).exists());
}

#[tokio::test]
async fn test_dead_link_attributed_to_source() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(200, r#"<a href="/s">S</a>"#.to_string()),
    )
    .await;
    mount_page(
        &mock_server,
        "/s",
        html(200, r#"<a href="/missing">D</a>"#.to_string()),
    )
    .await;
    mount_page(
        &mock_server,
        "/missing",
        html(404, r#"<a href="/never">never followed</a>"#.to_string()),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let outcome = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.errors().len(), 1);
    let record = &outcome.errors()[0];
    assert_eq!(record.source, format!("{}/s", base_url));
    assert_eq!(record.destination, format!("{}/missing", base_url));
    assert_eq!(record.reason, ErrorReason::HttpStatus(404));
    assert!(!outcome.was_visited(&format!("{}/never", base_url)));

    assert_eq!(
        read_log(&config),
        format!(
            "Source: {base}/s\nDestination: {base}/missing\nError Code: 404\n-------------------\n",
            base = base_url
        )
    );
}

#[tokio::test]
async fn test_server_error_on_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html(503, "down".to_string())).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let outcome = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(outcome.errors()[0].source, "Initial Page");
    assert_eq!(outcome.errors()[0].reason, ErrorReason::HttpStatus(503));
}

#[tokio::test]
async fn test_off_origin_links_not_requested() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Same IP, so use a hostname alias to make the other server off-origin
    let other_port = Url::parse(&other_server.uri()).unwrap().port().unwrap();

    mount_page(
        &mock_server,
        "/",
        html(
            200,
            format!(
                r#"<a href="http://localhost:{port}/">other host</a>
                   <a href="mailto:someone@example.com">mail</a>"#,
                port = other_port
            ),
        ),
    )
    .await;

    Mock::given(method("GET"))
        .respond_with(html(200, "<p>should not be fetched</p>".to_string()))
        .expect(0)
        .mount(&other_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let outcome = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.state.visited.len(), 1);
    assert!(outcome.errors().is_empty());
}

#[tokio::test]
async fn test_connection_refused_recorded_as_connection_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Same host, different port: admissible, but nothing listens there
    let dead = format!("http://127.0.0.1:{}/gone", closed_port());

    mount_page(
        &mock_server,
        "/",
        html(200, format!(r#"<a href="{}">dead</a>"#, dead)),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let outcome = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.errors().len(), 1);
    let record = &outcome.errors()[0];
    assert_eq!(record.source, format!("{}/", base_url));
    assert_eq!(record.destination, dead);
    assert!(matches!(
        record.reason,
        ErrorReason::Transport(TransportFailure::Connect(_))
    ));
    assert_eq!(outcome.state.page_state(&dead), PageState::TransportError);

    assert!(read_log(&config).contains("Error Code: Connection Error\n"));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(200, r#"<a href="/slow">slow</a>"#.to_string()),
    )
    .await;
    mount_page(
        &mock_server,
        "/slow",
        html(200, "late".to_string()).set_delay(Duration::from_secs(3)),
    )
    .await;

    let renderer = test_renderer();
    let coordinator = Coordinator::new(
        renderer,
        WaitCondition::new(Duration::from_millis(300)),
        ErrorRecorder::in_memory(),
    );

    let outcome = coordinator
        .crawl(&format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(
        outcome.errors()[0].reason,
        ErrorReason::Transport(TransportFailure::Timeout)
    );
    assert_eq!(outcome.errors()[0].reason.to_string(), "Connection Error");
}

#[tokio::test]
async fn test_redirect_target_error_not_attributed_to_destination() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(200, r#"<a href="/old">old</a>"#.to_string()),
    )
    .await;
    mount_page(
        &mock_server,
        "/old",
        ResponseTemplate::new(301).insert_header("Location", "/new"),
    )
    .await;
    mount_page(&mock_server, "/new", html(404, "gone".to_string())).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let outcome = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert!(outcome.errors().is_empty());
    assert!(outcome.was_visited(&format!("{}/old", base_url)));
}

#[tokio::test]
async fn test_redirect_loop_is_transport_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/ping",
        ResponseTemplate::new(302).insert_header("Location", "/pong"),
    )
    .await;
    mount_page(
        &mock_server,
        "/pong",
        ResponseTemplate::new(302).insert_header("Location", "/ping"),
    )
    .await;

    let renderer = test_renderer();
    let url = Url::parse(&format!("{}/ping", base_url)).unwrap();

    let result = renderer.load(&url, &WaitCondition::default()).await;

    assert!(matches!(result, Err(TransportFailure::Protocol(_))));
}

#[tokio::test]
async fn test_renderer_reports_every_hop() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/start",
        ResponseTemplate::new(302).insert_header("Location", "/end"),
    )
    .await;
    mount_page(
        &mock_server,
        "/end",
        html(200, r#"<a href="next">next</a>"#.to_string()),
    )
    .await;

    let renderer = test_renderer();
    let url = Url::parse(&format!("{}/start", base_url)).unwrap();

    let page = renderer
        .load(&url, &WaitCondition::default())
        .await
        .expect("Load failed");

    let statuses: Vec<u16> = page.responses().iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![302, 200]);
    assert_eq!(page.final_url().as_str(), format!("{}/end", base_url));
    assert_eq!(page.destination_error(), None);

    // Relative links resolve against the final document
    assert_eq!(
        renderer.extract_links(&page),
        vec![format!("{}/next", base_url)]
    );
    assert!(!renderer.session().is_busy());
}

#[tokio::test]
async fn test_non_html_body_yields_no_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(200, r#"<a href="/doc.pdf">pdf</a>"#.to_string()),
    )
    .await;
    mount_page(
        &mock_server,
        "/doc.pdf",
        ResponseTemplate::new(200).set_body_raw(r#"<a href="/hidden">x</a>"#, "application/pdf"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let outcome = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.state.visited.len(), 2);
    assert!(!outcome.was_visited(&format!("{}/hidden", base_url)));
}

#[tokio::test]
async fn test_rerun_appends_identical_log_copy() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            200,
            r#"<a href="/a">a</a><a href="/b">b</a>"#.to_string(),
        ))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(500, "oops".to_string()))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(410, "gone".to_string()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let seed = format!("{}/", base_url);

    let first = run_crawl(&config, &seed).await.expect("Crawl failed");
    assert_eq!(first.errors().len(), 2);
    let single_run_log = read_log(&config);

    let second = run_crawl(&config, &seed).await.expect("Crawl failed");
    assert_eq!(second.errors(), first.errors());

    assert_eq!(
        read_log(&config),
        format!("{}{}", single_run_log, single_run_log)
    );
    assert!(single_run_log.starts_with(&format!(
        "Source: {base}/\nDestination: {base}/a\nError Code: 500\n",
        base = base_url
    )));
}

#[tokio::test]
async fn test_unwritable_log_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(200, r#"<a href="/x">x</a><a href="/y">y</a>"#.to_string()),
    )
    .await;
    mount_page(&mock_server, "/x", html(404, String::new())).await;
    mount_page(&mock_server, "/y", html(200, String::new())).await;

    let dir = TempDir::new().unwrap();
    let recorder = ErrorRecorder::new(ErrorLogFile::new(
        dir.path().join("missing-dir").join("errors.txt"),
    ));
    let renderer = test_renderer();

    let outcome = Coordinator::new(renderer, WaitCondition::default(), recorder)
        .crawl(&format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.state.visited.len(), 3);
    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(outcome.state.errors.sink_failures(), 1);
}

#[tokio::test]
async fn test_redirect_chain_within_limit_is_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/r1",
        ResponseTemplate::new(301).insert_header("Location", "/r2"),
    )
    .await;
    mount_page(
        &mock_server,
        "/r2",
        ResponseTemplate::new(301).insert_header("Location", "/end"),
    )
    .await;
    mount_page(&mock_server, "/end", html(200, "<p>done</p>".to_string())).await;

    let renderer = renderer_with_redirect_limit(2);
    let url = Url::parse(&format!("{}/r1", base_url)).unwrap();

    let page = renderer
        .load(&url, &WaitCondition::default())
        .await
        .expect("Two redirects are within the limit");

    assert_eq!(page.responses().len(), 3);
    assert_eq!(page.final_url().path(), "/end");
}

#[tokio::test]
async fn test_redirect_chain_over_limit_is_transport_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Three distinct hops; the third exceeds a limit of two
    for (from, to) in [("/r1", "/r2"), ("/r2", "/r3"), ("/r3", "/r4")] {
        mount_page(
            &mock_server,
            from,
            ResponseTemplate::new(302).insert_header("Location", to),
        )
        .await;
    }
    Mock::given(method("GET"))
        .and(path("/r4"))
        .respond_with(html(200, "<p>unreachable</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let renderer = renderer_with_redirect_limit(2);
    let url = Url::parse(&format!("{}/r1", base_url)).unwrap();

    let result = renderer.load(&url, &WaitCondition::default()).await;

    assert!(matches!(result, Err(TransportFailure::Protocol(_))));
    let received = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 3);
}

/// Serves one truncated error response: the headers promise more body than is sent
async fn serve_truncated_error(status_line: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local addr");

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: text/html\r\nContent-Length: 1000\r\n\r\nshort",
                status_line
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status() {
    let seed = serve_truncated_error("HTTP/1.1 404 Not Found").await;

    let outcome = Coordinator::new(
        test_renderer(),
        WaitCondition::new(Duration::from_secs(2)),
        ErrorRecorder::in_memory(),
    )
    .crawl(&seed)
    .await
    .expect("Crawl failed");

    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(outcome.errors()[0].source, "Initial Page");
    assert_eq!(outcome.errors()[0].reason, ErrorReason::HttpStatus(404));
    assert_eq!(outcome.state.page_state(&seed), PageState::HttpStatusError);
}
