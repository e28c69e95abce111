//! Integration tests for harvesting
//!
//! These tests use wiremock to create mock HTTP servers and run the static
//! HTTP backend through crawl, extraction and export end-to-end.

use kb_harvester::config::{Config, RendererBackend};
use kb_harvester::output::KnowledgeBaseExport;
use kb_harvester::pipeline::{Harvester, UrlMode};
use kb_harvester::HarvestError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration using the static HTTP backend
fn create_test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.browser.backend = RendererBackend::Http;
    config.browser.navigation_timeout_secs = 5;
    config.browser.extract_navigation_timeout_secs = 5;
    config.crawler.max_depth = max_depth;
    config
}

async fn mount_html(server: &MockServer, route: &str, status: u16, body: String) {
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

/// Mounts a small blog: an index, two articles, a broken article and an about page
async fn mount_blog(server: &MockServer) {
    mount_html(
        server,
        "/blog",
        200,
        r##"<html><head><title>Blog</title></head><body>
        <nav><a href="/about">About</a></nav>
        <a href="/blog/post-1">First</a>
        <a href="/blog/post-2#comments">Second</a>
        <a href="/blog/broken">Broken</a>
        <a href="https://elsewhere.example/blog/post-9">Elsewhere</a>
        <a href="mailto:team@example.com">Mail</a>
        </body></html>"##
            .to_string(),
    )
    .await;

    mount_html(
        server,
        "/blog/post-1",
        200,
        r#"<html><head>
        <title>First Post | Blog</title>
        <meta name="author" content="Ann Writer">
        </head><body>
        <nav><a href="/blog">Back</a></nav>
        <article>
        <h1>First Post</h1>
        <p>Consistent hashing spreads keys across nodes.</p>
        <pre><code class="language-rust">let ring = Ring::new();</code></pre>
        <ul><li>Low churn</li><li>Even load</li></ul>
        <a href="/blog/post-2">Next</a>
        </article>
        <footer>Copyright</footer>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        server,
        "/blog/post-2",
        200,
        r#"<html><body>
        <h1>Second Post</h1>
        <p>Replication keeps copies in sync.</p>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_html(server, "/blog/broken", 500, "<h1>Oops</h1>".to_string()).await;

    mount_html(
        server,
        "/about",
        200,
        "<html><body><h1>About</h1><p>We write.</p></body></html>".to_string(),
    )
    .await;
}

/// Builds a one-page PDF with document metadata
fn build_pdf(title: &str, author: &str, text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Author" => Object::string_literal(author),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[tokio::test]
async fn test_index_page_harvest_and_export() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server).await;
    let base_url = mock_server.uri();

    let harvester = Harvester::new(create_test_config(2)).expect("Failed to create harvester");

    let items = harvester
        .harvest_url(&format!("{}/blog", base_url), UrlMode::Auto)
        .await
        .expect("Harvest should succeed");

    let titles: Vec<&str> = items.iter().map(|i| i.title()).collect();
    assert_eq!(titles, vec!["First Post", "Second Post"]);

    let first = &items[0];
    assert_eq!(first.author(), "Ann Writer");
    assert_eq!(first.source_url(), format!("{}/blog/post-1", base_url));
    assert!(first.content().starts_with("# First Post\n\n"));
    assert!(first.content().contains("```rust\nlet ring = Ring::new();\n```"));
    assert!(first.content().contains("* Low churn\n* Even load"));
    assert!(!first.content().contains("Copyright"));
    assert!(!first.content().contains("Back"));

    // No author metadata: the site's domain stands in
    assert_eq!(items[1].author(), "127.0.0.1");

    let export = KnowledgeBaseExport::new("team-42", &items);
    let json: serde_json::Value =
        serde_json::from_str(&export.to_json_pretty().unwrap()).expect("Export should be JSON");

    assert_eq!(json["team_id"], "team-42");
    assert_eq!(json["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["items"][0]["content_type"], "blog");
    assert_eq!(json["items"][0]["user_id"], "");
}

#[tokio::test]
async fn test_crawl_report_records_failures() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server).await;
    let base_url = mock_server.uri();

    let harvester = Harvester::new(create_test_config(3)).expect("Failed to create harvester");

    let report = harvester
        .crawl(&format!("{}/blog", base_url), None)
        .await
        .expect("Crawl should run");

    assert_eq!(
        report.found_urls(),
        vec![
            format!("{}/blog/post-1", base_url),
            format!("{}/blog/post-2", base_url),
        ]
    );

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, format!("{}/blog/broken", base_url));
    assert!(report.failed[0].1.contains("HTTP 500"));
    assert!(!report.capped);

    // The index links to post-2 with a fragment and post-1 links to it again
    let post_2_requests = mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/blog/post-2")
        .count();
    assert_eq!(post_2_requests, 1);
}

#[tokio::test]
async fn test_crawl_stays_on_site() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server).await;
    let base_url = mock_server.uri();

    let harvester = Harvester::new(create_test_config(3)).expect("Failed to create harvester");
    let report = harvester
        .crawl(&format!("{}/blog", base_url), None)
        .await
        .expect("Crawl should run");

    for url in &report.found {
        assert_eq!(url.host_str(), Some("127.0.0.1"));
    }
    // about is only linked from the nav, which is still followed
    assert!(report.fetched >= 4);
}

#[tokio::test]
async fn test_page_cap_stops_crawl() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server).await;
    let base_url = mock_server.uri();

    let mut config = create_test_config(3);
    config.crawler.max_pages = 2;
    let harvester = Harvester::new(config).expect("Failed to create harvester");

    let report = harvester
        .crawl(&format!("{}/blog", base_url), None)
        .await
        .expect("Crawl should run");

    assert_eq!(report.fetched, 2);
    assert!(report.capped);
}

#[tokio::test]
async fn test_single_page_harvest() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server).await;
    let base_url = mock_server.uri();

    let harvester = Harvester::new(create_test_config(2)).expect("Failed to create harvester");

    let items = harvester
        .harvest_url(&format!("{}/about", base_url), UrlMode::Auto)
        .await
        .expect("Harvest should succeed");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "About");
    assert_eq!(items[0].content(), "# About\n\nWe write.\n");

    // Exactly one request: no crawl for a non-index URL
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_single_page_without_content_fails() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/empty",
        200,
        "<html><body><div>nothing to read</div></body></html>".to_string(),
    )
    .await;

    let harvester = Harvester::new(create_test_config(2)).expect("Failed to create harvester");

    let result = harvester
        .harvest_url(&format!("{}/empty", mock_server.uri()), UrlMode::Single)
        .await;

    match result {
        Err(HarvestError::Extraction { message, .. }) => {
            assert!(message.contains("Failed to scrape URL"));
        }
        other => panic!("expected an extraction error, got {:?}", other.map(|i| i.len())),
    }
}

#[tokio::test]
async fn test_index_without_articles_is_no_content() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/blog",
        200,
        r#"<html><body><a href="/about">About</a></body></html>"#.to_string(),
    )
    .await;

    let harvester = Harvester::new(create_test_config(2)).expect("Failed to create harvester");

    let result = harvester
        .harvest_url(&format!("{}/blog", mock_server.uri()), UrlMode::Auto)
        .await;

    assert!(matches!(result, Err(HarvestError::NoContent { .. })));
}

#[tokio::test]
async fn test_pdf_download_and_parse() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/book.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(build_pdf("Streaming Systems", "Tyler A", "Streaming Systems"))
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(2)).expect("Failed to create harvester");
    let source = format!("{}/files/book.pdf", mock_server.uri());

    let items = harvester
        .harvest_pdf(&source, None)
        .await
        .expect("PDF harvest should succeed");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "Streaming Systems");
    assert_eq!(items[0].author(), "Tyler A");
    assert_eq!(items[0].source_url(), source);
    assert!(items[0].content().contains("Streaming Systems"));
}

#[tokio::test]
async fn test_pdf_download_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(2)).expect("Failed to create harvester");

    let result = harvester
        .harvest_pdf(&format!("{}/files/missing.pdf", mock_server.uri()), None)
        .await;

    assert!(matches!(result, Err(HarvestError::Http(_))));
}

#[tokio::test]
async fn test_pdf_download_stall_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/slow.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(build_pdf("Slow", "Nobody", "Slow"))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(2);
    config.browser.navigation_timeout_secs = 1;
    let harvester = Harvester::new(config).expect("Failed to create harvester");

    let started = Instant::now();
    let result = harvester
        .harvest_pdf(&format!("{}/files/slow.pdf", mock_server.uri()), None)
        .await;

    assert!(matches!(result, Err(HarvestError::Http(ref e)) if e.is_timeout()));
    assert!(started.elapsed() < Duration::from_secs(5));
}
