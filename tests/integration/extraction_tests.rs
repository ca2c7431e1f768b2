//! Integration tests for list and detail extraction
//!
//! These tests use wiremock to serve listing and detail pages and run the
//! expand, list, detail and merge steps end-to-end.

use crawlkit::config::FetcherConfig;
use crawlkit::extract::{build_http_client, fetch_page, FieldSpec, SelectorType, SpiderSpec};
use crawlkit::{expand_urls, extract_list, fetch_detail, CrawlkitError, FetchError, Row};
use scraper::Html;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_spider() -> SpiderSpec {
    SpiderSpec {
        item_selector_type: SelectorType::Path,
        item_selector: "//ul[@id='items']/li".to_string(),
        fields: vec![
            FieldSpec::text("title", SelectorType::Css, "a"),
            FieldSpec::attribute("link", SelectorType::Css, "a", "href"),
        ],
        detail_fields: vec![
            FieldSpec::text("title", SelectorType::Css, "h1"),
            FieldSpec::text("body", SelectorType::Path, "//div[@class='content']"),
        ],
    }
}

fn create_test_client() -> reqwest::Client {
    build_http_client(&FetcherConfig {
        user_agent: "TestCrawler/1.0".to_string(),
        timeout_secs: Some(5),
        connect_timeout_secs: Some(2),
    })
    .expect("Failed to build client")
}

fn list_page(page: u32) -> String {
    format!(
        r#"<html><body><ul id="items">
            <li><a href="/detail/{page}-a">Item {page}a</a></li>
            <li><a href="/detail/{page}-b">Item {page}b</a></li>
        </ul></body></html>"#
    )
}

fn detail_page(title: &str, body: &str) -> String {
    format!(
        r#"<html><body><h1>{title}</h1><div class="content">{body}</div></body></html>"#
    )
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

#[tokio::test]
async fn test_expand_list_and_detail_flow() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for page in 1..=2 {
        mount_html(&mock_server, &format!("/list/{}", page), 200, list_page(page)).await;
        for suffix in ["a", "b"] {
            mount_html(
                &mock_server,
                &format!("/detail/{}-{}", page, suffix),
                200,
                detail_page(
                    &format!("Full {}{}", page, suffix),
                    &format!("Body {}{}", page, suffix),
                ),
            )
            .await;
        }
    }

    let client = create_test_client();
    let spider = create_test_spider();

    let list_urls: Vec<String> = expand_urls(&format!("{}/list/{{1,2}}", base_url))
        .expect("Valid pattern")
        .collect();
    assert_eq!(list_urls.len(), 2);

    let mut rows: Vec<Row> = Vec::new();
    for url in &list_urls {
        let page = fetch_page(&client, url).await.expect("List page fetched");
        assert_eq!(page.status, 200);
        let document = Html::parse_document(&page.body);
        rows.extend(extract_list(&document, &spider).expect("Valid selectors"));
    }
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["title"], "Item 1a");
    assert_eq!(rows[3]["link"], "/detail/2-b");

    let links: Vec<String> = rows.iter().map(|row| row["link"].clone()).collect();
    for (index, link) in links.iter().enumerate() {
        let url = format!("{}{}", base_url, link);
        fetch_detail(&client, &url, &spider, index, &mut rows)
            .await
            .expect("Detail merged");
    }

    // Detail values overwrite list values of the same name
    assert_eq!(rows[0]["title"], "Full 1a");
    assert_eq!(rows[0]["body"], "Body 1a");
    assert_eq!(rows[0]["link"], "/detail/1-a");
    assert_eq!(rows[3]["title"], "Full 2b");
}

#[tokio::test]
async fn test_detail_error_status_is_still_parsed() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/gone",
        404,
        detail_page("Not found", "Nothing here"),
    )
    .await;

    let client = create_test_client();
    let spider = create_test_spider();
    let mut rows = vec![Row::new()];

    fetch_detail(
        &client,
        &format!("{}/gone", mock_server.uri()),
        &spider,
        0,
        &mut rows,
    )
    .await
    .expect("Non-2xx pages are still extracted");

    assert_eq!(rows[0]["title"], "Not found");
    assert_eq!(rows[0]["body"], "Nothing here");
}

#[tokio::test]
async fn test_detail_missing_fields_leave_row_untouched() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/empty", 200, "<html><body></body></html>".to_string()).await;

    let client = create_test_client();
    let spider = create_test_spider();
    let mut rows = vec![Row::from([("title".to_string(), "Kept".to_string())])];

    fetch_detail(
        &client,
        &format!("{}/empty", mock_server.uri()),
        &spider,
        0,
        &mut rows,
    )
    .await
    .expect("Empty detail page");

    assert_eq!(rows[0].len(), 1);
    assert_eq!(rows[0]["title"], "Kept");
}

#[tokio::test]
async fn test_detail_connection_failure_is_fetch_error() {
    let client = create_test_client();
    let spider = create_test_spider();
    let mut rows = vec![Row::new()];

    // Nothing listens on port 1
    let result = fetch_detail(&client, "http://127.0.0.1:1/", &spider, 0, &mut rows).await;

    assert!(matches!(
        result,
        Err(CrawlkitError::Fetch(FetchError::Http { .. }))
    ));
    assert!(rows[0].is_empty());
}

#[tokio::test]
async fn test_detail_bad_selector_fails_before_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client();
    let mut spider = create_test_spider();
    spider
        .detail_fields
        .push(FieldSpec::text("broken", SelectorType::Path, "//div[@id="));
    let mut rows = vec![Row::new()];

    let result = fetch_detail(&client, &mock_server.uri(), &spider, 0, &mut rows).await;
    assert!(matches!(result, Err(CrawlkitError::Selector(_))));
}
