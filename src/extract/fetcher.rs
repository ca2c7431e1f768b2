//! HTTP retrieval of detail pages
//!
//! This module handles:
//! - Building HTTP clients from the fetcher configuration
//! - GET requests returning the status and body of a page
//! - Detail-page extraction merged into list rows by index
//!
//! There is no retry logic here. Timeouts come from the client the caller
//! passes in.

use crate::config::FetcherConfig;
use crate::extract::page::{extract_detail_compiled, merge_row};
use crate::extract::query::compile_fields;
use crate::extract::schema::SpiderSpec;
use crate::extract::Row;
use crate::{CrawlkitError, FetchError};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use url::Url;

/// A fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Decoded response body
    pub body: String,
}

/// Builds an HTTP client from the fetcher configuration
///
/// # Example
///
/// ```no_run
/// use crawlkit::config::FetcherConfig;
/// use crawlkit::extract::build_http_client;
///
/// let config = FetcherConfig {
///     user_agent: "MyCrawler/1.0".to_string(),
///     timeout_secs: Some(30),
///     connect_timeout_secs: Some(10),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Sends a GET request and reads the body
///
/// Any HTTP status counts as a response; only transport failures are errors.
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        tracing::warn!("{} answered with HTTP {}", url, status.as_u16());
    }

    let body = response.text().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;

    Ok(FetchedPage {
        url: final_url,
        status: status.as_u16(),
        body,
    })
}

/// Fetches a detail page and merges its fields into `rows[index]`
///
/// The detail fields are extracted from the whole page with the same
/// first-match policy as list fields. Selectors are compiled once, and the
/// index is checked, before any request is sent.
pub async fn fetch_detail(
    client: &Client,
    url: &str,
    spider: &SpiderSpec,
    index: usize,
    rows: &mut [Row],
) -> Result<(), CrawlkitError> {
    let fields = compile_fields(&spider.detail_fields)?;
    if index >= rows.len() {
        return Err(CrawlkitError::RowIndex {
            index,
            len: rows.len(),
        });
    }

    let page = fetch_page(client, url).await?;
    let row = {
        let document = Html::parse_document(&page.body);
        extract_detail_compiled(&document, &fields)
    };

    tracing::debug!("Extracted {} detail fields from {}", row.len(), page.url);
    merge_row(rows, index, row)
}
