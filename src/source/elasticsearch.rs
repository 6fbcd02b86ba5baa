//! Elasticsearch scroll client
//!
//! This module implements [`RemoteSource`] over the Elasticsearch HTTP API:
//! - The first page is a `_search` on the configured index with `scroll` set
//! - Later pages continue through `_search/scroll` with the last `_scroll_id`
//! - The scroll is cleared with `DELETE _search/scroll` at the end of the session

use crate::config::SourceConfig;
use crate::source::{Cursor, RawPage, RemoteSource, SourceError, SourceResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;

/// Builds the HTTP client used to talk to Elasticsearch
///
/// # Arguments
///
/// * `timeout` - Default timeout applied to every request
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Scroll-based access to one Elasticsearch index
#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base_url: String,
    index: String,
    doc_type: String,
    scroll_expiry: String,
}

impl ElasticsearchClient {
    /// Creates a client from the source section of the configuration
    pub fn new(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(Duration::from_secs(config.request_timeout))?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a client reusing an existing HTTP client
    pub fn with_client(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            doc_type: config.doc_type.clone(),
            scroll_expiry: config.scroll_expiry.clone(),
        }
    }

    /// URL of the initial search request
    pub fn search_url(&self) -> String {
        if self.doc_type.is_empty() {
            format!("{}/{}/_search", self.base_url, self.index)
        } else {
            format!("{}/{}/{}/_search", self.base_url, self.index, self.doc_type)
        }
    }

    fn scroll_url(&self) -> String {
        format!("{}/_search/scroll", self.base_url)
    }

    /// Sends a request and returns the JSON body of a successful response
    async fn send(&self, request: RequestBuilder) -> SourceResult<Value> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| SourceError::Parse(format!("response is not valid JSON: {}", e)))
    }
}

#[async_trait]
impl RemoteSource for ElasticsearchClient {
    async fn fetch_first_page(&self, page_size: u32, timeout: Duration) -> SourceResult<RawPage> {
        tracing::debug!("Starting scroll on {}", self.search_url());

        let size = page_size.to_string();
        let server_timeout = format!("{}s", timeout.as_secs());
        let request = self
            .client
            .post(self.search_url())
            .query(&[
                ("scroll", self.scroll_expiry.as_str()),
                ("size", size.as_str()),
                ("timeout", server_timeout.as_str()),
            ])
            .timeout(timeout)
            .json(&json!({}));

        parse_page(self.send(request).await?)
    }

    async fn fetch_next_page(
        &self,
        cursor: &Cursor,
        _page_size: u32,
        timeout: Duration,
    ) -> SourceResult<RawPage> {
        // The page size is fixed by the initial search for the life of the scroll
        let request = self
            .client
            .post(self.scroll_url())
            .timeout(timeout)
            .json(&json!({
                "scroll": self.scroll_expiry,
                "scroll_id": cursor.as_str(),
            }));

        parse_page(self.send(request).await?)
    }

    async fn release_cursor(&self, cursor: &Cursor) -> SourceResult<()> {
        let request = self
            .client
            .delete(self.scroll_url())
            .json(&json!({ "scroll_id": cursor.as_str() }));

        self.send(request).await.map(|_| ())
    }
}

/// Splits a search response into its scroll id and hits
fn parse_page(mut body: Value) -> SourceResult<RawPage> {
    let cursor = body
        .get("_scroll_id")
        .and_then(Value::as_str)
        .map(Cursor::new);

    let records = match body.pointer_mut("/hits/hits").map(Value::take) {
        Some(Value::Array(hits)) => hits,
        Some(other) => {
            return Err(SourceError::Parse(format!(
                "hits.hits is not an array: {}",
                other
            )))
        }
        None => {
            return Err(SourceError::Parse(
                "response has no hits.hits field".to_string(),
            ))
        }
    };

    Ok(RawPage { cursor, records })
}
