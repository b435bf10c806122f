//! HTTP access for the resolvers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use ogc_common::{ConnectorError, ConnectorResult};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ConnectorConfig;

/// Source of remote documents.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET `url` and return the body of a successful response.
    ///
    /// Transport failures and non-success statuses are `Network` errors.
    async fn get_text(&self, url: &Url) -> ConnectorResult<String>;
}

/// Fetcher backed by a shared `reqwest` client.
///
/// Timeouts come from the client configuration; requests are never retried.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(config: &ConnectorConfig) -> ConnectorResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| ConnectorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    #[instrument(skip(self), fields(url = %url))]
    async fn get_text(&self, url: &Url) -> ConnectorResult<String> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ConnectorError::Network(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Network(format!(
                "GET {} returned HTTP {}",
                url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ConnectorError::Network(format!("Failed to read body of {}: {}", url, e)))
    }
}

/// In-memory fetcher serving canned documents by URL.
///
/// Unknown URLs fail like an HTTP 404. Every request is recorded.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    documents: HashMap<String, String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(url, body)` pairs.
    pub fn from_routes<I, U, B>(routes: I) -> Self
    where
        I: IntoIterator<Item = (U, B)>,
        U: AsRef<str>,
        B: Into<String>,
    {
        let mut fetcher = Self::new();
        for (url, body) in routes {
            fetcher.insert(url.as_ref(), body);
        }
        fetcher
    }

    /// Serve `body` at `url`.
    pub fn with(mut self, url: &str, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    pub fn insert(&mut self, url: &str, body: impl Into<String>) {
        self.documents.insert(normalize_key(url), body.into());
    }

    /// URLs requested so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

fn normalize_key(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[async_trait]
impl HttpFetcher for StaticFetcher {
    async fn get_text(&self, url: &Url) -> ConnectorResult<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.documents
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ConnectorError::Network(format!("GET {} returned HTTP 404 Not Found", url)))
    }
}

/// Fetch `url` and decode it as JSON, recording fetch metrics under `kind`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn HttpFetcher,
    url: &Url,
    kind: &'static str,
) -> ConnectorResult<T> {
    let start = Instant::now();
    counter!("ogcapi_fetch_total", "kind" => kind).increment(1);

    let result = fetcher
        .get_text(url)
        .await
        .and_then(|body| serde_json::from_str::<T>(&body).map_err(ConnectorError::from));

    histogram!("ogcapi_fetch_duration_ms", "kind" => kind)
        .record(start.elapsed().as_secs_f64() * 1000.0);

    match &result {
        Ok(_) => debug!(url = %url, kind = kind, "Fetched document"),
        Err(e) => {
            counter!("ogcapi_fetch_errors_total", "kind" => kind, "error" => e.kind()).increment(1);
            warn!(url = %url, kind = kind, error = %e, "Fetch failed");
        }
    }
    result
}

/// Parse an absolute URL, reporting failures as `Parse` errors.
pub(crate) fn parse_url(url: &str) -> ConnectorResult<Url> {
    Url::parse(url.trim()).map_err(|e| ConnectorError::Parse(format!("Invalid URL '{}': {}", url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_static_fetcher_serves_documents() {
        let fetcher = StaticFetcher::new().with("https://example.com/ogcapi", r#"{"links": []}"#);
        let url = parse_url("https://example.com/ogcapi").unwrap();
        let body = fetcher.get_text(&url).await.unwrap();
        assert_eq!(body, r#"{"links": []}"#);
        assert_eq!(fetcher.requested(), vec!["https://example.com/ogcapi".to_string()]);
    }

    #[tokio::test]
    async fn test_static_fetcher_missing_is_network_error() {
        let fetcher = StaticFetcher::new();
        let url = parse_url("https://example.com/missing").unwrap();
        let err = fetcher.get_text(&url).await.unwrap_err();
        assert!(matches!(err, ConnectorError::Network(_)));
    }

    #[tokio::test]
    async fn test_fetch_json_malformed_is_parse_error() {
        let fetcher = StaticFetcher::new().with("https://example.com/broken", "{not json");
        let url = parse_url("https://example.com/broken").unwrap();
        let err = fetch_json::<Value>(&fetcher, &url, "test").await.unwrap_err();
        assert!(matches!(err, ConnectorError::Parse(_)));
    }

    #[test]
    fn test_host_only_keys_are_normalized() {
        let fetcher = StaticFetcher::new().with("https://example.com", "{}");
        let url = parse_url("https://example.com/").unwrap();
        let body = tokio_test::block_on(fetcher.get_text(&url)).unwrap();
        assert_eq!(body, "{}");
    }

    #[test]
    fn test_parse_url_rejects_relative() {
        assert!(matches!(parse_url("collections"), Err(ConnectorError::Parse(_))));
    }
}
