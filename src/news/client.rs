// NewsAPI HTTP client.
// Builds listing URLs, carries the API key, and translates the cached or
// fetched response body into typed listings. Everything upstream-specific
// lives here; the fetch core underneath is shape-agnostic.

use reqwest::Client;
use serde_json::Value;
use url::form_urlencoded;

use crate::cache::KeyValueStore;
use crate::config;
use crate::error::{KioskError, Result};
use crate::fetch::{fetch_with_cache, HttpResponse, StatusSink, Transport};

use super::types::{ApiErrorBody, NewsResponse, SortOrder};

/// Reqwest-backed [`Transport`].
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("kiosk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// NewsAPI client over an injectable transport.
pub struct NewsClient<T> {
    transport: T,
    api_key: String,
}

impl<T: Transport> NewsClient<T> {
    pub fn new(transport: T, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
        }
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = key.into();
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// URL for top headlines in a country, optionally narrowed to a
    /// category ("all" means no category filter).
    pub fn headlines_url(country: &str, category: &str, page_size: u32) -> String {
        let page_size = page_size.to_string();
        let mut params = vec![("country", country), ("pageSize", page_size.as_str())];
        if category != config::DEFAULT_CATEGORY {
            params.push(("category", category));
        }
        format!(
            "{}/top-headlines?{}",
            config::API_BASE_URL,
            encode_query(&params)
        )
    }

    /// URL for a free-text search across all articles.
    pub fn search_url(query: &str, sort: SortOrder, page_size: u32) -> String {
        let page_size = page_size.to_string();
        let params = [
            ("q", query),
            ("sortBy", sort.as_param()),
            ("pageSize", page_size.as_str()),
        ];
        format!(
            "{}/everything?{}",
            config::API_BASE_URL,
            encode_query(&params)
        )
    }

    /// Fetch top headlines for a country/category.
    pub async fn top_headlines(
        &self,
        store: &mut impl KeyValueStore,
        sink: &mut dyn StatusSink,
        country: &str,
        category: &str,
    ) -> Result<NewsResponse> {
        let url = Self::headlines_url(country, category, config::DEFAULT_PAGE_SIZE);
        self.fetch_listing(store, sink, &url).await
    }

    /// Search all articles matching a query.
    pub async fn search(
        &self,
        store: &mut impl KeyValueStore,
        sink: &mut dyn StatusSink,
        query: &str,
        sort: SortOrder,
    ) -> Result<NewsResponse> {
        let url = Self::search_url(query, sort, config::DEFAULT_PAGE_SIZE);
        self.fetch_listing(store, sink, &url).await
    }

    async fn fetch_listing(
        &self,
        store: &mut impl KeyValueStore,
        sink: &mut dyn StatusSink,
        url: &str,
    ) -> Result<NewsResponse> {
        if self.api_key.is_empty() {
            return Err(KioskError::MissingKey);
        }
        // The key travels in a header so it never appears in a cache key.
        let headers = [("X-Api-Key", self.api_key.as_str())];
        let content = fetch_with_cache(&self.transport, store, url, &headers, sink, check_body)
            .await
            .map_err(refine_error)?;
        let listing: NewsResponse = serde_json::from_value(content)?;
        Ok(listing)
    }
}

fn encode_query(params: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// Detect the application-level error NewsAPI embeds in a 2xx body.
fn check_body(content: &Value) -> std::result::Result<(), String> {
    match serde_json::from_value::<ApiErrorBody>(content.clone()) {
        Ok(body) if body.status == "error" => Err(body
            .message
            .or(body.code)
            .unwrap_or_else(|| "upstream reported an error".to_string())),
        _ => Ok(()),
    }
}

/// Map upstream failures onto the user-facing error kinds.
fn refine_error(err: KioskError) -> KioskError {
    match err {
        KioskError::Upstream { status: 401, .. } => KioskError::InvalidKey,
        KioskError::Upstream { status: 429, .. } => KioskError::RateLimited,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::fetch::NullSink;
    use serde_json::json;
    use std::cell::Cell;

    struct CannedTransport {
        status: u16,
        body: String,
        calls: Cell<usize>,
    }

    impl Transport for CannedTransport {
        async fn get(&self, _url: &str, _headers: &[(&str, &str)]) -> Result<HttpResponse> {
            self.calls.set(self.calls.get() + 1);
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn client_with(status: u16, body: &str) -> NewsClient<CannedTransport> {
        NewsClient::new(
            CannedTransport {
                status,
                body: body.to_string(),
                calls: Cell::new(0),
            },
            "test-key",
        )
    }

    #[test]
    fn headlines_url_omits_the_all_pseudo_category() {
        let url = NewsClient::<HttpTransport>::headlines_url("us", "all", 50);
        assert_eq!(
            url,
            "https://newsapi.org/v2/top-headlines?country=us&pageSize=50"
        );

        let url = NewsClient::<HttpTransport>::headlines_url("gb", "science", 20);
        assert_eq!(
            url,
            "https://newsapi.org/v2/top-headlines?country=gb&pageSize=20&category=science"
        );
    }

    #[test]
    fn search_url_encodes_the_query() {
        let url = NewsClient::<HttpTransport>::search_url("rust lang", SortOrder::Popularity, 50);
        assert_eq!(
            url,
            "https://newsapi.org/v2/everything?q=rust+lang&sortBy=popularity&pageSize=50"
        );
    }

    #[test]
    fn check_body_flags_error_status_only() {
        assert!(check_body(&json!({"status": "ok", "articles": []})).is_ok());
        assert_eq!(
            check_body(&json!({"status": "error", "code": "apiKeyInvalid", "message": "bad"})),
            Err("bad".to_string())
        );
        assert_eq!(
            check_body(&json!({"status": "error", "code": "apiKeyInvalid"})),
            Err("apiKeyInvalid".to_string())
        );
        // Bodies without a status field are left alone.
        assert!(check_body(&json!([1, 2, 3])).is_ok());
    }

    #[test]
    fn refine_error_maps_auth_and_rate_limit_statuses() {
        let err = refine_error(KioskError::Upstream {
            status: 401,
            message: String::new(),
        });
        assert!(matches!(err, KioskError::InvalidKey));

        let err = refine_error(KioskError::Upstream {
            status: 429,
            message: String::new(),
        });
        assert!(matches!(err, KioskError::RateLimited));

        let err = refine_error(KioskError::Upstream {
            status: 500,
            message: "x".to_string(),
        });
        assert!(matches!(err, KioskError::Upstream { status: 500, .. }));
    }

    #[tokio::test]
    async fn top_headlines_parses_a_listing() {
        let body = json!({
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": {"id": null, "name": "Example"},
                "author": "a",
                "title": "t",
                "description": "d",
                "url": "https://example.com/t",
                "urlToImage": null,
                "publishedAt": "2026-08-01T12:00:00Z",
                "content": null
            }]
        });
        let client = client_with(200, &body.to_string());
        let mut store = MemoryStore::new();

        let listing = client
            .top_headlines(&mut store, &mut NullSink, "us", "all")
            .await
            .unwrap();
        assert_eq!(listing.total_results, 1);
        assert_eq!(listing.articles[0].title, "t");

        // The listing was cached under its request URL.
        let cached = crate::cache::store::get(
            &mut store,
            &NewsClient::<HttpTransport>::headlines_url("us", "all", 50),
        )
        .unwrap();
        assert!(cached.is_some());
    }

    #[tokio::test]
    async fn missing_key_short_circuits_before_any_io() {
        let client = NewsClient::new(
            CannedTransport {
                status: 200,
                body: "{}".to_string(),
                calls: Cell::new(0),
            },
            "",
        );
        let mut store = MemoryStore::new();

        let err = client
            .top_headlines(&mut store, &mut NullSink, "us", "all")
            .await
            .unwrap_err();
        assert!(matches!(err, KioskError::MissingKey));
        assert_eq!(client.transport.calls.get(), 0);
    }

    #[tokio::test]
    async fn embedded_api_error_refines_to_invalid_key_only_via_status() {
        let client = client_with(
            200,
            r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid"}"#,
        );
        let mut store = MemoryStore::new();

        let err = client
            .search(&mut store, &mut NullSink, "rust", SortOrder::PublishedAt)
            .await
            .unwrap_err();
        // A 2xx body error stays an Upstream error; only HTTP 401 refines.
        match err {
            KioskError::Upstream { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "Your API key is invalid");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
