use perfprobe_common::{
    ApiResult, Book, BookPage, ErrorResponse, ProbeError, Result, DEFAULT_PAGE_SIZE,
    DEFAULT_REQUEST_TIMEOUT,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme, host and port of the target, e.g. `http://127.0.0.1:8443`.
    pub base_url: String,
    /// Upper bound on a single request. The harness imposes no timeout of its own,
    /// so this is what keeps a hung target from stalling a round forever.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}

/// Query parameters for the book listing
#[derive(Debug, Clone, PartialEq)]
pub struct BookQuery {
    pub page: u32,
    pub size: u32,
    pub keyword: Option<String>,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self { page: 1, size: DEFAULT_PAGE_SIZE, keyword: None }
    }
}

/// HTTP client for the catalogue API under test
#[derive(Clone)]
pub struct Client {
    pub config: ClientConfig,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProbeError::NetworkError(e.to_string()))?;
        Ok(Self { config, http_client })
    }

    /// Build the absolute URL for `path` against the configured base.
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET /api/books: one page of the listing, optionally filtered by keyword.
    pub async fn get_books(&self, query: &BookQuery) -> Result<BookPage> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("size", query.size.to_string()),
        ];
        if let Some(keyword) = query.keyword.as_deref().filter(|k| !k.is_empty()) {
            params.push(("keyword", keyword.to_string()));
        }
        self.get_json("/api/books", &params).await
    }

    /// GET /api/books/search: all books matching `keyword`.
    pub async fn search_books(&self, keyword: &str) -> Result<Vec<Book>> {
        self.get_json("/api/books/search", &[("keyword", keyword.to_string())]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = self.build_url(path);
        let request_id = Uuid::new_v4().to_string();
        debug!(%url, %request_id, "sending request");

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .header("X-Request-Id", request_id)
            .send()
            .await
            .map_err(|e| ProbeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error_response(status, response).await);
        }

        let envelope = response
            .json::<ApiResult<T>>()
            .await
            .map_err(|e| ProbeError::InvalidResponse(e.to_string()))?;
        Ok(envelope.result)
    }
}

async fn parse_error_response(status: reqwest::StatusCode, response: reqwest::Response) -> ProbeError {
    let error_msg = response
        .json::<ErrorResponse>()
        .await
        .map(|r| r.error)
        .unwrap_or_else(|_| format!("Server returned status: {}", status));

    ProbeError::HttpError(status.as_u16(), error_msg)
}
