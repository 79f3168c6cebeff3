use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use perfprobe_common::{ApiResult, Book, BookPage, ErrorResponse, DEFAULT_PAGE_SIZE};
use rand::Rng;
use serde::Deserialize;
use std::net::SocketAddr;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod catalogue;

/// Port the standalone binary binds to when `--port` is not given.
pub const DEFAULT_PORT: u16 = 8443;

/// Install a `fmt` subscriber; `RUST_LOG` overrides the flag-derived level.
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(verbose: bool) -> bool {
    let default_level = if verbose { "perfprobe_stub=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(verbose).try_init().is_ok()
}

/// Behaviour knobs for the stub target.
#[derive(Debug, Clone)]
pub struct StubConfig {
    pub address: SocketAddr,
    /// Fixed delay added to every request.
    pub latency: Duration,
    /// Upper bound of a uniformly random extra delay, in milliseconds.
    pub jitter_ms: u64,
    /// Answer every N-th request (1-based) with 503.
    pub fail_every: Option<NonZeroU64>,
}

impl StubConfig {
    pub fn new(address: SocketAddr) -> Self {
        Self { address, latency: Duration::ZERO, jitter_ms: 0, fail_every: None }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub books: Arc<Vec<Book>>,
    pub requests: Arc<AtomicU64>,
    pub latency: Duration,
    pub jitter_ms: u64,
    pub fail_every: Option<NonZeroU64>,
}

impl AppState {
    pub fn new(config: &StubConfig) -> Self {
        Self {
            books: Arc::new(catalogue::catalogue()),
            requests: Arc::new(AtomicU64::new(0)),
            latency: config.latency,
            jitter_ms: config.jitter_ms,
            fail_every: config.fail_every,
        }
    }

    /// Total requests seen so far, including injected failures.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Record one request, sleep for the configured delay, and report whether it must fail.
    async fn admit(&self) -> bool {
        let seq = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        let jitter = if self.jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=self.jitter_ms)
        } else {
            0
        };
        let delay = self.latency + Duration::from_millis(jitter);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let fail = self.fail_every.map_or(false, |n| seq % n.get() == 0);
        debug!(seq, delay_ms = delay.as_millis() as u64, fail, "request admitted");
        fail
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

/// Stub catalogue server
pub struct Server {
    config: StubConfig,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: StubConfig) -> Self {
        Self { config }
    }

    /// Get the server's configured address
    pub fn address(&self) -> SocketAddr {
        self.config.address
    }

    /// Create the application router with the given state
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/api/books", get(handle_list_books))
            .route("/api/books/search", get(handle_search_books))
            .with_state(state)
    }

    /// Run the server, signalling `ready_tx` with the bound address once accepting connections
    pub async fn run(self, ready_tx: tokio::sync::oneshot::Sender<SocketAddr>) -> Result<(), Box<dyn std::error::Error>> {
        let state = AppState::new(&self.config);
        self.run_with_state(state, ready_tx).await
    }

    /// Like [`Server::run`], but serves a caller-held state so request counts stay observable.
    pub async fn run_with_state(
        self,
        state: AppState,
        ready_tx: tokio::sync::oneshot::Sender<SocketAddr>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let app = Self::create_router(state);
        let listener = tokio::net::TcpListener::bind(self.config.address).await?;
        let local_addr = listener.local_addr()?;
        ready_tx.send(local_addr).ok();
        axum::serve(listener, app).await?;
        Ok(())
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

fn matches_keyword(book: &Book, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
}

/// Handler for GET /api/books: one page of the (optionally keyword-filtered) catalogue.
pub async fn handle_list_books(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    if state.admit().await {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Injected failure");
    }

    let page = params.page.unwrap_or(1);
    let size = params.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page == 0 || size == 0 {
        return error_response(StatusCode::BAD_REQUEST, "page and size must be at least 1");
    }

    let filtered: Vec<&Book> = match params.keyword.as_deref().filter(|k| !k.is_empty()) {
        Some(keyword) => state.books.iter().filter(|b| matches_keyword(b, keyword)).collect(),
        None => state.books.iter().collect(),
    };
    let total = filtered.len() as u64;
    let books = filtered
        .into_iter()
        .skip(((page - 1) as usize).saturating_mul(size as usize))
        .take(size as usize)
        .cloned()
        .collect();

    Json(ApiResult::ok(BookPage { page, size, total, books })).into_response()
}

/// Handler for GET /api/books/search: every book whose title or author contains `keyword`.
pub async fn handle_search_books(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    if state.admit().await {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Injected failure");
    }

    let Some(keyword) = params.keyword.filter(|k| !k.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "keyword is required");
    };

    let books: Vec<Book> = state.books.iter().filter(|b| matches_keyword(b, &keyword)).cloned().collect();
    Json(ApiResult::ok(books)).into_response()
}
