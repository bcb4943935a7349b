#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use plugin_gallery::{GalleryConfig, RenderMode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned reply for one search page.
#[derive(Clone)]
pub enum PageReply {
    Items(Vec<Value>),
    Status(u16, String),
    RateLimited,
    Malformed,
}

/// Canned reply for one raw-content path.
#[derive(Clone)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl RawReply {
    pub fn ok(body: &str) -> Self {
        RawReply {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }
}

#[derive(Default)]
struct MockState {
    pages: HashMap<u32, PageReply>,
    raw: HashMap<String, RawReply>,
    search_hits: AtomicUsize,
    raw_hits: AtomicUsize,
    queries: Mutex<Vec<HashMap<String, String>>>,
}

/// Local stand-in for the search API and the raw-content host.
pub struct MockGitHub {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockGitHub {
    pub fn builder() -> MockGitHubBuilder {
        MockGitHubBuilder::default()
    }

    pub fn config(&self, mode: RenderMode) -> GalleryConfig {
        GalleryConfig {
            api_base_url: format!("http://{}", self.addr),
            raw_base_url: format!("http://{}/raw", self.addr),
            mode,
            ..Default::default()
        }
    }

    pub fn search_hits(&self) -> usize {
        self.state.search_hits.load(Ordering::SeqCst)
    }

    pub fn raw_hits(&self) -> usize {
        self.state.raw_hits.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.state.queries.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct MockGitHubBuilder {
    pages: HashMap<u32, PageReply>,
    raw: HashMap<String, RawReply>,
}

impl MockGitHubBuilder {
    pub fn page(mut self, page: u32, reply: PageReply) -> Self {
        self.pages.insert(page, reply);
        self
    }

    /// `path` is `owner/repo/branch/file`.
    pub fn raw(mut self, path: &str, reply: RawReply) -> Self {
        self.raw.insert(path.to_string(), reply);
        self
    }

    pub async fn start(self) -> anyhow::Result<MockGitHub> {
        let state = Arc::new(MockState {
            pages: self.pages,
            raw: self.raw,
            ..Default::default()
        });

        let app = Router::new()
            .route("/search/repositories", get(search))
            .route("/raw/*path", get(raw))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server stopped: {}", e);
            }
        });

        Ok(MockGitHub { addr, state })
    }
}

async fn search(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.search_hits.fetch_add(1, Ordering::SeqCst);
    state.queries.lock().unwrap().push(params.clone());

    let page = params.get("page").and_then(|p| p.parse::<u32>().ok()).unwrap_or(1);
    match state.pages.get(&page).cloned() {
        Some(PageReply::Items(items)) => search_body(items),
        None => search_body(Vec::new()),
        Some(PageReply::Status(code, body)) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
        Some(PageReply::RateLimited) => {
            let mut headers = HeaderMap::new();
            headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
            headers.insert("X-RateLimit-Reset", HeaderValue::from_static("1700000000"));
            (StatusCode::FORBIDDEN, headers, "API rate limit exceeded").into_response()
        }
        Some(PageReply::Malformed) => (StatusCode::OK, "{\"items\": [").into_response(),
    }
}

fn search_body(items: Vec<Value>) -> Response {
    let body = json!({
        "total_count": items.len(),
        "incomplete_results": false,
        "items": items,
    });
    (StatusCode::OK, body.to_string()).into_response()
}

async fn raw(State(state): State<Arc<MockState>>, Path(path): Path<String>) -> Response {
    state.raw_hits.fetch_add(1, Ordering::SeqCst);

    match state.raw.get(&path).cloned() {
        Some(reply) => {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, reply.body).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404: Not Found").into_response(),
    }
}

/// A search item shaped like the real API, with a few extra fields the
/// client must ignore.
pub fn repo_item(owner: &str, name: &str, stars: u32, forks: u32) -> Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "description": format!("{} plugin", name),
        "stargazers_count": stars,
        "forks_count": forks,
        "html_url": format!("https://github.com/{}/{}", owner, name),
        "owner": { "login": owner, "id": 2 },
        "default_branch": "main",
        "topics": ["uracle-plugin"],
    })
}

/// An address nothing listens on.
pub async fn closed_addr() -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}
